use crate::core::PipelineLimits;
use crate::models::ProviderLimits;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub providers: ProviderSettings,
    #[serde(default)]
    pub classifier: ClassifierSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_github_url")]
    pub github_url: String,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default = "default_arxiv_url")]
    pub arxiv_url: String,
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            github_url: default_github_url(),
            github_token: None,
            arxiv_url: default_arxiv_url(),
            dataset_url: default_dataset_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_github_url() -> String { crate::services::github::DEFAULT_GITHUB_URL.to_string() }
fn default_arxiv_url() -> String { crate::services::arxiv::DEFAULT_ARXIV_URL.to_string() }
fn default_dataset_url() -> String { "https://example.com".to_string() }
fn default_user_agent() -> String { format!("project-scout/{}", env!("CARGO_PKG_VERSION")) }
fn default_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    #[serde(default = "default_model_path")]
    pub model_path: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
        }
    }
}

fn default_model_path() -> String { "models/difficulty_model.json".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// Unset runs the service on the in-memory profile store
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_search_cap")]
    pub search_cap: usize,
    #[serde(default = "default_recommendation_cap")]
    pub recommendation_cap: usize,
    #[serde(default = "ProviderLimitsConfig::search")]
    pub search_limits: ProviderLimitsConfig,
    #[serde(default = "ProviderLimitsConfig::recommendation")]
    pub recommendation_limits: ProviderLimitsConfig,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            search_cap: default_search_cap(),
            recommendation_cap: default_recommendation_cap(),
            search_limits: ProviderLimitsConfig::search(),
            recommendation_limits: ProviderLimitsConfig::recommendation(),
        }
    }
}

impl RankingSettings {
    pub fn pipeline_limits(&self) -> PipelineLimits {
        PipelineLimits {
            search: self.search_limits.into(),
            search_cap: self.search_cap,
            recommendation: self.recommendation_limits.into(),
            recommendation_cap: self.recommendation_cap,
        }
    }
}

fn default_search_cap() -> usize { crate::core::SEARCH_CAP }
fn default_recommendation_cap() -> usize { crate::core::RECOMMENDATION_CAP }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProviderLimitsConfig {
    pub repository: usize,
    pub paper: usize,
    pub dataset: usize,
}

impl ProviderLimitsConfig {
    fn search() -> Self {
        ProviderLimits::search().into()
    }

    fn recommendation() -> Self {
        ProviderLimits::recommendation().into()
    }
}

impl From<ProviderLimits> for ProviderLimitsConfig {
    fn from(limits: ProviderLimits) -> Self {
        Self {
            repository: limits.repository,
            paper: limits.paper,
            dataset: limits.dataset,
        }
    }
}

impl From<ProviderLimitsConfig> for ProviderLimits {
    fn from(config: ProviderLimitsConfig) -> Self {
        Self {
            repository: config.repository,
            paper: config.paper,
            dataset: config.dataset,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SCOUT__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SCOUT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply well-known unprefixed variables
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    const OVERRIDES: [(&str, &str); 4] = [
        ("DATABASE_URL", "database.url"),
        ("GITHUB_TOKEN", "providers.github_token"),
        ("LOG_LEVEL", "logging.level"),
        ("LOG_FORMAT", "logging.format"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in OVERRIDES {
        if let Ok(value) = std::env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
