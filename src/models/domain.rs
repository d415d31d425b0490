use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of the novelty scale
pub const MAX_NOVELTY: f64 = 10.0;

/// Origin of a discovered project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[serde(alias = "github")]
    Repository,
    Paper,
    Dataset,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Repository => "repository",
            Source::Paper => "paper",
            Source::Dataset => "dataset",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated entry difficulty of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

/// Unified search result produced by every provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: Source,
    pub level: Level,
    pub novelty_score: f64,
    pub url: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stars: Option<u64>,
}

/// Stored interest profile, keyed by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub branch: String,
    pub year: String,
    pub skills: Vec<String>,
    pub area_of_interest: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Classifier input for a single repository candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub stars: u64,
    pub open_issues: u64,
    pub description_length: u64,
    pub tag_count: u64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.stars as f64,
            self.open_issues as f64,
            self.description_length as f64,
            self.tag_count as f64,
        ]
    }
}

/// Per-provider item limits for one aggregation round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimits {
    pub repository: usize,
    pub paper: usize,
    pub dataset: usize,
}

impl ProviderLimits {
    pub fn search() -> Self {
        Self {
            repository: 8,
            paper: 8,
            dataset: 5,
        }
    }

    pub fn recommendation() -> Self {
        Self {
            repository: 10,
            paper: 10,
            dataset: 5,
        }
    }

    pub fn for_source(&self, source: Source) -> usize {
        match source {
            Source::Repository => self.repository,
            Source::Paper => self.paper,
            Source::Dataset => self.dataset,
        }
    }
}
