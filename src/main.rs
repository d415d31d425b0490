use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use project_scout::config::Settings;
use project_scout::core::{Aggregator, Classifier, LogisticClassifier, Pipeline};
use project_scout::routes::{self, AppState};
use project_scout::services::{
    build_http_client, ArxivProvider, DatasetProvider, GithubProvider, InMemoryProfileStore,
    PostgresProfileStore, ProfileStore, Provider,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so a load failure goes to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.logging.level))
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Project Scout discovery service...");
    info!("Configuration loaded successfully");

    // The service must not start without its difficulty model
    let classifier: Arc<dyn Classifier> = Arc::new(
        LogisticClassifier::load(&settings.classifier.model_path)
            .map_err(|e| startup_error("Failed to load difficulty model", e))?,
    );

    let timeout = settings.providers.timeout();
    let http = build_http_client(timeout, &settings.providers.user_agent)
        .map_err(|e| startup_error("Failed to create HTTP client", e))?;

    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(GithubProvider::new(
            settings.providers.github_url.clone(),
            settings.providers.github_token.clone(),
            http.clone(),
            Arc::clone(&classifier),
        )),
        Arc::new(ArxivProvider::new(settings.providers.arxiv_url.clone(), http)),
        Arc::new(DatasetProvider::new(settings.providers.dataset_url.clone())),
    ];

    info!("Providers initialized (timeout: {:?})", timeout);

    let profiles: Arc<dyn ProfileStore> = match &settings.database.url {
        Some(url) => {
            let store = PostgresProfileStore::from_settings(
                url,
                settings.database.max_connections,
                settings.database.min_connections,
            )
            .await
            .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;
            info!("PostgreSQL profile store initialized");
            Arc::new(store)
        }
        None => {
            warn!("No database configured, profiles are kept in memory");
            Arc::new(InMemoryProfileStore::new())
        }
    };

    let aggregator = Aggregator::with_timeout(providers, timeout);
    let pipeline = Pipeline::new(aggregator, settings.ranking.pipeline_limits());

    info!("Pipeline initialized with limits: {:?}", pipeline.limits());

    let app_state = AppState::new(pipeline, profiles, classifier);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure_extractors)
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
