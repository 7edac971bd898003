use medtrain_ai::YandexGptClient;
use medtrain_conversation::{
    DialogStore, InMemoryDialogStore, InMemoryScenarioStore, ScenarioStore,
};
use medtrain_ratelimit::{RateLimitConfig, RateLimiter};
use medtrain_server::{
    app::{self, AppState},
    config::ServerConfig,
    db::{PgDialogStore, PgScenarioStore},
    seed::load_scenarios,
};
use medtrain_training::TrainingService;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let scenarios = match &config.scenarios_file {
        Some(path) => load_scenarios(path).expect("failed to load scenarios"),
        None => Vec::new(),
    };

    let (dialogs, scenario_store): (Arc<dyn DialogStore>, Arc<dyn ScenarioStore>) =
        match &config.database_url {
            Some(url) => {
                let options = PgConnectOptions::from_str(url)
                    .expect("invalid DATABASE_URL")
                    .options([("search_path", config.database_schema.as_str())]);
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await
                    .expect("failed to connect to database");

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&db_pool)
                    .await
                    .expect("failed to run migrations");

                let scenario_store = PgScenarioStore::new(db_pool.clone());
                for scenario in &scenarios {
                    scenario_store
                        .upsert(scenario)
                        .await
                        .expect("failed to store scenario");
                }
                let dialogs: Arc<dyn DialogStore> = Arc::new(PgDialogStore::new(db_pool));
                let scenario_store: Arc<dyn ScenarioStore> = Arc::new(scenario_store);
                (dialogs, scenario_store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, dialogs are kept in memory only");
                let dialogs: Arc<dyn DialogStore> = Arc::new(InMemoryDialogStore::new());
                let scenario_store: Arc<dyn ScenarioStore> =
                    Arc::new(InMemoryScenarioStore::with_scenarios(scenarios));
                (dialogs, scenario_store)
            }
        };

    let generator = YandexGptClient::new(config.llm).expect("invalid LLM configuration");
    let training = TrainingService::new(
        dialogs,
        scenario_store,
        Arc::new(generator),
        &config.training,
    );

    let limiter = RateLimiter::new(
        RateLimitConfig::new(
            config.rate_limit.max_requests,
            config.rate_limit.window_seconds,
        )
        .expect("invalid rate limit configuration"),
    );

    // Spawn periodic sweep of idle rate limit buckets
    let purge_limiter = limiter.clone();
    let purge_interval_secs = config.rate_limit.purge_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(purge_interval_secs));
        loop {
            interval.tick().await;
            let purged = purge_limiter.purge_expired();
            if purged > 0 {
                tracing::debug!(
                    purged_clients = purged,
                    tracked_clients = purge_limiter.tracked_clients(),
                    "Periodic rate limit purge"
                );
            }
        }
    });

    let app = app::router(AppState::new(training, limiter));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
