use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magicstream_api::config::ServerConfig;
use magicstream_api::router::build_app_router;
use magicstream_api::state::AppState;
use magicstream_db::repositories::{GenreRepo, MovieRepo, RankingRepo, UserRepo};
use magicstream_pipeline::{OpenAiClassifier, RankingPipeline};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = %config.port,
        unranked_policy = %config.unranked_policy,
        "Loaded server configuration",
    );
    if config.prompt_template.is_none() {
        tracing::warn!("BASE_PROMPT_TEMPLATE is not set; review ranking will fail until it is");
    }

    // --- Database ---
    let pool = magicstream_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    magicstream_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    magicstream_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Repositories ---
    let db_timeout = config.db_timeout();
    let movies = Arc::new(MovieRepo::new(pool.clone(), db_timeout));
    let users = Arc::new(UserRepo::new(pool.clone(), db_timeout));
    let genres = Arc::new(GenreRepo::new(pool.clone(), db_timeout));
    let labels = Arc::new(RankingRepo::new(pool.clone(), db_timeout));

    // --- Ranking pipeline ---
    let classifier = OpenAiClassifier::new(config.classifier.clone())
        .expect("Failed to build classifier HTTP client");
    let ranking = RankingPipeline::new(
        labels,
        movies.clone(),
        Arc::new(classifier),
        config.prompt_template.clone(),
        config.unranked_policy,
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        movies,
        users,
        genres,
        ranking: Arc::new(ranking),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// `EnvFilter` from `RUST_LOG`, human-readable output unless `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "magicstream_api=debug,magicstream_pipeline=debug,tower_http=debug".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
