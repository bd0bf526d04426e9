use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use canopy_advisory::AdvisoryApi;
use canopy_api::config::ServerConfig;
use canopy_api::router::build_app_router;
use canopy_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = config.port, "Configuration loaded");

    let pool = prepare_database().await;

    let advisory = advisory_client(&config);
    match &advisory {
        Some(api) => tracing::info!(model = api.model(), "Advisory upstream client ready"),
        None => {
            tracing::warn!("ADVISORY_API_KEY is not set; advisory endpoints will answer 500")
        }
    }

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        advisory,
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST is not a valid IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot listen on {addr}: {e}"));
    tracing::info!(%addr, "Canopy API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server terminated with an error");

    tracing::info!("Shutdown complete");
}

/// Log to stdout, filtered by `RUST_LOG` when set.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "canopy_api=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to Postgres, verify liveness, and apply pending migrations.
///
/// Any failure here aborts startup; the creator endpoints cannot run
/// without their database.
async fn prepare_database() -> canopy_db::DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = canopy_db::create_pool(&url)
        .await
        .expect("Postgres connection failed");
    canopy_db::health_check(&pool)
        .await
        .expect("Postgres liveness probe failed");
    canopy_db::run_migrations(&pool)
        .await
        .expect("Migration run failed");

    tracing::info!("Database ready");
    pool
}

/// Build the upstream advisory client, or `None` when no API key is set.
///
/// A missing key does not stop the server: the creator endpoints keep
/// working and advisory requests answer with the configuration error.
fn advisory_client(config: &ServerConfig) -> Option<Arc<AdvisoryApi>> {
    let api_key = config.advisory.api_key.clone()?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("reqwest client construction failed");

    Some(Arc::new(AdvisoryApi::with_client(
        http_client,
        config.advisory.api_url.clone(),
        api_key,
        config.advisory.model.clone(),
    )))
}

/// Resolves when the process receives SIGINT or SIGTERM.
///
/// `axum::serve` polls this to decide when to stop accepting new
/// connections; requests already in flight still run to completion.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("SIGINT handler installation failed");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
