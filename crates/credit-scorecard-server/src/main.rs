use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credit_scorecard_core::Scorecard;
use credit_scorecard_server::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_scorecard_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(environment = %config.environment, "Credit scorecard API starting");

    let scorecard = match &config.artifacts {
        Some(path) => Scorecard::from_path(path)
            .with_context(|| format!("failed to load artifacts from {}", path.display()))?,
        None => {
            tracing::info!("SCORECARD_ARTIFACTS not set, using the builtin bundle");
            Scorecard::builtin().context("builtin artifact bundle is invalid")?
        }
    };
    tracing::info!(
        version = %scorecard.bundle().metadata.version,
        features = scorecard.bundle().model.features.len(),
        "Model loaded"
    );

    let addr = config.bind_addr();
    let app = create_router(AppState::new(scorecard, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
