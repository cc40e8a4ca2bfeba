use std::sync::Arc;

use air_quality_server::{web, AppConfig, AppState, GeminiClient, InsightClient, SourceAggregator};
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "air_quality_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting air-quality server");

    let config = AppConfig::load()?;
    let aggregator = SourceAggregator::from_config(&config)?;

    let insight = GeminiClient::from_config(&config)?
        .map(|client| Arc::new(client) as Arc<dyn InsightClient>);
    if insight.is_none() {
        tracing::warn!("GEMINI_API_KEY not configured, insight endpoint disabled");
    }

    let app = web::router(AppState::new(aggregator, insight), &config.frontend_dir);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
