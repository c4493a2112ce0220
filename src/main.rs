use anyhow::Result;
use tracing::metadata::LevelFilter;

use model_depot::core::{AppContext, ServiceConfig};
use model_depot::http;

fn setup_logging() {
    let filter = std::env::var("MODEL_DEPOT_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LevelFilter::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let config = ServiceConfig::from_env()?;
    let addr = config.bind_addr;
    let ctx = AppContext::new(config)?;
    let app = http::router(ctx);

    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
