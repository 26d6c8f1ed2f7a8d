use anyhow::Result;
use dottie_api::{build_app, ApiConfig};
use dottie_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("dottie_api");

    let config = ApiConfig::from_env();
    let app = build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        database = config.database_url.is_some(),
        "dottie assessment api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
