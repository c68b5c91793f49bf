use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kiddo_server::backend::{config::Config, create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kiddo_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config)?;

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Kiddo server listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
