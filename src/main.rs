use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blivechat::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blivechat=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Create upload directory
    tokio::fs::create_dir_all(config.upload_dir()).await?;

    if !config.web_root.join(blivechat::constants::INDEX_FILE).exists() {
        tracing::warn!(
            "No {} in web root {}, frontend routes will return 404",
            blivechat::constants::INDEX_FILE,
            config.web_root.display()
        );
    }

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    let app = blivechat::app(config);

    tracing::info!("blivechat listening on {}", addr);
    tracing::info!("API docs available at http://{}/docs", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
