use std::net::SocketAddr;
use std::sync::Arc;

use ats_sync_backend::{
    config::{Config, LogFormat},
    database::{pool::create_pool, postgres::PgStore},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let pool = create_pool(&config).await?;
    let store = PgStore::new(pool);
    if config.ensure_schema {
        store.ensure_schema().await?;
    }

    let addr: SocketAddr = config.server_address.parse()?;
    let app_state = AppState::new(config, Arc::new(store))?;
    let app = routes::router(app_state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
