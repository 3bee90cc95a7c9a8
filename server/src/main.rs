//! Entry point: set up logging, load configuration, bind the listener and
//! serve the todo API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use todo_server::{config::Config, shutdown::shutdown_signal, Store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    let store = Arc::new(Store::new());
    todo_server::serve(listener, store, shutdown_signal(), config.shutdown_timeout()).await?;

    tracing::info!("server stopped");
    Ok(())
}
