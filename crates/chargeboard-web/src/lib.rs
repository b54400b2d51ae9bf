//! chargeboard-web - Web frontend for chargeboard using Axum

pub mod error;
pub mod page;
pub mod router;

pub use error::ApiError;
pub use router::create_router;

use anyhow::Result;
use chargeboard_core::DataStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the web server until the process is stopped
pub async fn run(store: Arc<DataStore>, port: u16) -> Result<()> {
    let router = create_router(store);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Web server listening");
    println!("Dashboard running on http://{}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
