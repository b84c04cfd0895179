//! HTTP server service.

use crate::services::Service;
use crate::state::AppState;
use crate::web::create_router;
use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

pub struct WebService {
    port: u16,
    app_state: AppState,
}

impl WebService {
    pub fn new(port: u16, app_state: AppState) -> Self {
        Self { port, app_state }
    }
}

#[async_trait]
impl Service for WebService {
    async fn run(self: Box<Self>, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let router = create_router(self.app_state);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", self.port))
            .await
            .with_context(|| format!("failed to bind port {}", self.port))?;
        info!(port = self.port, "web server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .context("web server error")?;

        info!("web server stopped");
        Ok(())
    }
}
