//! Service registration, startup, and shutdown coordination.

use crate::services::Service;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct ServiceManager {
    pending: Vec<(&'static str, Box<dyn Service>)>,
    running: Vec<(&'static str, JoinHandle<anyhow::Result<()>>)>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            pending: Vec::new(),
            running: Vec::new(),
            shutdown_tx,
        }
    }

    pub fn register_service(&mut self, name: &'static str, service: Box<dyn Service>) {
        self.pending.push((name, service));
    }

    pub fn has_services(&self) -> bool {
        !self.pending.is_empty() || !self.running.is_empty()
    }

    /// Spawns every registered service on its own task.
    pub fn spawn_all(&mut self) {
        for (name, service) in self.pending.drain(..) {
            let shutdown_rx = self.shutdown_tx.subscribe();
            info!(service = name, "starting service");
            let handle = tokio::spawn(service.run(shutdown_rx));
            self.running.push((name, handle));
        }
    }

    /// Broadcasts shutdown and waits up to `timeout` for each service to
    /// finish. Services still running after the deadline are aborted.
    pub async fn shutdown(self, timeout: Duration) {
        info!("broadcasting shutdown to services");
        // Errors only when no receivers remain, which means every service
        // already exited.
        let _ = self.shutdown_tx.send(());

        for (name, mut handle) in self.running {
            match tokio::time::timeout(timeout, &mut handle).await {
                Ok(Ok(Ok(()))) => info!(service = name, "service stopped cleanly"),
                Ok(Ok(Err(e))) => error!(service = name, error = %e, "service exited with error"),
                Ok(Err(e)) => error!(service = name, error = %e, "service task panicked"),
                Err(_) => {
                    warn!(service = name, "service did not stop in time, aborting");
                    handle.abort();
                }
            }
        }
    }
}
