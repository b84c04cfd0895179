//! Background aggregation service wrapping the scheduler.

use crate::pipeline::Scheduler;
use crate::services::Service;
use async_trait::async_trait;
use tokio::sync::broadcast;

pub struct PipelineService {
    scheduler: Scheduler,
}

impl PipelineService {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl Service for PipelineService {
    async fn run(self: Box<Self>, shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        self.scheduler.run(shutdown_rx).await;
        Ok(())
    }
}
