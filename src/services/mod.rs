//! Long-running service abstractions and lifecycle management.

pub mod manager;
pub mod pipeline;
pub mod signals;
pub mod web;

use async_trait::async_trait;
use tokio::sync::broadcast;

/// A long-running component with a cooperative shutdown path.
///
/// `run` owns the service and returns when the shutdown channel fires or
/// the service fails on its own.
#[async_trait]
pub trait Service: Send {
    async fn run(self: Box<Self>, shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()>;
}
