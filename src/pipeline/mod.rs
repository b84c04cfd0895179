//! The aggregation core: fetch fan-out, reconciliation, solution linking,
//! and the periodic scheduler that drives both pipelines.

pub mod aggregator;
pub mod linker;
pub mod reconciler;
pub mod scheduler;

pub use aggregator::{Aggregator, RunSummary, SourceOutcome};
pub use linker::{LinkerSummary, Playlist, SolutionLinker, Video, VideoSource};
pub use reconciler::{ReconcileSummary, reconcile};
pub use scheduler::Scheduler;
