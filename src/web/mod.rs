//! Web API module.

pub mod contests;
pub mod error;
pub mod routes;
pub mod status;

pub use routes::*;
