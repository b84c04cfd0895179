pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod platforms;
pub mod services;
pub mod state;
pub mod web;
pub mod youtube;
