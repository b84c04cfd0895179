use clap::Parser;
use podium::app::{self, App};
use podium::cli::{Args, Command};
use podium::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config and setup logging before App::new() so startup logs are
    // never silently dropped.
    let early_config = app::load_config().expect("Failed to load config for logging setup");
    setup_logging(&early_config, args.tracing);

    match args.command {
        Some(Command::Fetch) => {
            return match app::run_fetch_once().await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "fetch failed");
                    ExitCode::FAILURE
                }
            };
        }
        Some(Command::LinkSolutions) => {
            return match app::run_link_once().await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "solution linking failed");
                    ExitCode::FAILURE
                }
            };
        }
        None => {}
    }

    let mut app = App::new().await.expect("Failed to initialize application");

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting podium"
    );

    app.setup_services();
    app.start_services();
    app.run().await
}
