use crate::config::Config;
use crate::data::postgres::PgStore;
use crate::data::store::Store;
use crate::pipeline::scheduler::KV_CONTEST_FETCH;
use crate::pipeline::{Aggregator, Scheduler, SolutionLinker};
use crate::platforms::{default_adapters, http_client};
use crate::services::manager::ServiceManager;
use crate::services::pipeline::PipelineService;
use crate::services::signals::handle_shutdown_signals;
use crate::services::web::WebService;
use crate::state::AppState;
use crate::youtube::YoutubeClient;
use anyhow::Context;
use chrono::Utc;
use figment::{Figment, providers::Env};
use sqlx::postgres::PgPoolOptions;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    store: Arc<dyn Store>,
    aggregator: Arc<Aggregator>,
    linker: Option<Arc<SolutionLinker>>,
    service_manager: ServiceManager,
}

/// Load configuration from the environment.
pub fn load_config() -> anyhow::Result<Config> {
    Figment::new()
        .merge(Env::raw())
        .extract()
        .context("Failed to load config")
}

impl App {
    /// Create a new App instance with all necessary components initialized
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config = load_config()?;

        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(4))
            .idle_timeout(Duration::from_secs(60 * 2))
            .max_lifetime(Duration::from_secs(60 * 30))
            .connect(&config.database_url)
            .await
            .context("Failed to create database pool")?;
        info!(
            min_connections = 0,
            max_connections = 4,
            "database pool established"
        );

        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations completed successfully");

        let store: Arc<dyn Store> = Arc::new(PgStore::new(db_pool));

        let client = http_client().context("Failed to create HTTP client")?;
        let aggregator = Arc::new(Aggregator::new(default_adapters()?, store.clone()));
        let linker = Self::build_linker(&config, &store, client);

        // Fetch contests immediately so a fresh deployment serves data
        // without waiting for the first scheduled cycle. Non-fatal: the
        // scheduler will retry.
        match aggregator.run().await {
            Ok(summary) => {
                info!(
                    fetched = summary.fetched(),
                    written = summary.reconcile.written(),
                    "startup contest fetch completed"
                );
                if let Err(e) = store.set_timestamp(KV_CONTEST_FETCH, Utc::now()).await {
                    warn!(error = %e, "Failed to persist startup fetch timestamp");
                }
            }
            Err(e) => warn!(error = %e, "Startup contest fetch failed (non-fatal)"),
        }

        Ok(App {
            config,
            store,
            aggregator,
            linker,
            service_manager: ServiceManager::new(),
        })
    }

    fn build_linker(
        config: &Config,
        store: &Arc<dyn Store>,
        client: reqwest::Client,
    ) -> Option<Arc<SolutionLinker>> {
        match (&config.youtube_api_key, &config.youtube_channel_id) {
            (Some(key), Some(channel)) => {
                let source = Arc::new(YoutubeClient::new(client, key.clone(), channel.clone()));
                Some(Arc::new(SolutionLinker::new(store.clone(), source)))
            }
            _ => {
                warn!(
                    "YOUTUBE_API_KEY or YOUTUBE_CHANNEL_ID not set, solution linking disabled"
                );
                None
            }
        }
    }

    /// Register the web and pipeline services with the manager.
    pub fn setup_services(&mut self) {
        let app_state = AppState::new(self.store.clone());
        let web_service = Box::new(WebService::new(self.config.port, app_state));
        self.service_manager.register_service("web", web_service);

        let scheduler = Scheduler::new(
            self.store.clone(),
            self.aggregator.clone(),
            self.linker.clone(),
            self.config.contest_fetch_interval(),
            self.config.solution_sync_interval(),
        );
        let pipeline_service = Box::new(PipelineService::new(scheduler));
        self.service_manager
            .register_service("pipeline", pipeline_service);
    }

    /// Start all registered services
    pub fn start_services(&mut self) {
        self.service_manager.spawn_all();
    }

    /// Run the application and handle shutdown signals
    pub async fn run(self) -> ExitCode {
        handle_shutdown_signals(self.service_manager, self.config.shutdown_timeout()).await
    }
}

/// One-shot contest fetch for the `fetch` subcommand.
pub async fn run_fetch_once() -> anyhow::Result<()> {
    let (store, _) = connect_store().await?;
    let aggregator = Aggregator::new(default_adapters()?, store);
    let summary = aggregator.run().await?;
    info!(
        fetched = summary.fetched(),
        inserted = summary.reconcile.inserted,
        updated = summary.reconcile.updated,
        failed = summary.reconcile.failed,
        "fetch completed"
    );
    Ok(())
}

/// One-shot playlist scan for the `link-solutions` subcommand.
pub async fn run_link_once() -> anyhow::Result<()> {
    let (store, config) = connect_store().await?;
    let client = http_client()?;
    let linker = App::build_linker(&config, &store, client)
        .context("solution linking requires YOUTUBE_API_KEY and YOUTUBE_CHANNEL_ID")?;
    let summary = linker.run().await?;
    info!(
        playlists = summary.playlists,
        videos = summary.videos,
        linked = summary.linked,
        already_linked = summary.already_linked,
        no_match = summary.no_match,
        ambiguous = summary.ambiguous,
        "solution linking completed"
    );
    Ok(())
}

async fn connect_store() -> anyhow::Result<(Arc<dyn Store>, Config)> {
    let config = load_config()?;
    let db_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to create database pool")?;
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    Ok((Arc::new(PgStore::new(db_pool)), config))
}
