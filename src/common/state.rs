use crate::config::Config;
use crate::fdi::{AnalysisResult, RemoteSource, SentinelHubClient, UnconfiguredSource};
use crate::routes::analysis::models::RunStatus;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Status of the last triggered action and the result it left behind.
#[derive(Debug, Default)]
pub struct RunState {
    pub status: RunStatus,
    pub last: Option<Arc<AnalysisResult>>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub remote: Arc<dyn RemoteSource>,
    pub run: Arc<RwLock<RunState>>,
    /// Held for the whole of a run so runs never overlap.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, remote: Arc<dyn RemoteSource>) -> Self {
        AppState {
            config,
            remote,
            run: Arc::new(RwLock::new(RunState::default())),
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// State with the Sentinel Hub client when credentials are present.
    pub fn from_config(config: Config) -> Self {
        let remote: Arc<dyn RemoteSource> = match SentinelHubClient::from_config(&config) {
            Ok(client) => {
                info!("Sentinel Hub credentials found, remote mode enabled");
                Arc::new(client)
            }
            Err(e) => {
                warn!(error = %e, "Remote mode disabled, analyses will use the synthetic field");
                Arc::new(UnconfiguredSource)
            }
        };
        AppState::new(config, remote)
    }
}
