// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::upstream::UpstreamClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: RelayConfig,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        let upstream = UpstreamClient::new(config.clone());
        Self { config, upstream }
    }
}
