use std::sync::Arc;

use reqwest::Client;

use crate::client::StudioClient;
use crate::config::Config;
use crate::dashboard::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upstream client used by the proxy handlers. Carries no credentials of its own.
    pub http: Client,
    /// Client wrappers used by the dashboard; they reach the providers via the proxy routes.
    pub studio: StudioClient,
    /// Pluggable settings store. Default: InMemorySettingsStore.
    pub settings: Arc<dyn SettingsStore>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(config: Config) -> Self {
        let http = Client::new();
        AppState {
            studio: StudioClient::new(http.clone(), config.proxy_base_url.clone()),
            http,
            config,
            settings: Arc::new(crate::dashboard::InMemorySettingsStore::default()),
        }
    }
}
