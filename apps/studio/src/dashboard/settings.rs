//! Per-user settings. Storage is an external collaborator behind `SettingsStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use url::Url;

pub const SETTINGS_SAVED: &str =
    "Settings saved! Your Calendly link will be included in all content.";

/// Where a user's Calendly link lives. Swap the in-memory default for a real
/// store without touching the handlers.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn calendly_link(&self, user_id: &str) -> anyhow::Result<Option<String>>;

    async fn save_calendly_link(&self, user_id: &str, link: &str) -> anyhow::Result<()>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemorySettingsStore {
    links: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn calendly_link(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.links.read().await.get(user_id).cloned())
    }

    async fn save_calendly_link(&self, user_id: &str, link: &str) -> anyhow::Result<()> {
        self.links
            .write()
            .await
            .insert(user_id.to_string(), link.to_string());
        Ok(())
    }
}

/// Accepts absolute http(s) links only; returns the trimmed link.
pub fn validate_calendly_link(raw: &str) -> Result<String, String> {
    let link = raw.trim();
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(link.to_string())
        }
        _ => Err("Calendly link must be a full http(s) URL".to_string()),
    }
}
