use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view_model::AppViewModel;
use crate::Badge;

/// Storage key the popup state is saved under.
pub const STATE_KEY: &str = "state";

/// Source URL offered when nothing has been saved yet.
pub const DEFAULT_SOURCE_URL: &str = "http://localhost:10101/Player.java";

#[derive(Debug, Error)]
#[error("invalid persisted state: {0}")]
pub struct StateParseError(#[from] serde_json::Error);

/// Configuration persisted by the popup and replayed into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub is_sync_enabled: bool,
    /// Older extension builds wrote this field as `isAutplayEnabled`.
    #[serde(default, alias = "isAutplayEnabled")]
    pub is_autoplay_enabled: bool,
}

fn default_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            url: default_url(),
            is_sync_enabled: false,
            is_autoplay_enabled: false,
        }
    }
}

impl SyncState {
    /// Parses a stored document. `null` yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, StateParseError> {
        let state: Option<SyncState> = serde_json::from_str(json)?;
        Ok(state.unwrap_or_default())
    }

    pub fn to_json(&self) -> String {
        // Plain struct of strings and bools; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Popup model: the persisted state plus UI-only bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    sync: SyncState,
    badge: Badge,
    restored: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync_state(&self) -> &SyncState {
        &self.sync
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url: self.sync.url.clone(),
            url_is_valid: url::Url::parse(&self.sync.url).is_ok(),
            sync_enabled: self.sync.is_sync_enabled,
            autoplay_enabled: self.sync.is_autoplay_enabled,
            badge: self.badge,
            restored: self.restored,
            dirty: self.dirty,
        }
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn restore(&mut self, sync: SyncState) {
        self.sync = sync;
        self.restored = true;
        self.dirty = true;
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.sync.url != url {
            self.sync.url = url;
            self.dirty = true;
        }
    }

    pub(crate) fn set_sync_enabled(&mut self, enabled: bool) {
        if self.sync.is_sync_enabled != enabled {
            self.sync.is_sync_enabled = enabled;
            self.dirty = true;
        }
    }

    pub(crate) fn set_autoplay_enabled(&mut self, enabled: bool) {
        if self.sync.is_autoplay_enabled != enabled {
            self.sync.is_autoplay_enabled = enabled;
            self.dirty = true;
        }
    }

    pub(crate) fn set_badge(&mut self, badge: Badge) {
        if self.badge != badge {
            self.badge = badge;
            self.dirty = true;
        }
    }
}
