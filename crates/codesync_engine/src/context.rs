//! Per-frame message handlers.
//!
//! The main frame (the one with the IDE's play control) owns the store and
//! the sync loop. The player frame (the one with the play/pause control)
//! owns the debounce. Both are installed at most once per page.

use std::sync::{Arc, Mutex};

use codesync_core::{Request, Response, UpdateState};
use codesync_logging::{sync_debug, sync_error, sync_info, sync_warn};

use crate::{
    lock, AutoplayFlag, DebounceSettings, DebounceState, EventSink, Fetcher, KeyValueStore, Page,
    PlaybackDebounce, Selectors, SyncLoop, SyncSettings,
};

pub struct MainFrameContext {
    store: Arc<dyn KeyValueStore>,
    sync: SyncLoop,
    autoplay: AutoplayFlag,
    applied: Mutex<Option<UpdateState>>,
}

impl MainFrameContext {
    /// Installs the context if `page` has the play control.
    pub fn install(
        page: Arc<dyn Page>,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn EventSink>,
        selectors: Selectors,
        settings: SyncSettings,
        autoplay: AutoplayFlag,
    ) -> Option<Self> {
        if !page.has_control(&selectors.play) {
            sync_debug!("No {} control; main frame context not installed", selectors.play);
            return None;
        }
        Some(Self {
            store,
            sync: SyncLoop::new(fetcher, page, sink, selectors, settings),
            autoplay,
            applied: Mutex::new(None),
        })
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::SetItem { key, value } => {
                if let Err(err) = self.store.set_item(&key, &value) {
                    sync_error!("Failed to store {}: {}", key, err);
                }
                Response::Ack
            }
            Request::GetItem { key } => match self.store.get_item(&key) {
                Ok(value) => Response::Value(value),
                Err(err) => {
                    sync_warn!("Failed to read {}: {}", key, err);
                    Response::Value(None)
                }
            },
            Request::UpdateState(update) => {
                self.update_state(update);
                Response::Ack
            }
            Request::UpdateAutoplayEnabled { .. } => {
                sync_debug!("Ignoring autoplay broadcast in main frame");
                Response::Ack
            }
        }
    }

    /// Applies popup state. The digest is reset only when the URL or the sync
    /// toggle changes; flipping autoplay alone keeps it.
    fn update_state(&self, update: UpdateState) {
        let mut applied = lock(&self.applied);
        let restart = applied.as_ref().is_none_or(|previous| {
            previous.url != update.url || previous.is_sync_enabled != update.is_sync_enabled
        });

        if restart {
            self.sync.stop();
            if update.is_sync_enabled {
                self.sync.start(update.url.clone(), update.is_autoplay_enabled);
            }
        } else {
            sync_info!("Autoplay set to {}", update.is_autoplay_enabled);
            self.sync.set_autoplay(update.is_autoplay_enabled);
        }
        self.autoplay.set(update.is_autoplay_enabled);
        *applied = Some(update);
    }

    pub fn sync_loop(&self) -> &SyncLoop {
        &self.sync
    }
}

pub struct PlayerFrameContext {
    debounce: PlaybackDebounce,
    autoplay: AutoplayFlag,
}

impl PlayerFrameContext {
    /// Installs the context if `page` has the play/pause control.
    pub fn install(
        page: Arc<dyn Page>,
        sink: Arc<dyn EventSink>,
        settings: DebounceSettings,
        autoplay: AutoplayFlag,
    ) -> Option<Self> {
        if !page.has_control(&settings.target) {
            sync_debug!("No {} control; player frame context not installed", settings.target);
            return None;
        }
        let debounce =
            PlaybackDebounce::new(page, sink, settings).with_autoplay(autoplay.subscribe());
        Some(Self { debounce, autoplay })
    }

    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::UpdateAutoplayEnabled {
                is_autoplay_enabled,
            } => {
                self.autoplay.set(is_autoplay_enabled);
                Response::Ack
            }
            other => {
                sync_debug!("Player frame ignores {:?}", other);
                Response::Ack
            }
        }
    }

    /// Called on every attribute mutation of the watched control.
    pub fn on_mutation(&self) -> DebounceState {
        self.debounce.observe()
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debounce.state()
    }
}
