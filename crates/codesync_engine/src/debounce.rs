//! Quiet-window auto-click for the simulation player.
//!
//! Every time the watched control reports "ready" the pending click is
//! cancelled and re-armed, so a click happens only after a full delay with
//! no further ready observations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use codesync_logging::{sync_debug, sync_info, sync_warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{lock, EventSink, Page, SyncEvent};

#[derive(Debug, Clone)]
pub struct DebounceSettings {
    pub delay: Duration,
    /// Control whose disabled flag means "ready".
    pub watched: String,
    /// Control clicked when the window elapses.
    pub target: String,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(10_000),
            watched: ".next-button".to_string(),
            target: ".play-pause-button".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Armed,
}

pub struct PlaybackDebounce {
    page: Arc<dyn Page>,
    sink: Arc<dyn EventSink>,
    settings: DebounceSettings,
    autoplay: Option<watch::Receiver<bool>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackDebounce {
    /// Ungated debounce: every elapsed window clicks.
    pub fn new(page: Arc<dyn Page>, sink: Arc<dyn EventSink>, settings: DebounceSettings) -> Self {
        Self {
            page,
            sink,
            settings,
            autoplay: None,
            pending: Mutex::new(None),
        }
    }

    /// Gates the click on `autoplay`, read when the window elapses.
    pub fn with_autoplay(mut self, autoplay: watch::Receiver<bool>) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Handles one attribute mutation of the watched control.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn observe(&self) -> DebounceState {
        let ready = self
            .page
            .control(&self.settings.watched)
            .is_some_and(|control| control.disabled);
        if !ready {
            return self.state();
        }

        let deadline = Instant::now() + self.settings.delay;
        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(fire_at(
            deadline,
            self.page.clone(),
            self.sink.clone(),
            self.settings.target.clone(),
            self.autoplay.clone(),
        )));
        sync_debug!("Debounce armed for {:?}", self.settings.delay);
        self.sink.emit(SyncEvent::DebounceArmed);
        DebounceState::Armed
    }

    pub fn state(&self) -> DebounceState {
        match lock(&self.pending).as_ref() {
            Some(handle) if !handle.is_finished() => DebounceState::Armed,
            _ => DebounceState::Idle,
        }
    }

    pub fn cancel(&self) {
        if let Some(handle) = lock(&self.pending).take() {
            handle.abort();
        }
    }
}

impl Drop for PlaybackDebounce {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn fire_at(
    deadline: Instant,
    page: Arc<dyn Page>,
    sink: Arc<dyn EventSink>,
    target: String,
    autoplay: Option<watch::Receiver<bool>>,
) {
    tokio::time::sleep_until(deadline).await;

    let enabled = autoplay.as_ref().is_none_or(|rx| *rx.borrow());
    if !enabled {
        sync_debug!("Debounce elapsed with autoplay disabled");
        sink.emit(SyncEvent::DebounceFired { clicked: false });
        return;
    }
    match page.click(&target) {
        Ok(()) => {
            sync_info!("Debounce elapsed; clicked {}", target);
            sink.emit(SyncEvent::DebounceFired { clicked: true });
        }
        Err(err) => {
            sync_warn!("Debounce click failed: {}", err);
            sink.emit(SyncEvent::DebounceFired { clicked: false });
        }
    }
}
