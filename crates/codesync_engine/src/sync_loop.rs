//! Fixed-interval poll of the source URL with digest-based change detection.
//!
//! A [`SyncLoop`] owns at most one running chain. Each chain waits one poll
//! interval, runs a tick, optionally triggers playback, and goes around
//! again. Ticks of one chain never overlap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use codesync_core::NotificationEvent;
use codesync_logging::{sync_debug, sync_info, sync_warn};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{lock, sha256_hex, trigger_playback, EventSink, Fetcher, Page, Selectors, SyncEvent};

#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub poll_interval: Duration,
    /// Pause between dispatching a new program and clicking play.
    pub playback_delay: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(3000),
            playback_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Changed,
    Unchanged,
    /// Fetch failed; retried on the next tick.
    Skipped,
    /// The chain was stopped while the tick was in flight.
    Cancelled,
}

pub struct SyncLoop {
    shared: Arc<Shared>,
    run: Mutex<Option<Run>>,
}

struct Run {
    url: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Run {
    fn cancel(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

struct Shared {
    fetcher: Arc<dyn Fetcher>,
    page: Arc<dyn Page>,
    sink: Arc<dyn EventSink>,
    selectors: Selectors,
    settings: SyncSettings,
    autoplay: AtomicBool,
    /// Digest of the last dispatched program. Held while notifying so
    /// `stop` cannot return in the middle of a dispatch.
    program_hash: Mutex<Option<String>>,
}

impl SyncLoop {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        page: Arc<dyn Page>,
        sink: Arc<dyn EventSink>,
        selectors: Selectors,
        settings: SyncSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                page,
                sink,
                selectors,
                settings,
                autoplay: AtomicBool::new(false),
                program_hash: Mutex::new(None),
            }),
            run: Mutex::new(None),
        }
    }

    /// Replaces any running chain with a fresh one polling `url`.
    ///
    /// Clears the stored digest, so the first successful fetch is always
    /// dispatched. Must be called from within a Tokio runtime.
    pub fn start(&self, url: impl Into<String>, autoplay_enabled: bool) {
        let url = url.into();
        let mut run = lock(&self.run);
        if let Some(previous) = run.take() {
            previous.cancel();
        }
        *lock(&self.shared.program_hash) = None;
        self.shared.autoplay.store(autoplay_enabled, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_chain(self.shared.clone(), url.clone(), cancel.clone()));
        sync_info!("Sync started url={} autoplay={}", url, autoplay_enabled);
        self.shared.sink.emit(SyncEvent::SyncStarted { url: url.clone() });
        *run = Some(Run {
            url,
            cancel,
            handle,
        });
    }

    /// Cancels the pending tick and forgets the stored digest.
    pub fn stop(&self) {
        let previous = lock(&self.run).take();
        let was_running = previous.is_some();
        if let Some(previous) = previous {
            previous.cancel();
        }
        *lock(&self.shared.program_hash) = None;
        if was_running {
            sync_info!("Sync stopped");
            self.shared.sink.emit(SyncEvent::SyncStopped);
        }
    }

    /// Changes the autoplay flag of the running chain; the digest is kept.
    pub fn set_autoplay(&self, enabled: bool) {
        self.shared.autoplay.store(enabled, Ordering::SeqCst);
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.shared.autoplay.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.run)
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    pub fn url(&self) -> Option<String> {
        lock(&self.run).as_ref().map(|run| run.url.clone())
    }

    pub fn program_hash(&self) -> Option<String> {
        lock(&self.shared.program_hash).clone()
    }

    /// Runs one tick outside any chain: fetch, compare, notify, and
    /// (when enabled and changed) trigger playback.
    pub async fn tick(&self, url: &str, autoplay_enabled: bool) -> TickOutcome {
        let cancel = CancellationToken::new();
        let outcome = self.shared.tick(url, &cancel).await;
        if autoplay_enabled && outcome == TickOutcome::Changed {
            self.shared.play_after_delay(&cancel).await;
        }
        outcome
    }
}

impl Drop for SyncLoop {
    fn drop(&mut self) {
        if let Some(run) = lock(&self.run).take() {
            run.cancel();
        }
    }
}

async fn run_chain(shared: Arc<Shared>, url: String, cancel: CancellationToken) {
    let mut next_tick = Instant::now() + shared.settings.poll_interval;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep_until(next_tick) => {}
        }

        let outcome = shared.tick(&url, &cancel).await;
        if outcome == TickOutcome::Cancelled {
            return;
        }
        // The interval runs from the end of the tick, not from the end of playback.
        next_tick = Instant::now() + shared.settings.poll_interval;
        if outcome == TickOutcome::Changed && shared.autoplay.load(Ordering::SeqCst) {
            shared.play_after_delay(&cancel).await;
        }
    }
}

impl Shared {
    async fn tick(&self, url: &str, cancel: &CancellationToken) -> TickOutcome {
        let fetched = tokio::select! {
            _ = cancel.cancelled() => return TickOutcome::Cancelled,
            fetched = self.fetcher.fetch(url) => fetched,
        };

        let output = match fetched {
            Ok(output) => output,
            Err(err) => {
                sync_debug!("Fetch of {} failed: {}", url, err);
                self.sink.emit(SyncEvent::FetchFailed { kind: err.kind });
                return TickOutcome::Skipped;
            }
        };

        if output.text.is_empty() {
            sync_debug!("Empty body from {}; keeping the current program", url);
            self.sink.emit(SyncEvent::ProgramUnchanged);
            return TickOutcome::Unchanged;
        }

        let digest = sha256_hex(&output.text);
        let mut program_hash = lock(&self.program_hash);
        if cancel.is_cancelled() {
            return TickOutcome::Cancelled;
        }
        if program_hash.as_deref() == Some(digest.as_str()) {
            self.sink.emit(SyncEvent::ProgramUnchanged);
            return TickOutcome::Unchanged;
        }

        let event = NotificationEvent::update_code(output.text);
        if let Err(err) = self.page.dispatch(&event) {
            // Leave the digest untouched so the next tick retries the dispatch.
            sync_warn!("Dispatching new program failed: {}", err);
            return TickOutcome::Skipped;
        }
        sync_info!(
            "Program updated digest={} bytes={}",
            &digest[..12],
            event.detail.code.len()
        );
        self.sink.emit(SyncEvent::ProgramUpdated {
            digest: digest.clone(),
            byte_len: event.detail.code.len(),
        });
        *program_hash = Some(digest);
        TickOutcome::Changed
    }

    async fn play_after_delay(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(self.settings.playback_delay) => {}
        }
        match trigger_playback(self.page.as_ref(), &self.selectors) {
            Ok(action) => {
                sync_info!("Playback triggered: {:?}", action);
                self.sink.emit(SyncEvent::PlaybackTriggered(action));
            }
            Err(err) => {
                sync_warn!("Playback trigger failed: {}", err);
                self.sink.emit(SyncEvent::PlaybackFailed {
                    message: err.to_string(),
                });
            }
        }
    }
}
