//! Codesync engine: the sync loop, the playback debounce and the frame contexts
//! that route extension messages to them.
mod autoplay;
mod context;
mod debounce;
mod digest;
mod engine;
mod fetch;
mod page;
mod persist;
mod playback;
mod store;
mod sync_loop;
mod types;

pub use autoplay::AutoplayFlag;
pub use context::{MainFrameContext, PlayerFrameContext};
pub use debounce::{DebounceSettings, DebounceState, PlaybackDebounce};
pub use digest::sha256_hex;
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use page::{ControlState, Page, PageError, Selectors};
pub use persist::{ensure_parent_dir, write_atomic, PersistError};
pub use playback::{trigger_playback, PlaybackError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use sync_loop::{SyncLoop, SyncSettings, TickOutcome};
pub use types::{
    ChannelEventSink, EventSink, FailureKind, FetchError, FetchOutput, NullEventSink,
    PlaybackAction, SyncEvent,
};

/// Locks `mutex`, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
