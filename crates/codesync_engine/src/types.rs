use std::fmt;
use std::sync::mpsc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub text: String,
    pub status: u16,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Which control the playback trigger clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Replay,
    Play,
}

/// Observable side of the loops, for the host and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    SyncStarted { url: String },
    SyncStopped,
    ProgramUpdated { digest: String, byte_len: usize },
    ProgramUnchanged,
    FetchFailed { kind: FailureKind },
    PlaybackTriggered(PlaybackAction),
    PlaybackFailed { message: String },
    DebounceArmed,
    /// The quiet window elapsed; `clicked` is false when autoplay was off.
    DebounceFired { clicked: bool },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<SyncEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<SyncEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: SyncEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: SyncEvent) {}
}
