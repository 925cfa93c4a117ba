use codesync_core::NotificationEvent;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("control not found: {0}")]
    ControlNotFound(String),
    #[error("event dispatch failed: {0}")]
    Dispatch(String),
}

/// Snapshot of a clickable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub disabled: bool,
}

/// The document the loops act on.
///
/// Implementations wrap whatever the host provides: a real DOM bridge, a
/// console stand-in, or a test double.
pub trait Page: Send + Sync {
    /// State of the first control matching `selector`, `None` when absent.
    fn control(&self, selector: &str) -> Option<ControlState>;

    fn click(&self, selector: &str) -> Result<(), PageError>;

    /// Dispatches `event` on the document.
    fn dispatch(&self, event: &NotificationEvent) -> Result<(), PageError>;

    fn has_control(&self, selector: &str) -> bool {
        self.control(selector).is_some()
    }
}

/// CSS selectors of the IDE controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub play: String,
    pub replay: String,
    /// Disabled while the player is idle; watched by the debounce.
    pub next: String,
    pub play_pause: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            play: ".play".to_string(),
            replay: ".replay".to_string(),
            next: ".next-button".to_string(),
            play_pause: ".play-pause-button".to_string(),
        }
    }
}
