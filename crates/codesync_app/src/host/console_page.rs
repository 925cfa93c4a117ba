//! Headless stand-in for the IDE page.
//!
//! Notification events and clicks are written to stdout as JSON lines.
//! Control state is driven by commands read from stdin.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use codesync_core::NotificationEvent;
use codesync_engine::{write_atomic, ControlState, Page, PageError, Selectors};
use codesync_logging::{sync_info, sync_warn};
use serde_json::json;

pub struct ConsolePage {
    controls: Mutex<HashMap<String, ControlState>>,
    out: Mutex<Box<dyn Write + Send>>,
    mirror_to: Option<PathBuf>,
}

impl ConsolePage {
    /// A page with every IDE control present, replay disabled.
    pub fn new(selectors: &Selectors, mirror_to: Option<PathBuf>) -> Self {
        Self::with_output(selectors, mirror_to, Box::new(io::stdout()))
    }

    pub fn with_output(
        selectors: &Selectors,
        mirror_to: Option<PathBuf>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        let controls = [
            (selectors.play.clone(), false),
            (selectors.replay.clone(), true),
            (selectors.next.clone(), false),
            (selectors.play_pause.clone(), false),
        ]
        .into_iter()
        .map(|(selector, disabled)| (selector, ControlState { disabled }))
        .collect();
        Self {
            controls: Mutex::new(controls),
            out: Mutex::new(out),
            mirror_to,
        }
    }

    pub fn set_disabled(&self, selector: &str, disabled: bool) {
        self.controls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(selector.to_string(), ControlState { disabled });
    }

    pub fn remove(&self, selector: &str) -> bool {
        self.controls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(selector)
            .is_some()
    }

    fn emit_line(&self, line: serde_json::Value) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{line}")?;
        out.flush()
    }
}

impl Page for ConsolePage {
    fn control(&self, selector: &str) -> Option<ControlState> {
        self.controls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(selector)
            .copied()
    }

    fn click(&self, selector: &str) -> Result<(), PageError> {
        if !self.has_control(selector) {
            return Err(PageError::ControlNotFound(selector.to_string()));
        }
        sync_info!("Clicked {}", selector);
        let line = json!({ "at": Utc::now().to_rfc3339(), "click": selector });
        if let Err(err) = self.emit_line(line) {
            sync_warn!("Failed to report click: {}", err);
        }
        Ok(())
    }

    /// The stdout line is the delivery; the mirror file only follows it, and a
    /// failed mirror write does not fail the dispatch.
    fn dispatch(&self, event: &NotificationEvent) -> Result<(), PageError> {
        let line = json!({ "at": Utc::now().to_rfc3339(), "event": event });
        self.emit_line(line)
            .map_err(|err| PageError::Dispatch(err.to_string()))?;
        if let (Some(path), Some(code)) = (&self.mirror_to, event.code()) {
            if let Err(err) = write_atomic(path, code.as_bytes()) {
                sync_warn!("Failed to mirror program to {}: {}", path.display(), err);
            }
        }
        Ok(())
    }
}

/// A line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    SetDisabled { selector: String, disabled: bool },
    Remove { selector: String },
    Quit,
}

impl PageCommand {
    /// Parses `set <selector> enabled|disabled`, `remove <selector>` or `quit`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next(), words.next()) {
            (Some("quit"), None, None, None) => Ok(PageCommand::Quit),
            (Some("remove"), Some(selector), None, None) => Ok(PageCommand::Remove {
                selector: selector.to_string(),
            }),
            (Some("set"), Some(selector), Some(state), None) => {
                let disabled = match state {
                    "disabled" => true,
                    "enabled" => false,
                    other => return Err(format!("unknown state {other:?}")),
                };
                Ok(PageCommand::SetDisabled {
                    selector: selector.to_string(),
                    disabled,
                })
            }
            _ => Err(format!("unrecognised command {:?}", line.trim())),
        }
    }

    pub fn selector(&self) -> Option<&str> {
        match self {
            PageCommand::SetDisabled { selector, .. } | PageCommand::Remove { selector } => {
                Some(selector)
            }
            PageCommand::Quit => None,
        }
    }
}
