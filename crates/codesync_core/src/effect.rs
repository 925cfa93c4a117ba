use crate::UpdateState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist `value` under `key` in the page's store (`set-item`).
    SaveState { key: String, value: String },
    /// Ask the page for the stored value under `key` (`get-item`).
    RestoreState { key: String },
    /// Push the current configuration to the sync loop (`update-state`).
    SendUpdateState(UpdateState),
    SetBadge(Badge),
}

/// Toolbar badge shown while sync is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Badge {
    On,
    #[default]
    Off,
}

impl Badge {
    pub fn for_sync(enabled: bool) -> Self {
        if enabled {
            Badge::On
        } else {
            Badge::Off
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Badge::On => "\u{25b2}",
            Badge::Off => "",
        }
    }

    /// Background colour as `#rrggbbaa`.
    pub fn color(self) -> &'static str {
        match self {
            Badge::On => "#79d55d",
            Badge::Off => "#00000000",
        }
    }
}
