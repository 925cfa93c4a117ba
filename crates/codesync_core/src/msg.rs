#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Popup opened; the stored state has to be fetched from the page.
    Opened,
    /// Reply to the restore request: the raw stored document, if any.
    StateRestored(Option<String>),
    /// User edited the source URL input.
    UrlEdited(String),
    /// User flipped the sync checkbox.
    SyncToggled(bool),
    /// User flipped the autoplay checkbox.
    AutoplayToggled(bool),
    /// Pushes the current state to the page again without changing it.
    Reapply,
    /// Fallback for placeholder wiring.
    NoOp,
}
