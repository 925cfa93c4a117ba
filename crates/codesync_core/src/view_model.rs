use crate::Badge;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url: String,
    /// Whether `url` parses as an absolute URL. Informational only.
    pub url_is_valid: bool,
    pub sync_enabled: bool,
    pub autoplay_enabled: bool,
    pub badge: Badge,
    /// Set once the stored state has been loaded from the page.
    pub restored: bool,
    pub dirty: bool,
}
