//! Messages exchanged between the popup, the main frame and the player frame,
//! and the event dispatched into the IDE page.
use serde::{Deserialize, Serialize};

/// Name of the document event the IDE listens on for external edits.
pub const NOTIFICATION_EVENT: &str = "ExternalEditorToIDE";
/// `status` value telling the IDE to replace its editor contents.
pub const UPDATE_CODE_STATUS: &str = "updateCode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateState {
    pub url: String,
    pub is_sync_enabled: bool,
    pub is_autoplay_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "message", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Request {
    SetItem { key: String, value: String },
    GetItem { key: String },
    UpdateState(UpdateState),
    /// One-way broadcast to the player frame; no reply expected.
    UpdateAutoplayEnabled { is_autoplay_enabled: bool },
}

/// Reply to a [`Request`]. `Ack` serializes as `null`, like an empty `sendResponse()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Ack,
    Value(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDetail {
    pub status: String,
    pub code: String,
}

/// Custom DOM event carrying a new program to the IDE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "type")]
    pub name: String,
    pub detail: NotificationDetail,
}

impl NotificationEvent {
    pub fn update_code(code: impl Into<String>) -> Self {
        Self {
            name: NOTIFICATION_EVENT.to_string(),
            detail: NotificationDetail {
                status: UPDATE_CODE_STATUS.to_string(),
                code: code.into(),
            },
        }
    }

    /// Program text if this is an `updateCode` event.
    pub fn code(&self) -> Option<&str> {
        (self.detail.status == UPDATE_CODE_STATUS).then_some(self.detail.code.as_str())
    }
}
