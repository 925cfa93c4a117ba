//! Codesync core: persisted state, message protocol and the pure popup state machine.
mod effect;
mod msg;
mod protocol;
mod state;
mod update;
mod view_model;

pub use effect::{Badge, Effect};
pub use msg::Msg;
pub use protocol::{
    NotificationDetail, NotificationEvent, Request, Response, UpdateState, NOTIFICATION_EVENT,
    UPDATE_CODE_STATUS,
};
pub use state::{AppState, StateParseError, SyncState, DEFAULT_SOURCE_URL, STATE_KEY};
pub use update::update;
pub use view_model::AppViewModel;
