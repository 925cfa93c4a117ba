use codesync_core::{Effect, Msg, Request, Response};
use codesync_engine::{EngineHandle, SyncEvent};
use codesync_logging::{sync_debug, sync_info, sync_warn};

/// Executes popup effects against the engine, turning replies into messages.
pub struct EffectRunner<'a> {
    engine: &'a EngineHandle,
}

impl<'a> EffectRunner<'a> {
    pub fn new(engine: &'a EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::SaveState { key, value } => {
                sync_debug!("SaveState key={} len={}", key, value.len());
                self.engine.request(Request::SetItem { key, value });
                None
            }
            Effect::RestoreState { key } => {
                let reply = self.engine.request(Request::GetItem { key });
                let stored = match reply {
                    Some(Response::Value(value)) => value,
                    other => {
                        sync_warn!("Unexpected restore reply: {:?}", other);
                        None
                    }
                };
                Some(Msg::StateRestored(stored))
            }
            Effect::SendUpdateState(update) => {
                sync_info!(
                    "UpdateState url={} sync={} autoplay={}",
                    update.url,
                    update.is_sync_enabled,
                    update.is_autoplay_enabled
                );
                self.engine.request(Request::UpdateState(update));
                None
            }
            Effect::SetBadge(badge) => {
                sync_info!("Badge {:?} text={:?} color={}", badge, badge.text(), badge.color());
                None
            }
        }
    }
}

pub fn log_event(event: &SyncEvent) {
    match event {
        SyncEvent::FetchFailed { kind } => sync_debug!("Fetch failed: {}", kind),
        SyncEvent::ProgramUnchanged => sync_debug!("Program unchanged"),
        SyncEvent::PlaybackFailed { message } => sync_warn!("Playback failed: {}", message),
        SyncEvent::DebounceArmed => sync_debug!("Debounce armed"),
        other => sync_info!("{:?}", other),
    }
}
