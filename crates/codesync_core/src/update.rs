use crate::{AppState, Badge, Effect, Msg, SyncState, UpdateState, STATE_KEY};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Opened => vec![Effect::RestoreState {
            key: STATE_KEY.to_string(),
        }],
        Msg::StateRestored(raw) => {
            // A corrupt document is treated like a missing one; the next save overwrites it.
            let sync = raw
                .as_deref()
                .and_then(|json| SyncState::from_json(json).ok())
                .unwrap_or_default();
            let badge = Badge::for_sync(sync.is_sync_enabled);
            state.restore(sync);
            state.set_badge(badge);
            vec![Effect::SetBadge(badge)]
        }
        Msg::UrlEdited(url) => {
            state.set_url(url);
            if state.sync_state().is_sync_enabled {
                // Changing the source while syncing stops the sync first.
                state.set_sync_enabled(false);
                sync_changed(&mut state)
            } else {
                vec![save_state(&state)]
            }
        }
        Msg::SyncToggled(enabled) => {
            state.set_sync_enabled(enabled);
            sync_changed(&mut state)
        }
        Msg::AutoplayToggled(enabled) => {
            state.set_autoplay_enabled(enabled);
            vec![save_state(&state), send_update_state(&state)]
        }
        Msg::Reapply => {
            let badge = Badge::for_sync(state.sync_state().is_sync_enabled);
            state.set_badge(badge);
            vec![send_update_state(&state), Effect::SetBadge(badge)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn sync_changed(state: &mut AppState) -> Vec<Effect> {
    let badge = Badge::for_sync(state.sync_state().is_sync_enabled);
    state.set_badge(badge);
    vec![
        save_state(state),
        send_update_state(state),
        Effect::SetBadge(badge),
    ]
}

fn save_state(state: &AppState) -> Effect {
    Effect::SaveState {
        key: STATE_KEY.to_string(),
        value: state.sync_state().to_json(),
    }
}

fn send_update_state(state: &AppState) -> Effect {
    let sync = state.sync_state();
    Effect::SendUpdateState(UpdateState {
        url: sync.url.clone(),
        is_sync_enabled: sync.is_sync_enabled,
        is_autoplay_enabled: sync.is_autoplay_enabled,
    })
}
