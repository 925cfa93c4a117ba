use thiserror::Error;

use crate::{Page, PageError, PlaybackAction, Selectors};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback control missing: {0}")]
    MissingControl(String),
    #[error(transparent)]
    Page(#[from] PageError),
}

/// Replays the last run when the replay control is usable, otherwise starts a fresh one.
pub fn trigger_playback(
    page: &dyn Page,
    selectors: &Selectors,
) -> Result<PlaybackAction, PlaybackError> {
    if let Some(replay) = page.control(&selectors.replay) {
        if !replay.disabled {
            page.click(&selectors.replay)?;
            return Ok(PlaybackAction::Replay);
        }
    }
    if !page.has_control(&selectors.play) {
        return Err(PlaybackError::MissingControl(selectors.play.clone()));
    }
    page.click(&selectors.play)?;
    Ok(PlaybackAction::Play)
}
