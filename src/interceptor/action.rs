use std::io;

use thiserror::Error;

use crate::keys::{HKL_NEXT, WM_INPUTLANGCHANGEREQUEST};
use crate::oskbd::KeyHost;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("could not post input language change request to window {window:#x}: {source}")]
    Post {
        window: isize,
        #[source]
        source: io::Error,
    },
}

/// Asks the focused window to switch to the next input language.
///
/// Fire-and-forget: the request is posted, not sent, so a hung application can't stall the hook.
/// Having no focused window (e.g. the desktop is active) is not an error.
pub fn trigger_substitute_action<H: KeyHost + ?Sized>(host: &H) -> Result<(), ActionError> {
    let Some(window) = host.foreground_window() else {
        log::info!("no foreground window, skipping input language switch");
        return Ok(());
    };
    host.post_message(window, WM_INPUTLANGCHANGEREQUEST, 0, HKL_NEXT)
        .map_err(|source| ActionError::Post {
            window: window.0,
            source,
        })?;
    log::debug!("requested input language switch for window {:#x}", window.0);
    Ok(())
}
