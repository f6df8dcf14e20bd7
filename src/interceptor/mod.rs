//! The hook callback's decision logic: filter, key-state check, debounce, substitute action.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::keys::*;
use crate::oskbd::{HookCall, KeyHost};

mod action;
mod debounce;
mod key_state;
mod slot;

pub use action::*;
pub use debounce::*;
pub use key_state::*;
pub use slot::*;

/// `LRESULT` telling the OS the event was consumed.
pub const SUPPRESS_RESULT: isize = 1;

/// The outcome for one hook invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Consume the event: it reaches neither later hooks nor the focused application.
    Suppress,
    /// Pass the unchanged parameters to the next hook and return its result.
    Forward,
}

/// Turns target key presses into input language switches.
///
/// Owns the debounce state; everything else is queried from the host on each call.
pub struct KeyInterceptor<H: KeyHost> {
    host: H,
    gate: DebounceGate,
}

impl<H: KeyHost> KeyInterceptor<H> {
    pub fn new(host: H, min_interval: Duration) -> Self {
        Self {
            host,
            gate: DebounceGate::new(min_interval),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    /// Processes one hook invocation and returns the `LRESULT` for the OS.
    ///
    /// Never panics: a panic while deciding is logged and the event is forwarded as if it had
    /// not been looked at.
    ///
    /// # Safety
    ///
    /// Same contract as [`HookCall::event`]: for `HC_ACTION` calls, `lparam` must be null or
    /// point to a valid `KBDLLHOOKSTRUCT` for the duration of the call.
    pub unsafe fn handle(&mut self, call: HookCall) -> isize {
        #[cfg(feature = "perf_logging")]
        let start = std::time::Instant::now();

        let decided = panic::catch_unwind(AssertUnwindSafe(|| unsafe { self.decide(call) }));
        let verdict = decided.unwrap_or_else(|payload| {
            log::error!(
                "panic in keyboard hook, forwarding event: {}",
                panic_message(&*payload)
            );
            Verdict::Forward
        });

        #[cfg(feature = "perf_logging")]
        log::debug!(
            "🕐{}μs hook verdict {verdict:?}",
            start.elapsed().as_micros()
        );

        match verdict {
            Verdict::Suppress => SUPPRESS_RESULT,
            Verdict::Forward => self.host.call_next_hook(call),
        }
    }

    /// # Safety
    ///
    /// See [`KeyInterceptor::handle`].
    pub unsafe fn decide(&mut self, call: HookCall) -> Verdict {
        // Negative codes must go to CallNextHookEx without further processing, and lparam is
        // only meaningful for HC_ACTION.
        // Source: https://learn.microsoft.com/windows/win32/winmsg/lowlevelkeyboardproc
        if call.code != HC_ACTION {
            return Verdict::Forward;
        }
        let Some(event) = (unsafe { call.event() }) else {
            log::warn!("keyboard hook called with null event data");
            return Verdict::Forward;
        };
        log::trace!(
            "{} {event} injected={}",
            key_msg_name(call.wparam),
            event.is_injected()
        );

        if !is_key_down_msg(call.wparam) || event.vk_code != TARGET_VK {
            return Verdict::Forward;
        }

        // Only the transition into the toggled state is intercepted. If the toggle is already
        // on, the press is needed to turn it off.
        if is_target_key_active(&self.host) {
            log::debug!("caps lock is on, letting the press through");
            return Verdict::Forward;
        }

        let now = self.host.now();
        if self.gate.should_accept(now) {
            if let Err(e) = trigger_substitute_action(&self.host) {
                log::warn!("{e}");
            }
            self.gate.record_accepted(now);
        } else {
            log::debug!(
                "caps lock press within {:?} of the last switch, dropped",
                self.gate.min_interval()
            );
        }
        Verdict::Suppress
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}
