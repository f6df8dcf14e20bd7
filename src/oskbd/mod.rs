//! Platform specific code for the low level keyboard hook.
//!
//! The types in this module describe a hook invocation and the OS services the interceptor
//! needs. The Windows implementation lives in the `windows` submodule; everything else only
//! depends on these definitions.

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
pub use windows::*;

use core::fmt;
use std::io;
use std::time::Instant;

use crate::keys::*;

/// Arguments of a single low-level keyboard hook invocation, exactly as the OS passed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookCall {
    pub code: i32,
    pub wparam: usize,
    pub lparam: isize,
}

/// Key event received by the low level keyboard hook.
///
/// Same layout as the Win32 `KBDLLHOOKSTRUCT` that `lparam` points to. The hook only ever holds
/// a copy, so it can't outlive the callback's view of the OS-owned memory.
/// source: https://learn.microsoft.com/windows/win32/api/winuser/ns-winuser-kbdllhookstruct
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookEvent {
    pub vk_code: u32,
    pub scan_code: u32,
    pub flags: u32,
    pub time: u32,
    pub extra_info: usize,
}

impl HookEvent {
    pub fn is_up(&self) -> bool {
        self.flags & LLKHF_UP != 0
    }

    pub fn is_injected(&self) -> bool {
        self.flags & LLKHF_INJECTED != 0
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let direction = if self.is_up() { "↑" } else { "↓" };
        write!(
            f,
            "{direction}vk={:#04x} sc={:#04x} flags={:#04x} t={}",
            self.vk_code, self.scan_code, self.flags, self.time
        )
    }
}

impl HookCall {
    /// Reads the event data `lparam` points to. Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `lparam` must be null or point to a `KBDLLHOOKSTRUCT` that stays valid for the duration of
    /// this call. The OS guarantees this for `HC_ACTION` invocations of a `WH_KEYBOARD_LL` hook.
    pub unsafe fn event(&self) -> Option<HookEvent> {
        unsafe { (self.lparam as *const HookEvent).as_ref() }.copied()
    }
}

/// Opaque top-level window identifier (`HWND`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub isize);

/// OS services used from inside the hook callback.
///
/// None of these may block for long: they run while system-wide keyboard input is waiting on the
/// hook's verdict.
pub trait KeyHost {
    /// Hands the invocation to the next hook in the chain and returns its result.
    fn call_next_hook(&self, call: HookCall) -> isize;

    /// Raw `GetKeyState` value for `vk`. The low bit is the toggle state.
    fn key_state(&self, vk: u32) -> io::Result<i16>;

    /// The window that currently has focus, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Posts a message without waiting for the window to process it.
    fn post_message(
        &self,
        window: WindowHandle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> io::Result<()>;

    fn now(&self) -> Instant {
        Instant::now()
    }
}
