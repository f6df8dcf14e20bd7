//! Win32 constants used by the interceptor.
//!
//! These are duplicated from winuser.h so that the decision logic compiles and can be tested on
//! every platform, not only where `winapi` is available.

// Taken from:
// https://github.com/retep998/winapi-rs/blob/0.3/src/um/winuser.rs
pub const HC_ACTION: i32 = 0;

pub const WM_INPUTLANGCHANGEREQUEST: u32 = 0x0050;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;

/// `lParam` of `WM_INPUTLANGCHANGEREQUEST` selecting the next installed layout.
pub const HKL_NEXT: isize = 1;

pub const VK_CAPITAL: u32 = 0x14;

pub const LLKHF_INJECTED: u32 = 0x10;
pub const LLKHF_UP: u32 = 0x80;

/// The one key this program intercepts.
pub const TARGET_VK: u32 = VK_CAPITAL;

/// Only initial presses are considered for interception; releases pass through.
pub fn is_key_down_msg(wparam: usize) -> bool {
    matches!(u32::try_from(wparam), Ok(WM_KEYDOWN | WM_SYSKEYDOWN))
}

pub fn key_msg_name(wparam: usize) -> &'static str {
    match u32::try_from(wparam) {
        Ok(WM_KEYDOWN) => "↓",
        Ok(WM_KEYUP) => "↑",
        Ok(WM_SYSKEYDOWN) => "sys↓",
        Ok(WM_SYSKEYUP) => "sys↑",
        _ => "?",
    }
}
