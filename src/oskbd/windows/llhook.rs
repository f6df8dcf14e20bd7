//! Safe abstraction over the low-level windows keyboard hook API.

use std::io;
use std::ptr;

use once_cell::sync::Lazy;
use winapi::ctypes::*;
use winapi::shared::minwindef::*;
use winapi::shared::windef::*;
use winapi::um::winuser::*;

use super::WinHost;
use crate::interceptor::{InterceptorSlot, KeyInterceptor};
use crate::oskbd::HookCall;
use crate::runner::HookRegistrar;

/// The interceptor the hook procedure dispatches to. Filled while the hook is registered.
static INTERCEPTOR: Lazy<InterceptorSlot<WinHost>> = Lazy::new(InterceptorSlot::new);

/// Registers `WH_KEYBOARD_LL` for this thread with `hook_proc` as the callback.
pub struct LlHookRegistrar {
    pending: Option<KeyInterceptor<WinHost>>,
    handle: HHOOK,
}

impl LlHookRegistrar {
    pub fn new(interceptor: KeyInterceptor<WinHost>) -> Self {
        Self {
            pending: Some(interceptor),
            handle: ptr::null_mut(),
        }
    }
}

fn already_registered() -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        "only one keyboard hook can be registered per process",
    )
}

impl HookRegistrar for LlHookRegistrar {
    fn install(&mut self) -> io::Result<()> {
        if !self.handle.is_null() {
            return Err(already_registered());
        }
        let interceptor = self.pending.take().ok_or_else(already_registered)?;
        if let Err(interceptor) = INTERCEPTOR.fill(interceptor) {
            self.pending = Some(interceptor);
            return Err(already_registered());
        }

        let handle = unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(hook_proc), ptr::null_mut(), 0) };
        if handle.is_null() {
            let err = io::Error::last_os_error();
            self.pending = INTERCEPTOR.take();
            return Err(err);
        }
        self.handle = handle;
        Ok(())
    }

    fn uninstall(&mut self) -> io::Result<()> {
        if self.handle.is_null() {
            return Ok(());
        }
        let ok = unsafe { UnhookWindowsHookEx(self.handle) };
        let res = if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        };
        self.handle = ptr::null_mut();
        INTERCEPTOR.take();
        res
    }
}

/// The actual WinAPI compatible callback.
///
/// code: <0 must be passed to CallNextHookEx without further processing,
///   HC_ACTION (=0) means wparam and lparam describe a keyboard event.
/// wparam: WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN or WM_SYSKEYUP.
/// lparam: pointer to a KBDLLHOOKSTRUCT owned by the OS for the duration of the call.
/// source: https://learn.microsoft.com/windows/win32/winmsg/lowlevelkeyboardproc
///
/// Nothing may unwind out of this function into the OS frames that called it.
unsafe extern "system" fn hook_proc(code: c_int, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let call = HookCall {
        code,
        wparam,
        lparam,
    };
    unsafe { INTERCEPTOR.dispatch(call, forward) }
}

fn forward(call: HookCall) -> LRESULT {
    unsafe { CallNextHookEx(ptr::null_mut(), call.code, call.wparam, call.lparam) }
}
