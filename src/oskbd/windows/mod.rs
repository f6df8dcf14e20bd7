use std::io;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use winapi::ctypes::*;
use winapi::shared::minwindef::*;
use winapi::shared::windef::*;
use winapi::um::consoleapi::SetConsoleCtrlHandler;
use winapi::um::errhandlingapi::{GetLastError, SetLastError};
use winapi::um::processthreadsapi::GetCurrentThreadId;
use winapi::um::wincon::{CTRL_BREAK_EVENT, CTRL_CLOSE_EVENT, CTRL_C_EVENT};
use winapi::um::winuser::*;

use super::{HookCall, KeyHost, WindowHandle};
use crate::interceptor::KeyInterceptor;
use crate::runner::{MessagePump, run_hooked};

mod llhook;
pub use llhook::*;

/// The real user32 services.
#[derive(Debug, Default, Clone, Copy)]
pub struct WinHost;

impl KeyHost for WinHost {
    fn call_next_hook(&self, call: HookCall) -> isize {
        unsafe { CallNextHookEx(ptr::null_mut(), call.code, call.wparam, call.lparam) }
    }

    fn key_state(&self, vk: u32) -> io::Result<i16> {
        // GetKeyState has no failure return value; the last error is the only indicator.
        unsafe { SetLastError(0) };
        let state = unsafe { GetKeyState(vk as c_int) };
        match unsafe { GetLastError() } {
            0 => Ok(state),
            err => Err(io::Error::from_raw_os_error(err as i32)),
        }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_null()).then_some(WindowHandle(hwnd as isize))
    }

    fn post_message(
        &self,
        window: WindowHandle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> io::Result<()> {
        let ok = unsafe { PostMessageW(window.0 as HWND, msg, wparam, lparam) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

/// `GetMessageW` loop for the thread that installed the hook.
#[derive(Debug, Default)]
pub struct WinMessagePump;

impl MessagePump for WinMessagePump {
    fn run(&mut self) -> io::Result<()> {
        let mut msg: MSG = unsafe { mem::zeroed() };
        loop {
            match unsafe { GetMessageW(&mut msg, ptr::null_mut(), 0, 0) } {
                0 => return Ok(()),
                -1 => return Err(io::Error::last_os_error()),
                _ => unsafe {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                },
            }
        }
    }
}

static PUMP_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Routes Ctrl+C, Ctrl+Break and closing the console to a `WM_QUIT` on the calling thread's
/// message queue, so the message loop ends normally and the hook gets removed.
pub fn install_ctrl_handler() -> io::Result<()> {
    PUMP_THREAD_ID.store(unsafe { GetCurrentThreadId() }, Ordering::SeqCst);
    if unsafe { SetConsoleCtrlHandler(Some(ctrl_handler), TRUE) } == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

unsafe extern "system" fn ctrl_handler(ctrl_type: DWORD) -> BOOL {
    match ctrl_type {
        CTRL_C_EVENT | CTRL_BREAK_EVENT | CTRL_CLOSE_EVENT => {
            let tid = PUMP_THREAD_ID.load(Ordering::SeqCst);
            if tid != 0 && unsafe { PostThreadMessageW(tid, WM_QUIT, 0, 0) } != 0 {
                TRUE
            } else {
                FALSE
            }
        }
        _ => FALSE,
    }
}

/// Installs the hook on this thread and runs the message loop until quit.
pub fn start(min_interval: Duration) -> Result<()> {
    if let Err(e) = install_ctrl_handler() {
        log::warn!("could not register console control handler, Ctrl+C will not unhook: {e}");
    }
    let interceptor = KeyInterceptor::new(WinHost, min_interval);
    run_hooked(LlHookRegistrar::new(interceptor), &mut WinMessagePump)
}
