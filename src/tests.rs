use std::cell::{Cell, RefCell};
use std::io;
use std::time::{Duration, Instant};

use crate::keys::*;
use crate::oskbd::{HookCall, HookEvent, KeyHost, WindowHandle};

mod lifetime_tests;

pub(crate) const NEXT_HOOK_RESULT: isize = 42;

fn init_log() {
    use simplelog::*;
    use std::sync::OnceLock;
    static LOG_INIT: OnceLock<()> = OnceLock::new();
    LOG_INIT.get_or_init(|| {
        let mut log_cfg = ConfigBuilder::new();
        if let Err(e) = log_cfg.set_time_offset_to_local() {
            eprintln!("WARNING: could not set log TZ to local: {e:?}");
        };
        log_cfg.set_time_format_rfc3339();
        CombinedLogger::init(vec![TermLogger::new(
            // Note: set to a different level to see logs in tests.
            LevelFilter::Off,
            log_cfg.build(),
            TerminalMode::Stderr,
            ColorChoice::AlwaysAnsi,
        )])
        .expect("logger can init");
    });
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum KeyStateReply {
    State(i16),
    Fail,
    Panic,
}

/// Records every host call; all answers are set through the public cells.
pub(crate) struct FakeHost {
    pub key_state: Cell<KeyStateReply>,
    pub foreground: Cell<Option<WindowHandle>>,
    pub post_fails: Cell<bool>,
    pub now: Cell<Instant>,
    pub key_state_queries: RefCell<Vec<u32>>,
    pub next_hook_calls: RefCell<Vec<HookCall>>,
    pub posts: RefCell<Vec<(WindowHandle, u32, usize, isize)>>,
}

impl FakeHost {
    pub fn new() -> Self {
        init_log();
        Self {
            key_state: Cell::new(KeyStateReply::State(0)),
            foreground: Cell::new(Some(WindowHandle(0x1234))),
            post_fails: Cell::new(false),
            now: Cell::new(Instant::now()),
            key_state_queries: RefCell::default(),
            next_hook_calls: RefCell::default(),
            posts: RefCell::default(),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    pub fn action_count(&self) -> usize {
        self.posts.borrow().len()
    }
}

impl KeyHost for FakeHost {
    fn call_next_hook(&self, call: HookCall) -> isize {
        self.next_hook_calls.borrow_mut().push(call);
        NEXT_HOOK_RESULT
    }

    fn key_state(&self, vk: u32) -> io::Result<i16> {
        self.key_state_queries.borrow_mut().push(vk);
        match self.key_state.get() {
            KeyStateReply::State(s) => Ok(s),
            KeyStateReply::Fail => Err(io::Error::from_raw_os_error(5)),
            KeyStateReply::Panic => panic!("key state query exploded"),
        }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.foreground.get()
    }

    fn post_message(
        &self,
        window: WindowHandle,
        msg: u32,
        wparam: usize,
        lparam: isize,
    ) -> io::Result<()> {
        if self.post_fails.get() {
            return Err(io::Error::from_raw_os_error(1400));
        }
        self.posts.borrow_mut().push((window, msg, wparam, lparam));
        Ok(())
    }

    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A hook call whose `lparam` points at the returned struct. Keep the box alive while the call
/// is in use.
pub(crate) fn key_call(msg: u32, vk: u32) -> (HookCall, Box<HookEvent>) {
    let raw = Box::new(HookEvent {
        vk_code: vk,
        scan_code: 0x3a,
        flags: if matches!(msg, WM_KEYUP | WM_SYSKEYUP) {
            LLKHF_UP
        } else {
            0
        },
        time: 0,
        extra_info: 0,
    });
    let call = HookCall {
        code: HC_ACTION,
        wparam: msg as usize,
        lparam: &*raw as *const HookEvent as isize,
    };
    (call, raw)
}
