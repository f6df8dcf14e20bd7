use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

use super::{KeyInterceptor, panic_message};
use crate::oskbd::{HookCall, KeyHost};

/// Process-wide home of the interceptor the OS callback dispatches to.
///
/// The callback has no user data pointer, so it finds its interceptor through a static slot.
/// The slot is filled while the hook is registered and empty otherwise.
pub struct InterceptorSlot<H: KeyHost> {
    inner: Mutex<Option<KeyInterceptor<H>>>,
}

impl<H: KeyHost> Default for InterceptorSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: KeyHost> InterceptorSlot<H> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Puts `interceptor` into an empty slot. Hands it back if the slot is already taken.
    pub fn fill(&self, interceptor: KeyInterceptor<H>) -> Result<(), KeyInterceptor<H>> {
        let mut slot = self.inner.lock();
        if slot.is_some() {
            return Err(interceptor);
        }
        *slot = Some(interceptor);
        Ok(())
    }

    pub fn take(&self) -> Option<KeyInterceptor<H>> {
        self.inner.lock().take()
    }

    /// Entry point of the hook procedure.
    ///
    /// `forward` hands the call to the next hook; it's used whenever the interceptor can't be
    /// reached. Never unwinds. If even `forward` panics twice in a row the event is passed on
    /// with a result of 0.
    ///
    /// # Safety
    ///
    /// See [`KeyInterceptor::handle`].
    pub unsafe fn dispatch(&self, call: HookCall, forward: impl Fn(HookCall) -> isize) -> isize {
        let res = panic::catch_unwind(AssertUnwindSafe(|| {
            // try_lock: the callback must never wait. A held lock means the hook was re-entered
            // on this thread, which must not touch the debounce state a second time.
            let Some(mut slot) = self.inner.try_lock() else {
                log::trace!("keyboard hook busy, forwarding");
                return forward(call);
            };
            match slot.as_mut() {
                Some(interceptor) => unsafe { interceptor.handle(call) },
                None => forward(call),
            }
        }));
        res.unwrap_or_else(|payload| {
            log::error!(
                "panic in keyboard hook procedure: {}",
                panic_message(&*payload)
            );
            panic::catch_unwind(AssertUnwindSafe(|| forward(call))).unwrap_or(0)
        })
    }
}
