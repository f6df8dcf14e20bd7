//! Turns Caps Lock into an input language switch on Windows.
//!
//! A low-level keyboard hook sees every key press system-wide. Caps Lock presses that would turn
//! the toggle on are consumed and replaced by a `WM_INPUTLANGCHANGEREQUEST` to the focused
//! window; all other keys pass through untouched.

pub mod interceptor;
pub mod keys;
pub mod oskbd;
pub mod runner;

pub use interceptor::*;
pub use runner::*;

#[cfg(test)]
mod tests;
