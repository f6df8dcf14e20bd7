//! Hook lifetime: install once, pump messages, uninstall once on every exit path.

use std::io;

use anyhow::{Context, Result};

/// Registers and removes the OS keyboard hook.
pub trait HookRegistrar {
    fn install(&mut self) -> io::Result<()>;
    fn uninstall(&mut self) -> io::Result<()>;
}

/// Native message loop. The hook callback is only invoked while this is running.
pub trait MessagePump {
    /// Runs until a quit message (`Ok`) or a message retrieval error (`Err`).
    fn run(&mut self) -> io::Result<()>;
}

/// An installed hook. Automatically unregisters the hook when dropped.
pub struct InstalledHook<R: HookRegistrar> {
    registrar: R,
}

impl<R: HookRegistrar> InstalledHook<R> {
    #[must_use = "The hook will immediately be unregistered and not work."]
    pub fn install(mut registrar: R) -> io::Result<Self> {
        registrar.install()?;
        log::info!("keyboard hook installed");
        Ok(Self { registrar })
    }
}

impl<R: HookRegistrar> Drop for InstalledHook<R> {
    fn drop(&mut self) {
        log::info!("removing keyboard hook");
        match self.registrar.uninstall() {
            Ok(()) => log::info!("keyboard hook removed"),
            Err(e) => log::error!("failed to remove keyboard hook: {e}"),
        }
    }
}

/// Installs the hook and runs the message pump until it stops.
///
/// If installation fails the pump is never started. Once installed, the hook is removed however
/// the pump ends, including by panic.
pub fn run_hooked<R, P>(registrar: R, pump: &mut P) -> Result<()>
where
    R: HookRegistrar,
    P: MessagePump,
{
    let _hook =
        InstalledHook::install(registrar).context("failed to install the keyboard hook")?;
    pump.run().context("message loop stopped on a retrieval error")?;
    log::info!("received WM_QUIT, exiting");
    Ok(())
}
