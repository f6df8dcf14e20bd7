use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::*;
use crate::runner::*;

#[derive(Default)]
struct Counts {
    installs: Cell<usize>,
    uninstalls: Cell<usize>,
    pump_runs: Cell<usize>,
}

struct FakeRegistrar {
    counts: Rc<Counts>,
    install_fails: bool,
    uninstall_fails: bool,
}

impl FakeRegistrar {
    fn new(counts: &Rc<Counts>) -> Self {
        init_log();
        Self {
            counts: counts.clone(),
            install_fails: false,
            uninstall_fails: false,
        }
    }
}

impl HookRegistrar for FakeRegistrar {
    fn install(&mut self) -> io::Result<()> {
        self.counts.installs.set(self.counts.installs.get() + 1);
        if self.install_fails {
            return Err(io::Error::from_raw_os_error(1428));
        }
        Ok(())
    }

    fn uninstall(&mut self) -> io::Result<()> {
        self.counts.uninstalls.set(self.counts.uninstalls.get() + 1);
        if self.uninstall_fails {
            return Err(io::Error::from_raw_os_error(1404));
        }
        Ok(())
    }
}

enum PumpEnd {
    Quit,
    RetrievalError,
    Panic,
}

struct FakePump {
    counts: Rc<Counts>,
    end: PumpEnd,
}

impl MessagePump for FakePump {
    fn run(&mut self) -> io::Result<()> {
        self.counts.pump_runs.set(self.counts.pump_runs.get() + 1);
        // The hook must be live while the pump runs.
        assert_eq!(self.counts.installs.get(), 1);
        assert_eq!(self.counts.uninstalls.get(), 0);
        match self.end {
            PumpEnd::Quit => Ok(()),
            PumpEnd::RetrievalError => Err(io::Error::from_raw_os_error(6)),
            PumpEnd::Panic => panic!("window procedure blew up"),
        }
    }
}

fn pump(counts: &Rc<Counts>, end: PumpEnd) -> FakePump {
    FakePump {
        counts: counts.clone(),
        end,
    }
}

#[test]
fn quit_unhooks_once() {
    let counts = Rc::new(Counts::default());
    run_hooked(FakeRegistrar::new(&counts), &mut pump(&counts, PumpEnd::Quit)).unwrap();
    assert_eq!(counts.installs.get(), 1);
    assert_eq!(counts.pump_runs.get(), 1);
    assert_eq!(counts.uninstalls.get(), 1);
}

#[test]
fn retrieval_error_unhooks_once_and_reports() {
    let counts = Rc::new(Counts::default());
    let err = run_hooked(
        FakeRegistrar::new(&counts),
        &mut pump(&counts, PumpEnd::RetrievalError),
    )
    .unwrap_err();
    assert!(err.to_string().contains("message loop"));
    assert_eq!(counts.uninstalls.get(), 1);
}

#[test]
fn panic_after_install_unhooks_once() {
    let counts = Rc::new(Counts::default());
    let mut p = pump(&counts, PumpEnd::Panic);
    let res = panic::catch_unwind(AssertUnwindSafe(|| {
        run_hooked(FakeRegistrar::new(&counts), &mut p)
    }));
    assert!(res.is_err());
    assert_eq!(counts.uninstalls.get(), 1);
}

#[test]
fn failed_install_never_pumps_or_unhooks() {
    let counts = Rc::new(Counts::default());
    let mut registrar = FakeRegistrar::new(&counts);
    registrar.install_fails = true;
    let err = run_hooked(registrar, &mut pump(&counts, PumpEnd::Quit)).unwrap_err();
    assert!(err.to_string().contains("install"));
    assert_eq!(counts.pump_runs.get(), 0);
    assert_eq!(counts.uninstalls.get(), 0);
}

#[test]
fn failed_uninstall_is_not_fatal() {
    let counts = Rc::new(Counts::default());
    let mut registrar = FakeRegistrar::new(&counts);
    registrar.uninstall_fails = true;
    run_hooked(registrar, &mut pump(&counts, PumpEnd::Quit)).unwrap();
    assert_eq!(counts.uninstalls.get(), 1);
}

#[test]
fn guard_drop_unhooks_once() {
    let counts = Rc::new(Counts::default());
    let hook = InstalledHook::install(FakeRegistrar::new(&counts)).unwrap();
    assert_eq!(counts.uninstalls.get(), 0);
    drop(hook);
    assert_eq!(counts.uninstalls.get(), 1);
}
