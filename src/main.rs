use anyhow::{Context, Result};
use clap::Parser;
use simplelog::*;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::Duration;

use capslang::DEFAULT_DEBOUNCE_MS;

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// capslang: Caps Lock as an input language switch
///
/// While running, pressing Caps Lock asks the focused window to switch to the
/// next input language instead of turning Caps Lock on. If Caps Lock is
/// already on, the press goes through so it can be turned off. All other keys
/// are left alone.
///
/// Press Ctrl+C to stop.
struct Args {
    /// Disable logging, except for errors. Takes precedent over debug and trace.
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,

    /// Also write logs to this file. The file is appended to.
    #[arg(long, value_name = "PATH", verbatim_doc_comment)]
    log_file: Option<PathBuf>,

    /// Minimum milliseconds between two language switches. Presses arriving
    /// sooner are swallowed without switching again.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_DEBOUNCE_MS, verbatim_doc_comment)]
    debounce_ms: u64,

    /// Remove the startup delay.
    /// In some cases, removing the delay may cause keyboard issues on startup.
    #[arg(short, long, verbatim_doc_comment)]
    nodelay: bool,
}

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
struct ValidatedArgs {
    debounce: Duration,
    nodelay: bool,
}

/// Parse CLI arguments and initialize logging.
fn cli_init() -> Result<ValidatedArgs> {
    let args = Args::parse();

    let log_lvl = match (args.debug, args.trace, args.quiet) {
        (_, _, true) => LevelFilter::Error,
        (_, true, false) => LevelFilter::Trace,
        (true, false, false) => LevelFilter::Debug,
        (false, false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Mixed,
        ColorChoice::AlwaysAnsi,
    )];
    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("could not open log file {}", path.display()))?;
        loggers.push(WriteLogger::new(log_lvl, log_cfg.build(), file));
    }
    CombinedLogger::init(loggers).context("logger can init")?;
    log::info!("capslang v{} starting", env!("CARGO_PKG_VERSION"));

    Ok(ValidatedArgs {
        debounce: Duration::from_millis(args.debounce_ms),
        nodelay: args.nodelay,
    })
}

#[cfg(target_os = "windows")]
fn main_impl() -> Result<()> {
    let args = cli_init()?;
    log::info!("debounce interval: {:?}", args.debounce);

    if !args.nodelay {
        log::info!("Sleeping for 2s. Please release all keys and don't press additional ones.");
        std::thread::sleep(Duration::from_secs(2));
    }

    capslang::oskbd::start(args.debounce)
}

#[cfg(not(target_os = "windows"))]
fn main_impl() -> Result<()> {
    let _args = cli_init()?;
    anyhow::bail!("capslang uses the Windows low-level keyboard hook and only runs on Windows")
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e:#}");
    }
    ret
}
