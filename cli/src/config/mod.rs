//! Invocation options for awake.
//!
//! Every flag is accepted in three spellings: the single-dash long form
//! (`-quiet`), the conventional double-dash form (`--quiet`) and a one-letter
//! shorthand (`-q`). Single-dash long forms are rewritten before `clap` parses
//! them, see [`normalize_args`].

use clap::{CommandFactory, Parser};
use std::ffi::{OsStr, OsString};
use std::time::Duration;


pub const APP_NAME: &str = "awake";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment marker carried by a relaunched background instance.
pub const BACKGROUND_ENV: &str = "AWAKE_BACKGROUND";

/// Long flag names that may also be written with a single dash.
const LONG_FLAGS: &[&str] = &["quiet", "debug", "version", "help", "time", "background"];

const EXAMPLES: &str = "\
Examples:
  awake                         # Prevent sleep until Ctrl+C
  awake -t 2h                   # Prevent sleep for 2 hours
  awake -q -t 30m               # Quietly prevent sleep for 30 minutes
  awake -b                      # Run in background indefinitely (use 'pkill awake' to stop)
  awake -b -t 2h                # Run in background for 2 hours
  awake -b -t 2h -q             # Run in background for 2 hours, quietly";

#[derive(Parser, Debug, PartialEq)]
#[command(name = APP_NAME)]
#[command(
    about = "A tool that prevents your Mac from sleeping using the caffeinate command.",
    long_about = None
)]
#[command(override_usage = "awake [options]")]
#[command(after_help = EXAMPLES)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Suppress all output
    #[arg(short = 'q', long = "quiet", default_value_t = false)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    pub debug: bool,

    /// Show version information
    #[arg(short = 'v', long = "version", default_value_t = false)]
    pub version: bool,

    /// Show help information
    #[arg(short = 'h', long = "help", default_value_t = false)]
    pub help: bool,

    /// Duration to prevent sleep (e.g. 1h30m)
    #[arg(
        short = 't',
        long = "time",
        value_name = "DURATION",
        value_parser = parse_duration
    )]
    pub time: Option<Duration>,

    /// Run in background mode
    #[arg(short = 'b', long = "background", default_value_t = false)]
    pub background: bool,
}

/// Resolved options for one invocation. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub quiet: bool,
    pub debug: bool,
    pub show_version: bool,
    pub show_help: bool,
    /// `None` means keep the machine awake until interrupted.
    pub duration: Option<Duration>,
    pub background: bool,
    /// This process was started by a background relaunch.
    pub relaunched: bool,
}

impl RunConfig {
    /// Resolve options from the process arguments and environment.
    pub fn from_env() -> Result<Self, clap::Error> {
        resolve(
            std::env::args_os(),
            std::env::var_os(BACKGROUND_ENV).as_deref(),
        )
    }

    pub fn from_cli(cli: Cli, relaunched: bool) -> Self {
        Self {
            quiet: cli.quiet,
            debug: cli.debug,
            show_version: cli.version,
            show_help: cli.help,
            duration: cli.time.filter(|d| !d.is_zero()),
            background: cli.background,
            relaunched,
        }
    }

    /// Whether this invocation should detach by relaunching itself.
    pub fn should_relaunch(&self) -> bool {
        self.background && !self.relaunched
    }

    /// Arguments for the detached copy of this process.
    ///
    /// The background flag is dropped and quiet is always set, since the
    /// detached process has no terminal to write to.
    pub fn relaunch_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("--quiet")];
        if self.debug {
            args.push("--debug".into());
        }
        if let Some(duration) = self.duration {
            args.push("--time".into());
            args.push(humantime::format_duration(duration).to_string().into());
        }
        args
    }

    /// The duration in whole seconds, as handed to `caffeinate -t`.
    pub fn inhibitor_seconds(&self) -> Option<u64> {
        self.duration.map(|d| d.as_secs().max(1))
    }
}

/// Parse `args` (program name first) into a [`RunConfig`].
///
/// `marker` is the value of [`BACKGROUND_ENV`], if set.
pub fn resolve<I, T>(args: I, marker: Option<&OsStr>) -> Result<RunConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = Cli::try_parse_from(normalize_args(args))?;
    Ok(RunConfig::from_cli(cli, marker.is_some_and(|v| v == "1")))
}

/// Rewrite single-dash long flags (`-time=2h`) into their double-dash form.
///
/// Anything after a literal `--` is passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for arg in args {
        let arg = arg.into();
        if !passthrough {
            if arg == "--" {
                passthrough = true;
            } else if let Some(long) = single_dash_long(&arg) {
                normalized.push(long);
                continue;
            }
        }
        normalized.push(arg);
    }

    normalized
}

fn single_dash_long(arg: &OsStr) -> Option<OsString> {
    let arg = arg.to_str()?;
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }

    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS
        .contains(&name)
        .then(|| OsString::from(format!("-{arg}")))
}

/// Parse a human readable span such as `1h30m`. A bare `0` means no limit.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if value == "0" {
        return Ok(Duration::ZERO);
    }

    humantime::parse_duration(value)
        .map_err(|e| format!("invalid duration '{}': {} (e.g. 1h30m, 45m, 90s)", value, e))
}

pub fn version_line() -> String {
    format!("{} v{}", APP_NAME, APP_VERSION)
}

pub fn render_help() -> String {
    Cli::command().render_help().to_string()
}
