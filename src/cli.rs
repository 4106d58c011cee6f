use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// How the sections are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Full block per PR: author, title, URL, timeline and status flags.
    Normal,
    /// Section headers and PR URLs only.
    Quiet,
}

/// Settings for one run, taken from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Config file to read instead of the default location.
    pub config_path: Option<PathBuf>,
    /// Overrides `request_timeout_secs` from the config file.
    pub timeout: Option<Duration>,
    pub color: bool,
    pub debug: bool,
}

#[derive(Parser, Default, Debug)]
#[command(
    name = "prdash",
    about = "Show open PRs for you and your team, grouped by who needs to act next"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Config file (default: <config dir>/prdash/config.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Per-request timeout (e.g. 30, 30s, 2m; unitless implies seconds)
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Print section headers and PR URLs only
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

fn parse_timeout(timeout_str: &str) -> Result<Duration> {
    let timeout_str = timeout_str.trim();

    let duration = if let Ok(seconds) = timeout_str.parse::<u64>() {
        Duration::from_secs(seconds)
    } else if let Some(seconds_str) = timeout_str.strip_suffix('s') {
        let seconds: u64 = seconds_str
            .parse()
            .with_context(|| format!("Invalid timeout seconds: '{}'", seconds_str))?;
        Duration::from_secs(seconds)
    } else if let Some(minutes_str) = timeout_str.strip_suffix('m') {
        let minutes: u64 = minutes_str
            .parse()
            .with_context(|| format!("Invalid timeout minutes: '{}'", minutes_str))?;
        let seconds = minutes
            .checked_mul(60)
            .with_context(|| format!("Timeout too large: '{}'", timeout_str))?;
        Duration::from_secs(seconds)
    } else {
        anyhow::bail!(
            "Invalid timeout format '{}'. Supported formats: seconds, '30s', '2m'",
            timeout_str
        )
    };

    if duration.is_zero() {
        anyhow::bail!("Timeout must be greater than zero");
    }

    Ok(duration)
}

fn determine_display_mode(cli: &CliArgs) -> DisplayMode {
    if cli.quiet {
        DisplayMode::Quiet
    } else {
        DisplayMode::Normal
    }
}

fn build_options_from_cli(cli: CliArgs) -> Result<(RunOptions, DisplayMode)> {
    let display_mode = determine_display_mode(&cli);
    let timeout = cli.timeout.as_deref().map(parse_timeout).transpose()?;

    Ok((
        RunOptions {
            config_path: cli.config,
            timeout,
            color: !cli.no_color,
            debug: cli.debug,
        },
        display_mode,
    ))
}

/// Parses command-line arguments into run options and a display mode.
///
/// Help and version requests surface as a `clap::Error` inside the returned
/// error so the caller can decide how to exit.
pub fn parse_args<I, T>(args: I) -> Result<(RunOptions, DisplayMode)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_options_from_cli(cli)
}
