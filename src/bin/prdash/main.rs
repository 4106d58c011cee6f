mod display;

use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use display::display_sections;
use prdash::{Config, DisplayMode, GitHub, RunOptions, get_github_token, parse_args, triage};

fn handle_clap_help_version(clap_err: &clap::Error) -> ! {
    use clap::error::ErrorKind;
    match clap_err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{clap_err}");
            std::process::exit(0);
        }
        _ => {
            eprint!("{clap_err}");
            std::process::exit(2);
        }
    }
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(options: RunOptions, display_mode: DisplayMode) -> Result<()> {
    let mut config = Config::load(options.config_path.as_deref()).context("loading config")?;
    if let Some(timeout) = options.timeout {
        config.request_timeout_secs = timeout.as_secs();
    }

    let token = get_github_token()?;
    let github = GitHub::new(&config.api_url, token, config.request_timeout())?;

    let sections = triage(&github, &config).await?;

    let mut stdout = std::io::stdout().lock();
    display_sections(&sections, display_mode, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

#[tokio::main]
async fn main() {
    let (options, display_mode) = match parse_args(std::env::args_os()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            }
            eprintln!("prdash: {err:#}");
            std::process::exit(2);
        }
    };

    init_tracing(options.debug);

    if !options.color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(err) = run(options, display_mode).await {
        eprintln!("prdash: {err:#}");
        std::process::exit(1);
    }
}
