//! `registry` command-line front end
//!
//! Loads configuration (file, then environment, then flags), builds the page
//! controllers over HTTP and runs one subcommand. Rows go to stdout;
//! notifications and logs go to stderr. Exits non-zero when any error
//! notification was raised.

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::ArgMatches;
use registry_client::ClientConfig;
use registry_pages::{App, Severity};
use std::process::ExitCode;

fn load_config(matches: &ArgMatches) -> Result<ClientConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("failed to load configuration from {path}"))?,
        None => ClientConfig::default(),
    };
    let mut config = config
        .with_env_overrides()
        .context("invalid environment override")?;
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = cli::build().get_matches();
    logging::init(matches.get_flag("json-logs"));

    let config = load_config(&matches)?;
    tracing::info!(base_url = %config.base_url, "using registry");

    let mut app = App::from_config(&config).context("failed to build HTTP client")?;
    let mut stdout = std::io::stdout().lock();
    commands::run(&mut app, &matches, &mut stdout).await?;

    let mut failed = false;
    for notice in commands::drain_notices(&mut app) {
        failed |= notice.severity == Severity::Error;
        eprintln!("[{}] {}", notice.severity, notice.message);
    }
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
