//! # Playdeck - console entry point
//!
//! Configuration is layered: defaults, then the `--config` file, then
//! `PLAYDECK_*` environment variables, then `--api-url`.
//!
//! Views are single-threaded (`Rc`/`RefCell` state, `?Send` futures), so the
//! runtime is a current-thread one.

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use playdeck::{Cli, execute_command};
use playdeck_client::ClientConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = ClientConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.base_url = Some(api_url);
    }
    debug!(?config, "Configuration loaded");

    execute_command(cli.command, &config, &mut io::stdout()).await
}

/// Initialize tracing subscriber with environment filter.
///
/// Logs go to stderr so tables on stdout stay pipeable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
