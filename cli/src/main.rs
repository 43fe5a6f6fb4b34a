mod config;
mod repl;
mod transport;

use std::io;

use clap::Parser;
use todolist_core::{Gateway, Route, Shell, TodoClient};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::repl::Repl;
use crate::transport::UreqTransport;

fn main() -> eyre::Result<()> {
    // Logs go to stderr at `warn` unless RUST_LOG says otherwise, so they
    // stay out of the prompt.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let gateway = Gateway::new(TodoClient::new(&config.base_url), UreqTransport::new());
    tracing::info!(base_url = gateway.client().base_url(), "starting");

    let mut shell = Shell::new(gateway);
    if let Some(route) = &config.route {
        shell.navigate(Route::parse(route));
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(shell, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}
