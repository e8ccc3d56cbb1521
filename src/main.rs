use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod dispatch;
mod error;
mod output;
mod publish;
mod server;
mod worker;

#[cfg(test)]
mod testutil;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose picks debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("whispernet=debug")
        } else {
            EnvFilter::new("whispernet=info")
        }
    });

    // Logs go to stderr so stdout stays clean for JSON and summaries
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args).await,
        Commands::Dispatch(args) => cli::dispatch::execute(args).await,
        Commands::Worker(args) => cli::worker::execute(args).await,
        Commands::Schema => cli::schema::execute(),
    }
}
