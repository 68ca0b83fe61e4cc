mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::{Cli, Commands};

fn init_logging(cli: &Cli) {
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    info!("motes starting");

    match cli.command {
        Commands::List => commands::list(),
        Commands::Run(args) => commands::run(&args),
        Commands::Memory { path } => commands::memory(&path),
        Commands::Recall { keyword, path } => commands::recall(&keyword, &path),
    }
}
