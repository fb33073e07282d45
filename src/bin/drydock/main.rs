//! Drydock CLI - inspect and verify C-family toolchains

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod detect;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("drydock=debug")
    } else {
        EnvFilter::new("drydock=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let no_color = cli.no_color;

    // Execute command
    match cli.command {
        Commands::Show(args) => commands::show::execute(args),
        Commands::Check(args) => commands::check::execute(args, no_color),
        Commands::Flags(args) => commands::flags::execute(args, no_color),
        Commands::Options(args) => commands::options::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
