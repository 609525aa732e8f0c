//! sc-cli
//!
//! Drives a full command round trip against an in-memory graph

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "sc-cli")]
#[command(about = "sc-agent - command/action protocol over a semantic graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create, initiate and dispatch one command, then print its result
    Run(commands::run::RunArgs),
    /// Bootstrap the keynode registry and list it
    Keynodes(commands::keynodes::KeynodesArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Keynodes(args) => commands::keynodes::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
