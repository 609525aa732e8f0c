//! Keynodes command
//!
//! Usage: sc-cli keynodes [--config <FILE>] [--json]

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use sc_core::MemoryStore;

#[derive(Debug, Args)]
pub struct KeynodesArgs {
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the registry as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct KeynodeRow {
    idtf: String,
    addr: Option<u64>,
    kind: String,
}

/// Execute keynodes command
pub fn execute(args: KeynodesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(args.config.as_deref())?;
    let store = MemoryStore::new();
    let keynodes = sc_agent::initialize(&store, &config)?;

    let entries: Vec<KeynodeRow> = keynodes
        .entries()
        .into_iter()
        .map(|e| KeynodeRow {
            idtf: e.idtf,
            addr: e.addr.id().map(|id| id.get()),
            kind: e.expected.to_string(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for e in &entries {
            match e.addr {
                Some(addr) => println!("{:<28} {:<12} #{}", e.idtf, e.kind, addr),
                None => println!("{:<28} {:<12} #invalid", e.idtf, e.kind),
            }
        }
    }

    Ok(())
}
