use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use bopm_core::lattice::describe_lattice;

use super::ModelArgs;
use crate::output::lattice_grid;

/// Arguments for lattice construction
#[derive(Args, Debug)]
pub struct LatticeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Write the node grid, `price(probability)` per cell, to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn run_lattice(args: LatticeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cfg = args.model.resolve()?;
    let (lattice, summary) = describe_lattice(&cfg)?;

    if let Some(ref path) = args.export {
        lattice_grid::export_lattice_grid(&lattice, path)
            .map_err(|e| format!("Failed to export lattice to '{}': {}", path.display(), e))?;
        tracing::info!(path = %path.display(), nodes = lattice.node_count(), "lattice exported");
        // stdout carries the formatted summary
        eprintln!("{}", export_confirmation(path));
    }

    Ok(serde_json::to_value(summary)?)
}

fn export_confirmation(path: &Path) -> String {
    format!("{} lattice exported to {}", "ok".green().bold(), path.display())
}
