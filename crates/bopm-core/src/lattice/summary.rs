use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::PricingConfig;
use crate::lattice::builder::{build_lattice, Lattice, Node, TerminalDistribution};
use crate::types::*;
use crate::BopmResult;

/// Serialisable view of a built lattice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeOutput {
    pub steps: usize,
    pub up_factor: f64,
    pub down_factor: f64,
    pub node_count: usize,
    pub terminal: TerminalDistribution,
    /// Every node, level by level, down-move order within a level.
    pub nodes: Vec<Node>,
}

/// Build the lattice described by `config` and summarise it.
///
/// The lattice itself is handed back too so callers can export the full
/// grid without rebuilding it. Strike and rate play no part here.
pub fn describe_lattice(
    config: &PricingConfig,
) -> BopmResult<(Lattice, ComputationOutput<LatticeOutput>)> {
    let start = Instant::now();
    let params = config.model_parameters();
    let lattice = build_lattice(&params)?;

    let output = LatticeOutput {
        steps: lattice.steps(),
        up_factor: params.moves.up_factor(),
        down_factor: params.moves.down_factor(),
        node_count: lattice.node_count(),
        terminal: lattice.terminal(),
        nodes: lattice.nodes().copied().collect(),
    };

    let mut warnings = Vec::new();
    if params.is_step_count_truncated() {
        warnings.push(format!(
            "frequency x maturity = {} truncated to {} steps",
            params.raw_steps(),
            output.steps
        ));
    }

    let assumptions = serde_json::json!({
        "initial_price": params.initial_price,
        "moves": params.moves,
        "probability_up": params.probability_up,
        "frequency": params.frequency,
        "maturity": params.maturity,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    let summary = with_metadata(
        "Recombining binomial lattice (closed-form nodes)",
        &assumptions,
        warnings,
        elapsed,
        output,
    );
    Ok((lattice, summary))
}
