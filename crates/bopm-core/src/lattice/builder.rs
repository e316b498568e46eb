use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BopmError;
use crate::lattice::params::ModelParameters;
use crate::math::binomial_coefficient;
use crate::types::{Price, Probability};
use crate::BopmResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// State after `step` moves, `down_moves` of which were down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub step: usize,
    pub down_moves: usize,
    pub price: Price,
    pub probability: Probability,
}

impl Node {
    pub fn up_moves(&self) -> usize {
        self.step - self.down_moves
    }
}

/// All nodes reachable after `step` moves, ordered by down-move count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeLevel {
    pub step: usize,
    pub nodes: Vec<Node>,
}

impl LatticeLevel {
    pub fn prices(&self) -> Vec<Price> {
        self.nodes.iter().map(|n| n.price).collect()
    }

    pub fn probabilities(&self) -> Vec<Probability> {
        self.nodes.iter().map(|n| n.probability).collect()
    }

    /// Sum of node probabilities; 1 up to rounding.
    pub fn probability_mass(&self) -> f64 {
        self.nodes.iter().map(|n| n.probability).sum()
    }
}

/// Prices and probabilities at maturity, paired index-for-index.
/// Index `j` is the node with `j` down-moves.
///
/// Deserialization goes through [`TerminalDistribution::new`], so a decoded
/// value is always non-empty with equal-length vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTerminalDistribution")]
pub struct TerminalDistribution {
    prices: Vec<Price>,
    probabilities: Vec<Probability>,
}

#[derive(Deserialize)]
struct RawTerminalDistribution {
    prices: Vec<Price>,
    probabilities: Vec<Probability>,
}

impl TryFrom<RawTerminalDistribution> for TerminalDistribution {
    type Error = BopmError;

    fn try_from(raw: RawTerminalDistribution) -> BopmResult<Self> {
        TerminalDistribution::new(raw.prices, raw.probabilities)
    }
}

impl TerminalDistribution {
    /// Pair externally supplied vectors. They must be non-empty and the same
    /// length.
    pub fn new(prices: Vec<Price>, probabilities: Vec<Probability>) -> BopmResult<Self> {
        if prices.len() != probabilities.len() {
            return Err(BopmError::ShapeMismatch {
                prices: prices.len(),
                probabilities: probabilities.len(),
            });
        }
        if prices.is_empty() {
            return Err(BopmError::InsufficientData(
                "terminal distribution requires at least one node".into(),
            ));
        }
        Ok(TerminalDistribution {
            prices,
            probabilities,
        })
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn probabilities(&self) -> &[Probability] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of compounding periods to maturity.
    pub fn steps(&self) -> usize {
        self.prices.len() - 1
    }

    /// `(price, probability)` pairs in down-move order.
    pub fn iter(&self) -> impl Iterator<Item = (Price, Probability)> + '_ {
        self.prices
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Probability-weighted mean terminal price.
    pub fn expected_price(&self) -> Price {
        self.iter().map(|(s, p)| s * p).sum()
    }

    pub fn into_parts(self) -> (Vec<Price>, Vec<Probability>) {
        (self.prices, self.probabilities)
    }
}

/// Full recombining lattice for one pricing run. Built once, read thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    params: ModelParameters,
    levels: Vec<LatticeLevel>,
}

impl Lattice {
    pub fn parameters(&self) -> &ModelParameters {
        &self.params
    }

    pub fn steps(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn levels(&self) -> &[LatticeLevel] {
        &self.levels
    }

    pub fn level(&self, step: usize) -> Option<&LatticeLevel> {
        self.levels.get(step)
    }

    pub fn node(&self, step: usize, down_moves: usize) -> Option<&Node> {
        self.levels.get(step)?.nodes.get(down_moves)
    }

    /// Every node, level by level.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.levels.iter().flat_map(|level| level.nodes.iter())
    }

    pub fn node_count(&self) -> usize {
        let n = self.levels.len();
        n * (n + 1) / 2
    }

    pub fn terminal_level(&self) -> &LatticeLevel {
        &self.levels[self.levels.len() - 1]
    }

    pub fn terminal(&self) -> TerminalDistribution {
        let level = self.terminal_level();
        TerminalDistribution {
            prices: level.prices(),
            probabilities: level.probabilities(),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Node (i, j) in closed form:
/// price `S0 * u^(i-j) * d^j`, probability `C(i, j) * p^(i-j) * (1-p)^j`.
fn node_at(
    initial_price: Price,
    up: f64,
    down: f64,
    p: Probability,
    step: usize,
    down_moves: usize,
) -> Node {
    let ups = (step - down_moves) as i32;
    let downs = down_moves as i32;
    Node {
        step,
        down_moves,
        price: initial_price * up.powi(ups) * down.powi(downs),
        probability: binomial_coefficient(step, down_moves) * p.powi(ups) * (1.0 - p).powi(downs),
    }
}

/// Build the lattice level by level for `floor(frequency * maturity)` steps.
///
/// Parameters are validated first; nothing is built on invalid input. Each
/// node is computed independently of its neighbours, O(N^2) overall.
pub fn build_lattice(params: &ModelParameters) -> BopmResult<Lattice> {
    params.validate()?;

    let steps = params.steps();
    let up = params.moves.up_factor();
    let down = params.moves.down_factor();
    let p = params.probability_up;

    let levels: Vec<LatticeLevel> = (0..=steps)
        .map(|i| LatticeLevel {
            step: i,
            nodes: (0..=i)
                .map(|j| node_at(params.initial_price, up, down, p, i, j))
                .collect(),
        })
        .collect();

    debug!(steps, up, down, probability_up = p, "built binomial lattice");

    Ok(Lattice {
        params: *params,
        levels,
    })
}
