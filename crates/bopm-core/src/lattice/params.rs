use serde::{Deserialize, Serialize};

use crate::error::BopmError;
use crate::types::{Price, Probability, Rate, Years};
use crate::BopmResult;

/// Upper bound on the step count of a single lattice.
///
/// Memory and time grow with the square of the step count, and the
/// floating-point binomial coefficient overflows a little above 1030 steps.
pub const MAX_STEPS: usize = 1_000;

// ---------------------------------------------------------------------------
// Move specification
// ---------------------------------------------------------------------------

/// Per-step price move, as fractional changes relative to the current price.
///
/// The up factor is `1 + up_pct` and the down factor is `1 - down_pct`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSpec {
    /// One percentage applied both ways.
    Symmetric { pct: Rate },
    /// Independent up and down percentages.
    Asymmetric { up_pct: Rate, down_pct: Rate },
}

impl MoveSpec {
    /// Symmetric move implied by a single next-step price.
    pub fn symmetric_from_price(initial_price: Price, next_price: Price) -> Self {
        MoveSpec::Symmetric {
            pct: (next_price - initial_price) / initial_price,
        }
    }

    /// Asymmetric move implied by distinct next-step up and down prices.
    pub fn asymmetric_from_prices(initial_price: Price, up_price: Price, down_price: Price) -> Self {
        MoveSpec::Asymmetric {
            up_pct: (up_price - initial_price) / initial_price,
            down_pct: (initial_price - down_price) / initial_price,
        }
    }

    pub fn up_pct(&self) -> Rate {
        match *self {
            MoveSpec::Symmetric { pct } => pct,
            MoveSpec::Asymmetric { up_pct, .. } => up_pct,
        }
    }

    pub fn down_pct(&self) -> Rate {
        match *self {
            MoveSpec::Symmetric { pct } => pct,
            MoveSpec::Asymmetric { down_pct, .. } => down_pct,
        }
    }

    pub fn up_factor(&self) -> f64 {
        1.0 + self.up_pct()
    }

    pub fn down_factor(&self) -> f64 {
        1.0 - self.down_pct()
    }

    /// Probability `q = (1 + r/f - d) / (u - d)` under which the discounted
    /// one-step expected price equals today's price.
    ///
    /// `None` when the factors coincide or the result falls outside [0, 1]
    /// (the move specification admits arbitrage at this rate).
    pub fn risk_neutral_probability(&self, risk_free_rate: Rate, frequency: f64) -> Option<Probability> {
        let u = self.up_factor();
        let d = self.down_factor();
        if (u - d).abs() < f64::EPSILON || frequency <= 0.0 {
            return None;
        }
        let growth = 1.0 + risk_free_rate / frequency;
        let q = (growth - d) / (u - d);
        if q.is_finite() && (0.0..=1.0).contains(&q) {
            Some(q)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// Everything the lattice needs: where it starts, how it moves, how often and
/// for how long.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub initial_price: Price,
    pub moves: MoveSpec,
    pub probability_up: Probability,
    /// Moves per year.
    pub frequency: f64,
    pub maturity: Years,
}

impl ModelParameters {
    /// `frequency * maturity` before truncation.
    pub fn raw_steps(&self) -> f64 {
        self.frequency * self.maturity
    }

    /// Number of moves to maturity: `floor(frequency * maturity)`.
    ///
    /// A fractional product is truncated toward zero, which shortens the
    /// lattice by the dropped fraction of a period.
    pub fn steps(&self) -> usize {
        self.raw_steps().floor() as usize
    }

    /// True when `frequency * maturity` had a fractional part that `steps()`
    /// dropped.
    pub fn is_step_count_truncated(&self) -> bool {
        self.raw_steps().fract() > 0.0
    }

    pub fn validate(&self) -> BopmResult<()> {
        if !self.initial_price.is_finite() || self.initial_price <= 0.0 {
            return Err(BopmError::invalid("initial_price", "must be positive"));
        }
        if !self.probability_up.is_finite() || !(0.0..=1.0).contains(&self.probability_up) {
            return Err(BopmError::invalid(
                "probability_up",
                format!("must lie in [0, 1], got {}", self.probability_up),
            ));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(BopmError::invalid("frequency", "must be positive"));
        }
        if !self.maturity.is_finite() || self.maturity < 0.0 {
            return Err(BopmError::invalid("maturity", "must not be negative"));
        }

        let up = self.moves.up_factor();
        if !up.is_finite() || up <= 0.0 {
            return Err(BopmError::invalid(
                "moves",
                format!("up factor must be positive, got {up}"),
            ));
        }
        let down = self.moves.down_factor();
        if !down.is_finite() || down <= 0.0 {
            return Err(BopmError::invalid(
                "moves",
                format!("down factor must be positive, got {down}"),
            ));
        }

        if self.raw_steps() >= (MAX_STEPS + 1) as f64 {
            return Err(BopmError::invalid(
                "frequency",
                format!(
                    "frequency x maturity = {} exceeds the {MAX_STEPS}-step limit",
                    self.raw_steps()
                ),
            ));
        }
        Ok(())
    }
}
