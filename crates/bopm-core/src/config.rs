use serde::{Deserialize, Serialize};

use crate::error::BopmError;
use crate::lattice::{ModelParameters, MoveSpec};
use crate::types::{OptionKind, Price, Probability, Rate, Years};
use crate::BopmResult;

/// How the per-step move is specified.
///
/// The price-based conventions derive their percentages from the initial
/// price when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "convention", rename_all = "snake_case")]
pub enum MoveInput {
    /// One next-step price; the implied move is applied both ways.
    NextPrice { next_price: Price },
    /// Distinct next-step up and down prices.
    UpDownPrices { up_price: Price, down_price: Price },
    SymmetricPct { pct: Rate },
    AsymmetricPct { up_pct: Rate, down_pct: Rate },
}

impl MoveInput {
    pub fn resolve(&self, initial_price: Price) -> MoveSpec {
        match *self {
            MoveInput::NextPrice { next_price } => {
                MoveSpec::symmetric_from_price(initial_price, next_price)
            }
            MoveInput::UpDownPrices {
                up_price,
                down_price,
            } => MoveSpec::asymmetric_from_prices(initial_price, up_price, down_price),
            MoveInput::SymmetricPct { pct } => MoveSpec::Symmetric { pct },
            MoveInput::AsymmetricPct { up_pct, down_pct } => {
                MoveSpec::Asymmetric { up_pct, down_pct }
            }
        }
    }
}

/// One pricing run, every option named.
///
/// `Default` reproduces the reference run: S0 = 10 moving to 12 or 9, a 60%
/// up probability, quarterly moves over one year, strike 10, 8% a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub initial_price: Price,
    pub moves: MoveInput,
    pub probability_up: Probability,
    /// Moves (and compounding periods) per year.
    pub frequency: f64,
    pub maturity: Years,
    pub strike: Price,
    pub risk_free_rate: Rate,
    /// Price only this leg; both when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_kind: Option<OptionKind>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            initial_price: 10.0,
            moves: MoveInput::UpDownPrices {
                up_price: 12.0,
                down_price: 9.0,
            },
            probability_up: 0.60,
            frequency: 4.0,
            maturity: 1.0,
            strike: 10.0,
            risk_free_rate: 0.08,
            option_kind: None,
        }
    }
}

impl PricingConfig {
    pub fn model_parameters(&self) -> ModelParameters {
        ModelParameters {
            initial_price: self.initial_price,
            moves: self.moves.resolve(self.initial_price),
            probability_up: self.probability_up,
            frequency: self.frequency,
            maturity: self.maturity,
        }
    }

    /// Legs to price, in report order.
    pub fn option_kinds(&self) -> Vec<OptionKind> {
        match self.option_kind {
            Some(kind) => vec![kind],
            None => vec![OptionKind::Call, OptionKind::Put],
        }
    }

    /// Validate the model and the pricing terms before any lattice work.
    pub fn validate(&self) -> BopmResult<()> {
        self.model_parameters().validate()?;
        if !self.strike.is_finite() || self.strike < 0.0 {
            return Err(BopmError::invalid("strike", "must not be negative"));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BopmError::invalid("risk_free_rate", "must be finite"));
        }
        if self.risk_free_rate / self.frequency <= -1.0 {
            return Err(BopmError::DegenerateDiscount {
                rate: self.risk_free_rate,
                frequency: self.frequency,
            });
        }
        Ok(())
    }
}
