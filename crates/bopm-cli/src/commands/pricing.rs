use clap::{Args, ValueEnum};
use serde_json::Value;

use bopm_core::pricing::price_european;
use bopm_core::{OptionKind, PricingConfig};

use super::ModelArgs;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LegArg {
    Call,
    Put,
    Both,
}

/// Arguments for European option pricing
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Strike price
    #[arg(long)]
    pub strike: Option<f64>,

    /// Annual risk-free rate, compounded once per move (e.g. 0.08 for 8%)
    #[arg(long, allow_negative_numbers = true)]
    pub risk_free_rate: Option<f64>,

    /// Which leg to price
    #[arg(long)]
    pub kind: Option<LegArg>,
}

impl PriceArgs {
    fn apply(&self, cfg: &mut PricingConfig) {
        self.model.apply(cfg);
        if let Some(k) = self.strike {
            cfg.strike = k;
        }
        if let Some(r) = self.risk_free_rate {
            cfg.risk_free_rate = r;
        }
        match self.kind {
            Some(LegArg::Call) => cfg.option_kind = Some(OptionKind::Call),
            Some(LegArg::Put) => cfg.option_kind = Some(OptionKind::Put),
            Some(LegArg::Both) => cfg.option_kind = None,
            None => {}
        }
    }
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cfg = args.model.base_config()?;
    args.apply(&mut cfg);
    tracing::debug!(?cfg, "pricing configuration");
    let result = price_european(&cfg)?;
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    Ok(serde_json::to_value(result)?)
}
