pub mod lattice;
pub mod pricing;

use clap::Args;

use bopm_core::{MoveInput, PricingConfig};

use crate::input;

/// Model flags shared by every command. Each one overrides the matching
/// field of the base configuration.
#[derive(Args, Debug, Default)]
pub struct ModelArgs {
    /// Path to a JSON or YAML configuration file (flags override its fields)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial asset price S0
    #[arg(long)]
    pub initial_price: Option<f64>,

    /// Next-step price implying a symmetric percentage move
    #[arg(long, conflicts_with_all = ["up_price", "down_price"])]
    pub next_price: Option<f64>,

    /// Next-step up price (asymmetric moves, requires --down-price)
    #[arg(long, requires = "down_price")]
    pub up_price: Option<f64>,

    /// Next-step down price (asymmetric moves, requires --up-price)
    #[arg(long, requires = "up_price")]
    pub down_price: Option<f64>,

    /// Probability of an up move, in [0, 1]
    #[arg(long, alias = "prob-up")]
    pub probability_up: Option<f64>,

    /// Moves (and compounding periods) per year
    #[arg(long)]
    pub frequency: Option<f64>,

    /// Maturity in years
    #[arg(long)]
    pub maturity: Option<f64>,
}

impl ModelArgs {
    /// Base configuration: `--input` file, else piped stdin, else the
    /// built-in reference parameters.
    pub fn base_config(&self) -> Result<PricingConfig, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_config(path);
        }
        if let Some(cfg) = input::stdin::read_stdin()? {
            return Ok(cfg);
        }
        Ok(PricingConfig::default())
    }

    pub fn apply(&self, cfg: &mut PricingConfig) {
        if let Some(s0) = self.initial_price {
            cfg.initial_price = s0;
        }
        if let Some(next_price) = self.next_price {
            cfg.moves = MoveInput::NextPrice { next_price };
        }
        if let (Some(up_price), Some(down_price)) = (self.up_price, self.down_price) {
            cfg.moves = MoveInput::UpDownPrices {
                up_price,
                down_price,
            };
        }
        if let Some(p) = self.probability_up {
            cfg.probability_up = p;
        }
        if let Some(f) = self.frequency {
            cfg.frequency = f;
        }
        if let Some(t) = self.maturity {
            cfg.maturity = t;
        }
    }

    pub fn resolve(&self) -> Result<PricingConfig, Box<dyn std::error::Error>> {
        let mut cfg = self.base_config()?;
        self.apply(&mut cfg);
        tracing::debug!(?cfg, "resolved pricing configuration");
        Ok(cfg)
    }
}
