use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::PricingConfig;
use crate::lattice::{build_lattice, ModelParameters, TerminalDistribution};
use crate::pricing::payoff::{discount_factor, price_terminal};
use crate::types::*;
use crate::BopmResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One maturity node with the payoff of each priced leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalNode {
    pub down_moves: usize,
    pub final_price: Price,
    pub probability: Probability,
    pub call_payoff: Option<Price>,
    pub put_payoff: Option<Price>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EuropeanOutput {
    pub steps: usize,
    pub up_factor: f64,
    pub down_factor: f64,
    pub discount_factor: f64,
    pub expected_terminal_price: Price,
    pub call_price: Option<Price>,
    pub put_price: Option<Price>,
    /// `(C - P) - (E[S_N] - K) / DF`; zero up to rounding when both legs
    /// come from the same distribution.
    pub put_call_parity_gap: Option<f64>,
    pub risk_neutral_probability: Option<Probability>,
    pub terminal_nodes: Vec<TerminalNode>,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn collect_warnings(params: &ModelParameters, risk_free_rate: Rate) -> Vec<String> {
    let mut warnings = Vec::new();
    let steps = params.steps();

    if params.is_step_count_truncated() {
        warnings.push(format!(
            "frequency x maturity = {} is not a whole number of periods; truncated to {} steps",
            params.raw_steps(),
            steps
        ));
    }
    if steps == 0 {
        warnings.push(
            "maturity is shorter than one period: price reduces to the intrinsic value at the initial price"
                .into(),
        );
    }

    let u = params.moves.up_factor();
    let d = params.moves.down_factor();
    if u <= d {
        warnings.push(format!("up factor {u} does not exceed down factor {d}"));
    } else if params
        .moves
        .risk_neutral_probability(risk_free_rate, params.frequency)
        .is_none()
    {
        let growth = 1.0 + risk_free_rate / params.frequency;
        warnings.push(format!(
            "per-period growth {growth} lies outside [{d}, {u}]: the move specification admits arbitrage"
        ));
    }
    warnings
}

fn terminal_nodes(
    terminal: &TerminalDistribution,
    strike: Price,
    kinds: &[OptionKind],
) -> Vec<TerminalNode> {
    let payoff_for = |kind: OptionKind, price: Price| {
        kinds.contains(&kind).then(|| kind.payoff(price, strike))
    };
    terminal
        .iter()
        .enumerate()
        .map(|(j, (price, probability))| TerminalNode {
            down_moves: j,
            final_price: price,
            probability,
            call_payoff: payoff_for(OptionKind::Call, price),
            put_payoff: payoff_for(OptionKind::Put, price),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API: price_european
// ---------------------------------------------------------------------------

/// Full pricing run: validate, build the lattice, price the requested legs
/// from its terminal distribution.
pub fn price_european(config: &PricingConfig) -> BopmResult<ComputationOutput<EuropeanOutput>> {
    let start = Instant::now();
    config.validate()?;

    let params = config.model_parameters();
    let lattice = build_lattice(&params)?;
    let terminal = lattice.terminal();
    let steps = terminal.steps();

    let k = config.strike;
    let r = config.risk_free_rate;
    let f = config.frequency;
    let kinds = config.option_kinds();

    let mut call_price = None;
    let mut put_price = None;
    for &kind in &kinds {
        let price = price_terminal(&terminal, k, r, f, kind)?;
        match kind {
            OptionKind::Call => call_price = Some(price),
            OptionKind::Put => put_price = Some(price),
        }
    }

    let df = discount_factor(r, f, steps)?;
    let expected_terminal_price = terminal.expected_price();

    let parity_gap = match (call_price, put_price) {
        (Some(c), Some(p)) => Some((c - p) - (expected_terminal_price - k) / df),
        _ => None,
    };

    let output = EuropeanOutput {
        steps,
        up_factor: params.moves.up_factor(),
        down_factor: params.moves.down_factor(),
        discount_factor: df,
        expected_terminal_price,
        call_price,
        put_price,
        put_call_parity_gap: parity_gap,
        risk_neutral_probability: params.moves.risk_neutral_probability(r, f),
        terminal_nodes: terminal_nodes(&terminal, k, &kinds),
    };

    debug!(steps, ?call_price, ?put_price, "european pricing complete");

    let warnings = collect_warnings(&params, r);
    let methodology = "Binomial lattice, discounted terminal expectation";
    let assumptions = serde_json::json!({
        "initial_price": params.initial_price,
        "moves": params.moves,
        "probability_up": params.probability_up,
        "frequency": f,
        "maturity": params.maturity,
        "strike": k,
        "risk_free_rate": r,
        "steps": steps,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MoveInput;
    use crate::error::BopmError;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn scenario_config() -> PricingConfig {
        PricingConfig {
            initial_price: 10.0,
            moves: MoveInput::NextPrice { next_price: 11.0 },
            probability_up: 0.5,
            frequency: 3.0,
            maturity: 1.0,
            strike: 10.0,
            risk_free_rate: 0.08,
            option_kind: None,
        }
    }

    #[test]
    fn test_scenario_prices_both_legs() {
        let out = price_european(&scenario_config()).unwrap().result;
        let df = (1.0_f64 + 0.08 / 3.0).powi(3);
        assert_eq!(out.steps, 3);
        assert!(approx_eq(out.discount_factor, df, 1e-15));
        let call = out.call_price.unwrap();
        let put = out.put_price.unwrap();
        assert!(approx_eq(call, 0.7475 / df, 1e-9), "call {call}");
        assert!(approx_eq(put, (1.09 * 0.375 + 2.71 * 0.125) / df, 1e-9), "put {put}");
    }

    #[test]
    fn test_parity_gap_near_zero() {
        let out = price_european(&PricingConfig::default()).unwrap().result;
        let gap = out.put_call_parity_gap.unwrap();
        assert!(gap.abs() < 1e-12, "parity gap {gap}");
    }

    #[test]
    fn test_single_leg_omits_other() {
        let cfg = PricingConfig {
            option_kind: Some(OptionKind::Call),
            ..scenario_config()
        };
        let out = price_european(&cfg).unwrap().result;
        assert!(out.call_price.is_some());
        assert!(out.put_price.is_none());
        assert!(out.put_call_parity_gap.is_none());
        assert!(out.terminal_nodes.iter().all(|n| n.put_payoff.is_none()));
        assert!(out.terminal_nodes.iter().all(|n| n.call_payoff.is_some()));
    }

    #[test]
    fn test_terminal_nodes_report() {
        let out = price_european(&scenario_config()).unwrap().result;
        assert_eq!(out.terminal_nodes.len(), 4);
        let top = &out.terminal_nodes[0];
        assert_eq!(top.down_moves, 0);
        assert!(approx_eq(top.final_price, 13.31, 1e-9));
        assert!(approx_eq(top.call_payoff.unwrap(), 3.31, 1e-9));
        assert_eq!(top.put_payoff, Some(0.0));
        let bottom = &out.terminal_nodes[3];
        assert!(approx_eq(bottom.put_payoff.unwrap(), 2.71, 1e-9));
    }

    #[test]
    fn test_zero_steps_warns_and_prices_intrinsic() {
        let cfg = PricingConfig {
            maturity: 0.2,
            initial_price: 12.0,
            moves: MoveInput::SymmetricPct { pct: 0.1 },
            ..scenario_config()
        };
        let out = price_european(&cfg).unwrap();
        assert_eq!(out.result.steps, 0);
        assert_eq!(out.result.call_price, Some(2.0));
        assert_eq!(out.result.put_price, Some(0.0));
        assert!(out.warnings.iter().any(|w| w.contains("shorter than one period")));
    }

    #[test]
    fn test_truncation_warning() {
        let cfg = PricingConfig {
            maturity: 2.0,
            frequency: 3.0,
            ..scenario_config()
        };
        assert!(price_european(&cfg).unwrap().warnings.is_empty());

        let cfg = PricingConfig {
            maturity: 1.2,
            frequency: 4.0,
            ..scenario_config()
        };
        let out = price_european(&cfg).unwrap();
        assert_eq!(out.result.steps, 4);
        assert!(out.warnings.iter().any(|w| w.contains("truncated to 4 steps")));
    }

    #[test]
    fn test_arbitrage_warning() {
        let cfg = PricingConfig {
            risk_free_rate: 1.0,
            ..scenario_config()
        };
        let out = price_european(&cfg).unwrap();
        assert!(out.result.risk_neutral_probability.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("arbitrage")));
    }

    #[test]
    fn test_risk_neutral_probability_reported() {
        let out = price_european(&PricingConfig::default()).unwrap().result;
        assert!(approx_eq(out.risk_neutral_probability.unwrap(), 0.4, 1e-12));
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let cfg = PricingConfig {
            probability_up: 1.5,
            ..scenario_config()
        };
        match price_european(&cfg).unwrap_err() {
            BopmError::InvalidInput { field, .. } => assert_eq!(field, "probability_up"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_populated() {
        let out = price_european(&scenario_config()).unwrap();
        assert!(!out.methodology.is_empty());
        assert_eq!(out.metadata.precision, "ieee754_f64");
        assert_eq!(out.assumptions["steps"], 3);
    }
}
