use tracing::debug;

use crate::error::BopmError;
use crate::lattice::TerminalDistribution;
use crate::types::{OptionKind, Price, Probability, Rate};
use crate::BopmResult;

/// Compounding factor `(1 + rate / frequency)^periods`.
///
/// Rejects a non-positive or non-finite frequency, a per-period rate at or
/// below -100% (the base would be zero or negative), and a factor that
/// underflows to zero or overflows over many periods.
pub fn discount_factor(risk_free_rate: Rate, frequency: f64, periods: usize) -> BopmResult<f64> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(BopmError::InvalidInput {
            field: "frequency".into(),
            reason: "must be positive".into(),
        });
    }
    if !risk_free_rate.is_finite() {
        return Err(BopmError::InvalidInput {
            field: "risk_free_rate".into(),
            reason: "must be finite".into(),
        });
    }
    let per_period = risk_free_rate / frequency;
    if per_period <= -1.0 {
        return Err(BopmError::DegenerateDiscount {
            rate: risk_free_rate,
            frequency,
        });
    }
    let periods = i32::try_from(periods).map_err(|_| BopmError::InvalidInput {
        field: "periods".into(),
        reason: format!("{periods} compounding periods is out of range"),
    })?;
    let factor = (1.0 + per_period).powi(periods);
    if !factor.is_finite() || factor <= 0.0 {
        return Err(BopmError::DegenerateDiscount {
            rate: risk_free_rate,
            frequency,
        });
    }
    Ok(factor)
}

/// Probability-weighted payoff at maturity, undiscounted.
pub fn expected_payoff(
    terminal_prices: &[Price],
    terminal_probs: &[Probability],
    strike: Price,
    kind: OptionKind,
) -> BopmResult<f64> {
    check_shape(terminal_prices, terminal_probs)?;
    Ok(terminal_prices
        .iter()
        .zip(terminal_probs)
        .map(|(&s, &p)| kind.payoff(s, strike) * p)
        .sum())
}

/// Present value of a European option from its terminal distribution.
///
/// The discount exponent is `terminal_prices.len() - 1`, i.e. the number of
/// moves the lattice actually took, so it always matches the builder's
/// (possibly truncated) step count.
pub fn price_option(
    terminal_prices: &[Price],
    terminal_probs: &[Probability],
    strike: Price,
    risk_free_rate: Rate,
    frequency: f64,
    kind: OptionKind,
) -> BopmResult<Price> {
    let expected = expected_payoff(terminal_prices, terminal_probs, strike, kind)?;
    let periods = terminal_prices.len() - 1;
    let discount = discount_factor(risk_free_rate, frequency, periods)?;
    let price = expected / discount;
    debug!(kind = kind.label(), periods, expected, discount, price, "priced option");
    Ok(price)
}

/// `price_option` over a lattice's terminal distribution.
pub fn price_terminal(
    terminal: &TerminalDistribution,
    strike: Price,
    risk_free_rate: Rate,
    frequency: f64,
    kind: OptionKind,
) -> BopmResult<Price> {
    price_option(
        terminal.prices(),
        terminal.probabilities(),
        strike,
        risk_free_rate,
        frequency,
        kind,
    )
}

fn check_shape(prices: &[Price], probs: &[Probability]) -> BopmResult<()> {
    if prices.len() != probs.len() {
        return Err(BopmError::ShapeMismatch {
            prices: prices.len(),
            probabilities: probs.len(),
        });
    }
    if prices.is_empty() {
        return Err(BopmError::InsufficientData(
            "at least one terminal node is required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    // Scenario A terminal level: S0 = 10, +/-10%, p = 0.5, three moves
    fn scenario_prices() -> Vec<f64> {
        vec![13.31, 10.89, 8.91, 7.29]
    }

    fn scenario_probs() -> Vec<f64> {
        vec![0.125, 0.375, 0.375, 0.125]
    }

    #[test]
    fn test_discount_factor_three_periods() {
        let df = discount_factor(0.08, 3.0, 3).unwrap();
        let expected = (1.0_f64 + 0.08 / 3.0).powi(3);
        assert!(approx_eq(df, expected, 1e-15));
        assert!(approx_eq(df, 1.08215, 1e-5));
    }

    #[test]
    fn test_discount_factor_zero_periods_is_one() {
        assert_eq!(discount_factor(0.08, 4.0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_degenerate_discount_rejected() {
        match discount_factor(-4.0, 4.0, 2) {
            Err(BopmError::DegenerateDiscount { rate, frequency }) => {
                assert_eq!(rate, -4.0);
                assert_eq!(frequency, 4.0);
            }
            other => panic!("Expected DegenerateDiscount, got {other:?}"),
        }
        assert!(discount_factor(-5.0, 4.0, 2).is_err());
    }

    #[test]
    fn test_underflowing_discount_rejected() {
        // base 1e-6 over 100 periods is below the smallest subnormal
        assert!(matches!(
            discount_factor(-3.999996, 4.0, 100),
            Err(BopmError::DegenerateDiscount { .. })
        ));
        let probs = vec![0.01; 101];
        assert!(matches!(
            price_option(&[10.0; 101], &probs, 5.0, -3.999996, 4.0, OptionKind::Call),
            Err(BopmError::DegenerateDiscount { .. })
        ));
    }

    #[test]
    fn test_overflowing_discount_rejected() {
        assert!(matches!(
            discount_factor(1.0e6, 1.0, 1000),
            Err(BopmError::DegenerateDiscount { .. })
        ));
    }

    #[test]
    fn test_zero_frequency_rejected() {
        assert!(matches!(
            discount_factor(0.08, 0.0, 2),
            Err(BopmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_scenario_b_call() {
        let call = price_option(
            &scenario_prices(),
            &scenario_probs(),
            10.0,
            0.08,
            3.0,
            OptionKind::Call,
        )
        .unwrap();
        let df = (1.0_f64 + 0.08 / 3.0).powi(3);
        let expected = (3.31 * 0.125 + 0.89 * 0.375) / df;
        assert!(approx_eq(call, expected, 1e-12), "call {call} != {expected}");
    }

    #[test]
    fn test_scenario_b_put() {
        let put = price_option(
            &scenario_prices(),
            &scenario_probs(),
            10.0,
            0.08,
            3.0,
            OptionKind::Put,
        )
        .unwrap();
        let df = (1.0_f64 + 0.08 / 3.0).powi(3);
        let expected = (1.09 * 0.375 + 2.71 * 0.125) / df;
        assert!(approx_eq(put, expected, 1e-12), "put {put} != {expected}");
    }

    #[test]
    fn test_expected_payoff_undiscounted() {
        let e = expected_payoff(&scenario_prices(), &scenario_probs(), 10.0, OptionKind::Call).unwrap();
        // 3.31 * 0.125 + 0.89 * 0.375
        assert!(approx_eq(e, 0.7475, 1e-12));
    }

    #[test]
    fn test_single_node_is_intrinsic_value() {
        let call = price_option(&[12.0], &[1.0], 10.0, 0.08, 4.0, OptionKind::Call).unwrap();
        let put = price_option(&[12.0], &[1.0], 10.0, 0.08, 4.0, OptionKind::Put).unwrap();
        assert_eq!(call, 2.0);
        assert_eq!(put, 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let result = price_option(&[1.0, 2.0, 3.0], &[0.5, 0.5], 2.0, 0.05, 1.0, OptionKind::Call);
        match result {
            Err(BopmError::ShapeMismatch {
                prices,
                probabilities,
            }) => {
                assert_eq!(prices, 3);
                assert_eq!(probabilities, 2);
            }
            other => panic!("Expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_vectors_rejected() {
        assert!(matches!(
            price_option(&[], &[], 10.0, 0.05, 1.0, OptionKind::Put),
            Err(BopmError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_price_terminal_matches_slices() {
        let terminal = TerminalDistribution::new(scenario_prices(), scenario_probs()).unwrap();
        let a = price_terminal(&terminal, 10.0, 0.08, 3.0, OptionKind::Call).unwrap();
        let b = price_option(
            &scenario_prices(),
            &scenario_probs(),
            10.0,
            0.08,
            3.0,
            OptionKind::Call,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_deep_otm_call_is_zero() {
        let call = price_option(
            &scenario_prices(),
            &scenario_probs(),
            100.0,
            0.08,
            3.0,
            OptionKind::Call,
        )
        .unwrap();
        assert_eq!(call, 0.0);
    }
}
