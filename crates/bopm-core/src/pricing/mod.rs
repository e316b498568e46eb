pub mod european;
pub mod payoff;

pub use european::{price_european, EuropeanOutput, TerminalNode};
pub use payoff::{discount_factor, expected_payoff, price_option, price_terminal};
