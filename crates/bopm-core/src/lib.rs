pub mod config;
pub mod error;
pub mod lattice;
pub mod math;
pub mod pricing;
pub mod types;

pub use config::{MoveInput, PricingConfig};
pub use error::BopmError;
pub use lattice::{build_lattice, Lattice, ModelParameters, MoveSpec, TerminalDistribution};
pub use types::*;

/// Standard result type for all pricing operations
pub type BopmResult<T> = Result<T, BopmError>;
