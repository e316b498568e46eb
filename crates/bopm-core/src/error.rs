use thiserror::Error;

#[derive(Debug, Error)]
pub enum BopmError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Shape mismatch: {prices} terminal prices vs {probabilities} terminal probabilities")]
    ShapeMismatch { prices: usize, probabilities: usize },

    #[error("Degenerate discount: rate {rate} compounded {frequency} times a year gives no positive finite discount factor")]
    DegenerateDiscount { rate: f64, frequency: f64 },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BopmError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        BopmError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BopmError {
    fn from(e: serde_json::Error) -> Self {
        BopmError::SerializationError(e.to_string())
    }
}
