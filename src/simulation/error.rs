//! Error types surfaced by the core.

use thiserror::Error;

/// Failure while importing network weights.
///
/// Returned before any value is applied, so a failed import never leaves a
/// network half-overwritten.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A matrix declares a shape other than the network topology requires.
    #[error(
        "{name} is {actual_rows}x{actual_cols}, expected {expected_rows}x{expected_cols}"
    )]
    Dimension {
        /// Name of the offending matrix.
        name: &'static str,
        /// Required row count.
        expected_rows: usize,
        /// Required column count.
        expected_cols: usize,
        /// Declared row count.
        actual_rows: usize,
        /// Declared column count.
        actual_cols: usize,
    },
    /// The flat data does not match the declared shape.
    #[error("{name} declares {expected} values but carries {actual}")]
    DataLength {
        /// Name of the offending matrix.
        name: &'static str,
        /// Value count implied by the declared shape.
        expected: usize,
        /// Value count actually present.
        actual: usize,
    },
    /// A weight or bias is NaN or infinite.
    #[error("{name} contains a non-finite value")]
    NonFinite {
        /// Name of the offending matrix.
        name: &'static str,
    },
    /// The payload is not valid brain JSON.
    #[error("malformed brain data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while running a network forward pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    /// Observation length differs from the network's input layer.
    #[error("expected {expected} inputs, got {actual}")]
    InputSize {
        /// Input layer size.
        expected: usize,
        /// Observation length.
        actual: usize,
    },
    /// Observation contains NaN or infinity.
    #[error("observation contains a non-finite value")]
    NonFinite,
}

/// Invalid steering or training configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A scalar that must be strictly positive is not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A weight or distance that must not be negative is.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A rate or probability outside [0, 1].
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A count that must be non-zero is zero.
    #[error("{field} must be non-zero")]
    Empty {
        /// Field name.
        field: &'static str,
    },
    /// Level 0 was requested.
    #[error("level must be at least 1")]
    ZeroLevel,
    /// No steering preset exists for the level.
    #[error("no steering preset for level {0}")]
    UnknownLevel(u32),
}
