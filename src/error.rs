use core::fmt;

/// Result alias for `enclave`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by graph construction and detection.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An edge carried a negative weight.
    ///
    /// Relationship strengths are non-negative by contract; a negative
    /// weight is rejected at the graph boundary, never clamped.
    NegativeWeight {
        /// Source endpoint of the offending edge.
        from: String,
        /// Target endpoint of the offending edge.
        to: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NegativeWeight { from, to, weight } => {
                write!(f, "negative weight {weight} on edge {from:?} -> {to:?}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
