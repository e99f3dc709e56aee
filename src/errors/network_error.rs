//! Errors raised by network construction, training and (de)serialization.

use thiserror::Error;

/// Every fallible operation in the crate returns this error.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An input, target or error vector disagrees with a layer size.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Illegal wiring, or a layout that cannot form a feed-forward stack.
    #[error("Topology error: {0}")]
    Topology(String),

    /// The call needs state the network does not have yet.
    #[error("State precondition failed: {0}")]
    StatePrecondition(String),

    /// A numeric setting or data set that training cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed network description: {0}")]
    MalformedDescription(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetworkError {
    pub(crate) fn shape(context: &'static str, expected: usize, actual: usize) -> NetworkError {
        NetworkError::ShapeMismatch { context, expected, actual }
    }
}
