//! Error types for network construction

use thiserror::Error;

/// Coarse classification of a [`NetworkError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Builder configuration is inconsistent or unsupported
    Configuration,
    /// Input scores do not satisfy the shape/identity contract
    Precondition,
    /// A numeric parameter is out of range
    InvalidParameter,
}

/// Errors that can occur while configuring or building a similarity network
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// `top_n` must be able to hold every link that may be kept
    #[error("Configuration error: top_n ({top_n}) must be >= max_links ({max_links})")]
    TopNBelowMaxLinks { top_n: usize, max_links: usize },

    /// Link method is neither "single" nor "mutual"
    #[error("Configuration error: unsupported link method '{0}' (expected \"single\" or \"mutual\")")]
    UnsupportedLinkMethod(String),

    /// Queries and references are not the same items in the same order
    #[error(
        "Precondition failed: expected symmetric scores with queries == references \
         ({queries} queries, {references} references)"
    )]
    AsymmetricScores { queries: usize, references: usize },

    /// Score matrix shape does not match the item collections
    #[error(
        "Precondition failed: score matrix is {rows}x{cols} but there are \
         {queries} queries and {references} references"
    )]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        queries: usize,
        references: usize,
    },

    /// An item does not expose the identifier attribute
    #[error("Precondition failed: item at position {index} has no '{key}' attribute")]
    MissingIdentifier { key: String, index: usize },

    /// Numeric parameter out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl NetworkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::TopNBelowMaxLinks { .. } | NetworkError::UnsupportedLinkMethod(_) => {
                ErrorKind::Configuration
            }
            NetworkError::AsymmetricScores { .. }
            | NetworkError::ShapeMismatch { .. }
            | NetworkError::MissingIdentifier { .. } => ErrorKind::Precondition,
            NetworkError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, NetworkError>;
