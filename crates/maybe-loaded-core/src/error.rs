//! Error types for maybe-loaded.

use crate::value::Value;
use std::fmt;

/// The main error type for maybe-loaded operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A lock was poisoned (internal error)
    LockPoisoned,

    /// Comparison string is not `<attribute> <op> <literal>` with a known operator
    MalformedComparison(String),

    /// Filter specification is neither an attribute map nor a comparison string
    UnknownOptions(String),

    /// No record carries the requested id
    NotFound(Value),

    /// Pass-through operation the held value does not understand
    UnknownOperation(String),

    /// Recognized query operation applied to something that is not a collection
    UnsupportedTarget {
        /// Operation that was attempted
        operation: String,
        /// Kind of value the proxy was holding
        held: &'static str,
    },

    /// Input rejected by the configured query limits
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LockPoisoned => write!(f, "Lock poisoned"),
            Error::MalformedComparison(query) => write!(
                f,
                "Unsupported query: {:?} - expected `<attribute> <op> <number>` with op one of '>', '>=', '<', '<='",
                query
            ),
            Error::UnknownOptions(spec) => write!(f, "Unknown filter options: {}", spec),
            Error::NotFound(id) => write!(f, "Couldn't find record with id={}", id),
            Error::UnknownOperation(op) => write!(f, "Unknown operation: {}", op),
            Error::UnsupportedTarget { operation, held } => {
                write!(f, "Cannot apply `{}` to {}", operation, held)
            }
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for maybe-loaded operations.
pub type Result<T> = std::result::Result<T, Error>;
