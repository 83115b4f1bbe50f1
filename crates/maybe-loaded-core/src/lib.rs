//! # maybe-loaded core
//!
//! Core types for maybe-loaded: records and values, filter specifications,
//! query limits and the in-memory predicate evaluator that emulates
//! store-side filtering over an already-loaded collection.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
/// Filter specifications
#[allow(missing_docs)]
pub mod filter;
pub mod limits;
/// In-memory predicate evaluator
#[allow(missing_docs)]
pub mod predicate;
/// Records and values
#[allow(missing_docs)]
pub mod value;

pub use error::{Error, Result};
pub use filter::{Comparison, ComparisonOperator, Condition, FilterSpec};
pub use limits::QueryLimits;
pub use value::{Column, Record, Row, Value};
