//! Backing store capability
//!
//! A [`Relation`] is a handle onto a collection that lives in some store.
//! It may still be lazy (nothing fetched yet) or already realized, in which
//! case [`Relation::loaded`] hands out the records it holds.

use crate::held::Held;
use maybe_loaded_core::{Error, FilterSpec, Row, Value};

/// A store-backed collection handle.
///
/// The six query operations carry store-native semantics: they are executed
/// by the store, not emulated. Store errors are reported in the store's own
/// `Error` type; the proxy converts its own failures into it through `From`
/// and never translates the store's.
pub trait Relation: Sized {
    /// The store's error type
    type Error: From<Error>;

    /// Records of a realized handle, `None` while it is still lazy
    fn loaded(&self) -> Option<&[Row]>;

    /// Capability probe used once, when a proxy is built around the handle
    fn is_unrealized(&self) -> bool {
        self.loaded().is_none()
    }

    /// `where`: a new handle restricted to records matching `spec`
    fn filter(&self, spec: &FilterSpec) -> Result<Self, Self::Error>;

    /// One tuple row per record, with the requested columns in order
    fn pluck(&self, columns: &[String]) -> Result<Vec<Row>, Self::Error>;

    /// First record matching `spec`, if any
    fn find_by(&self, spec: &FilterSpec) -> Result<Option<Row>, Self::Error>;

    /// Whether the handle selects at least one record
    fn exists(&self) -> Result<bool, Self::Error>;

    /// First record, if any
    fn take(&self) -> Result<Option<Row>, Self::Error>;

    /// The record with the given id
    fn find(&self, id: &Value) -> Result<Row, Self::Error>;

    /// Any other operation, named by `operation`
    fn invoke(&self, operation: &str, args: &[Value]) -> Result<Held<Self>, Self::Error>;
}

/// Relation type of a scope that only ever holds materialized data.
///
/// It has no values, so a `QueryProxy<Detached>` can only wrap rows, records
/// and scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detached {}

impl Relation for Detached {
    type Error = Error;

    fn loaded(&self) -> Option<&[Row]> {
        match *self {}
    }

    fn filter(&self, _spec: &FilterSpec) -> Result<Self, Error> {
        match *self {}
    }

    fn pluck(&self, _columns: &[String]) -> Result<Vec<Row>, Error> {
        match *self {}
    }

    fn find_by(&self, _spec: &FilterSpec) -> Result<Option<Row>, Error> {
        match *self {}
    }

    fn exists(&self) -> Result<bool, Error> {
        match *self {}
    }

    fn take(&self) -> Result<Option<Row>, Error> {
        match *self {}
    }

    fn find(&self, _id: &Value) -> Result<Row, Error> {
        match *self {}
    }

    fn invoke(&self, _operation: &str, _args: &[Value]) -> Result<Held<Self>, Error> {
        match *self {}
    }
}
