//! Execution modes of the recognized query operations
//!
//! A proxy runs each recognized operation through one of two
//! implementations of [`Queryable`]: [`StoreMode`] forwards it to a lazy
//! relation, [`MaterializedMode`] emulates it over records already in
//! memory.

use crate::held::Held;
use crate::relation::Relation;
use maybe_loaded_core::predicate;
use maybe_loaded_core::{FilterSpec, Row, Value};
use std::fmt;

/// Which side executes an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Pushed down to the backing store
    Store,
    /// Emulated over loaded records
    Materialized,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Store => write!(f, "store"),
            Mode::Materialized => write!(f, "materialized"),
        }
    }
}

/// The recognized query operations, each producing a new held value
pub trait Queryable<H: Relation> {
    /// Which side this implementation runs on
    fn mode(&self) -> Mode;

    /// `where`
    fn filter(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error>;

    /// `pluck`
    fn pluck(&self, columns: &[String]) -> Result<Held<H>, H::Error>;

    /// `find_by`
    fn find_by(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error>;

    /// `exists?`
    fn exists(&self) -> Result<Held<H>, H::Error>;

    /// `take`
    fn take(&self) -> Result<Held<H>, H::Error>;

    /// `find`
    fn find(&self, id: &Value) -> Result<Held<H>, H::Error>;
}

/// Forwards every operation to a lazy relation
pub struct StoreMode<'a, H> {
    relation: &'a H,
}

impl<'a, H> StoreMode<'a, H> {
    /// Runs operations against `relation`
    pub fn new(relation: &'a H) -> Self {
        Self { relation }
    }
}

impl<H: Relation> Queryable<H> for StoreMode<'_, H> {
    fn mode(&self) -> Mode {
        Mode::Store
    }

    fn filter(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error> {
        self.relation.filter(spec).map(Held::Relation)
    }

    fn pluck(&self, columns: &[String]) -> Result<Held<H>, H::Error> {
        self.relation.pluck(columns).map(Held::Rows)
    }

    fn find_by(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error> {
        self.relation.find_by(spec).map(Held::Row)
    }

    fn exists(&self) -> Result<Held<H>, H::Error> {
        self.relation.exists().map(Held::Flag)
    }

    fn take(&self) -> Result<Held<H>, H::Error> {
        self.relation.take().map(Held::Row)
    }

    fn find(&self, id: &Value) -> Result<Held<H>, H::Error> {
        self.relation.find(id).map(|row| Held::Row(Some(row)))
    }
}

/// Emulates every operation over loaded records
pub struct MaterializedMode<'a> {
    rows: &'a [Row],
}

impl<'a> MaterializedMode<'a> {
    /// Runs operations over `rows`
    pub fn new(rows: &'a [Row]) -> Self {
        Self { rows }
    }
}

impl<H: Relation> Queryable<H> for MaterializedMode<'_> {
    fn mode(&self) -> Mode {
        Mode::Materialized
    }

    fn filter(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error> {
        Ok(Held::Rows(predicate::filter_all(self.rows, spec)?))
    }

    fn pluck(&self, columns: &[String]) -> Result<Held<H>, H::Error> {
        Ok(Held::Rows(predicate::pluck_all(self.rows, columns)))
    }

    fn find_by(&self, spec: &FilterSpec) -> Result<Held<H>, H::Error> {
        Ok(Held::Row(predicate::first_matching(self.rows, spec)?))
    }

    fn exists(&self) -> Result<Held<H>, H::Error> {
        Ok(Held::Flag(predicate::exists_any(self.rows)))
    }

    fn take(&self) -> Result<Held<H>, H::Error> {
        Ok(Held::Row(predicate::take_first(self.rows)))
    }

    fn find(&self, id: &Value) -> Result<Held<H>, H::Error> {
        Ok(Held::Row(Some(predicate::find_by_id(self.rows, id)?)))
    }
}
