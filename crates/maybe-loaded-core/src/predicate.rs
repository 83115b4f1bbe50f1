/// In-memory predicate evaluator
///
/// Reproduces, over an already-loaded collection, the filtering and
/// selection a store would apply for the small query vocabulary of
/// [`FilterSpec`]. Everything here is a pure function of its arguments.
use crate::error::{Error, Result};
use crate::filter::{Comparison, Condition, FilterSpec};
use crate::value::{Column, Record, Row, Value};
use tracing::trace;

/// A filter checked once and ready to run against many records
enum Predicate<'a> {
    Attributes(&'a [Condition]),
    Comparison(Comparison),
}

impl<'a> Predicate<'a> {
    fn compile(spec: &'a FilterSpec) -> Result<Self> {
        match spec {
            FilterSpec::Attributes(conditions) => Ok(Predicate::Attributes(conditions)),
            FilterSpec::Comparison(query) => Ok(Predicate::Comparison(Comparison::parse(query)?)),
            FilterSpec::Unsupported(_) => Err(Error::UnknownOptions(spec.to_string())),
        }
    }

    fn test<R: Record>(&self, record: &R) -> bool {
        match self {
            Predicate::Attributes(conditions) => conditions.iter().all(|c| {
                let actual = record.attribute(&c.attribute).unwrap_or(Value::Null);
                considered_equal(&c.expected, &actual)
            }),
            Predicate::Comparison(cmp) => cmp.holds_for(record.attribute(&cmp.attribute).as_ref()),
        }
    }
}

/// Equality rule of the attribute-map form: membership when `expected` is a
/// list, scalar equality otherwise.
pub fn considered_equal(expected: &Value, actual: &Value) -> bool {
    match expected {
        Value::List(candidates) => candidates.iter().any(|c| c.matches(actual)),
        scalar => scalar.matches(actual),
    }
}

/// Single-record predicate test
pub fn realizes_all<R: Record>(record: &R, spec: &FilterSpec) -> Result<bool> {
    Ok(Predicate::compile(spec)?.test(record))
}

/// Records satisfying `spec`, in collection order
///
/// `spec` is checked before iterating, so a malformed filter is reported
/// even for an empty collection.
pub fn filter_all<R: Record + Clone>(collection: &[R], spec: &FilterSpec) -> Result<Vec<R>> {
    let predicate = Predicate::compile(spec)?;
    Ok(collection
        .iter()
        .filter(|record| predicate.test(*record))
        .cloned()
        .collect())
}

/// Project every record onto `columns`, one tuple row per record
pub fn pluck_all<R: Record, S: AsRef<str>>(collection: &[R], columns: &[S]) -> Vec<Row> {
    let header: Vec<Column> = columns.iter().map(|c| Column::new(c.as_ref())).collect();

    collection
        .iter()
        .map(|record| Row {
            columns: header.clone(),
            values: columns
                .iter()
                .map(|c| record.attribute(c.as_ref()).unwrap_or(Value::Null))
                .collect(),
        })
        .collect()
}

/// First record satisfying `spec`, if any
pub fn first_matching<R: Record + Clone>(collection: &[R], spec: &FilterSpec) -> Result<Option<R>> {
    let predicate = Predicate::compile(spec)?;
    Ok(collection.iter().find(|record| predicate.test(*record)).cloned())
}

/// The record whose `id` attribute equals `id`
///
/// # Errors
///
/// Returns `Error::NotFound` carrying `id` when no record matches
pub fn find_by_id<R: Record + Clone>(collection: &[R], id: &Value) -> Result<R> {
    collection
        .iter()
        .find(|record| record.attribute("id").is_some_and(|v| v.matches(id)))
        .cloned()
        .ok_or_else(|| {
            trace!(%id, scanned = collection.len(), "no record with requested id");
            Error::NotFound(id.clone())
        })
}

pub fn exists_any<R>(collection: &[R]) -> bool {
    !collection.is_empty()
}

pub fn take_first<R: Clone>(collection: &[R]) -> Option<R> {
    collection.first().cloned()
}
