/// Values a query proxy can hold
///
/// Besides relations and loaded collections, a chain can end up holding a
/// single record, a boolean or a scalar, so all of them can be wrapped and
/// unwrapped the same way.
use maybe_loaded_core::{Error, Record, Result, Row, Value};

/// What a proxy wraps
#[derive(Debug, Clone, PartialEq)]
pub enum Held<H> {
    /// Store-backed handle, lazy or realized
    Relation(H),
    /// Materialized collection, including plucked tuples
    Rows(Vec<Row>),
    /// Single record, `None` when absent
    Row(Option<Row>),
    /// Result of `exists`
    Flag(bool),
    /// Scalar produced by a pass-through operation
    Value(Value),
}

impl<H> Held<H> {
    /// Short description used in error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Held::Relation(_) => "relation",
            Held::Rows(_) => "collection",
            Held::Row(Some(_)) => "record",
            Held::Row(None) => "absent record",
            Held::Flag(_) => "boolean",
            Held::Value(_) => "value",
        }
    }

    pub fn into_relation(self) -> Option<H> {
        match self {
            Held::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Held::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_row(self) -> Option<Row> {
        match self {
            Held::Row(row) => row,
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Held::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Held::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<H> From<Vec<Row>> for Held<H> {
    fn from(rows: Vec<Row>) -> Self {
        Held::Rows(rows)
    }
}

impl<H> From<Row> for Held<H> {
    fn from(row: Row) -> Self {
        Held::Row(Some(row))
    }
}

impl<H> From<Option<Row>> for Held<H> {
    fn from(row: Option<Row>) -> Self {
        Held::Row(row)
    }
}

impl<H> From<bool> for Held<H> {
    fn from(flag: bool) -> Self {
        Held::Flag(flag)
    }
}

impl<H> From<Value> for Held<H> {
    fn from(value: Value) -> Self {
        Held::Value(value)
    }
}

fn no_arguments(operation: &str, args: &[Value]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "`{}` takes no arguments, got {}",
            operation,
            args.len()
        )))
    }
}

/// Pass-through vocabulary of a loaded collection
pub(crate) fn invoke_on_rows<H>(rows: &[Row], operation: &str, args: &[Value]) -> Result<Held<H>> {
    no_arguments(operation, args)?;
    let held = match operation {
        "first" => Held::Row(rows.first().cloned()),
        "last" => Held::Row(rows.last().cloned()),
        "count" | "size" | "length" => Held::Value(Value::Integer(rows.len() as i64)),
        "all" | "to_a" | "load" => Held::Rows(rows.to_vec()),
        "reverse" => Held::Rows(rows.iter().rev().cloned().collect()),
        "empty?" | "is_empty" => Held::Flag(rows.is_empty()),
        "any?" => Held::Flag(!rows.is_empty()),
        _ => return Err(Error::UnknownOperation(operation.to_string())),
    };
    Ok(held)
}

/// Pass-through on a single record reads the attribute of that name
pub(crate) fn invoke_on_record<H>(record: &Row, operation: &str, args: &[Value]) -> Result<Held<H>> {
    no_arguments(operation, args)?;
    Ok(Held::Value(record.attribute(operation).unwrap_or(Value::Null)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Detached;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("id", 1).with("price", 5),
            Row::new().with("id", 2).with("price", 15),
        ]
    }

    #[test]
    fn test_rows_vocabulary() {
        let rows = rows();
        let first: Held<Detached> = invoke_on_rows(&rows, "first", &[]).unwrap();
        assert_eq!(first.into_row(), Some(rows[0].clone()));

        let count: Held<Detached> = invoke_on_rows(&rows, "count", &[]).unwrap();
        assert_eq!(count.into_value(), Some(Value::Integer(2)));

        let reversed: Held<Detached> = invoke_on_rows(&rows, "reverse", &[]).unwrap();
        assert_eq!(reversed.into_rows().unwrap()[0], rows[1]);

        let empty: Held<Detached> = invoke_on_rows(&[], "empty?", &[]).unwrap();
        assert_eq!(empty.as_flag(), Some(true));
    }

    #[test]
    fn test_rows_rejects_unknown_and_arguments() {
        let rows = rows();
        assert_eq!(
            invoke_on_rows::<Detached>(&rows, "explode", &[]).unwrap_err(),
            Error::UnknownOperation("explode".to_string())
        );
        assert!(matches!(
            invoke_on_rows::<Detached>(&rows, "first", &[Value::Integer(2)]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_record_attribute_read() {
        let row = Row::new().with("id", 1).with("price", 5);
        let price: Held<Detached> = invoke_on_record(&row, "price", &[]).unwrap();
        assert_eq!(price.into_value(), Some(Value::Integer(5)));

        let missing: Held<Detached> = invoke_on_record(&row, "colour", &[]).unwrap();
        assert_eq!(missing.into_value(), Some(Value::Null));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Held::<Detached>::Rows(Vec::new()).kind(), "collection");
        assert_eq!(Held::<Detached>::Row(None).kind(), "absent record");
    }
}
