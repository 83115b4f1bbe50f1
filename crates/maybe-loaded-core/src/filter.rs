/// Filter specifications accepted by `where` and `find_by`
///
/// Two shapes are understood: an attribute map (equality or membership per
/// attribute, all conditions must hold) and a three-token comparison string
/// such as `"price_net > 0"`.
use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One `attribute => expected` pair of an attribute-map filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: String,
    /// Scalar for equality, `Value::List` for membership
    pub expected: Value,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            expected: expected.into(),
        }
    }
}

/// A filter specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterSpec {
    /// Attribute-map form
    Attributes(Vec<Condition>),
    /// Comparison-string form, parsed when evaluated
    Comparison(String),
    /// Anything else; evaluating it fails with `UnknownOptions`
    Unsupported(Value),
}

impl FilterSpec {
    pub fn attributes<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        FilterSpec::Attributes(
            pairs
                .into_iter()
                .map(|(attribute, expected)| Condition::new(attribute, expected))
                .collect(),
        )
    }

    pub fn comparison(query: impl Into<String>) -> Self {
        FilterSpec::Comparison(query.into())
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::Attributes(conditions) => {
                write!(f, "{{")?;
                for (i, c) in conditions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", c.attribute, c.expected)?;
                }
                write!(f, "}}")
            }
            FilterSpec::Comparison(query) => write!(f, "{:?}", query),
            FilterSpec::Unsupported(value) => write!(f, "{} ({})", value, value.type_name()),
        }
    }
}

impl From<&str> for FilterSpec {
    fn from(query: &str) -> Self {
        FilterSpec::Comparison(query.to_string())
    }
}

impl From<String> for FilterSpec {
    fn from(query: String) -> Self {
        FilterSpec::Comparison(query)
    }
}

impl From<&FilterSpec> for FilterSpec {
    fn from(spec: &FilterSpec) -> Self {
        spec.clone()
    }
}

impl From<Condition> for FilterSpec {
    fn from(condition: Condition) -> Self {
        FilterSpec::Attributes(vec![condition])
    }
}

impl From<Vec<Condition>> for FilterSpec {
    fn from(conditions: Vec<Condition>) -> Self {
        FilterSpec::Attributes(conditions)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for FilterSpec {
    fn from(pairs: [(K, V); N]) -> Self {
        FilterSpec::attributes(pairs)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for FilterSpec {
    fn from(pairs: Vec<(K, V)>) -> Self {
        FilterSpec::attributes(pairs)
    }
}

/// A loosely typed spec: strings are comparison queries, anything else has no
/// filter meaning.
impl From<Value> for FilterSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::String(query) => FilterSpec::Comparison(query),
            other => FilterSpec::Unsupported(other),
        }
    }
}

/// Operators allowed in a comparison string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Gt, // >
    Ge, // >=
    Lt, // <
    Le, // <=
}

impl ComparisonOperator {
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperator::Gt => left > right,
            ComparisonOperator::Ge => left >= right,
            ComparisonOperator::Lt => left < right,
            ComparisonOperator::Le => left <= right,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ">" => Ok(ComparisonOperator::Gt),
            ">=" => Ok(ComparisonOperator::Ge),
            "<" => Ok(ComparisonOperator::Lt),
            "<=" => Ok(ComparisonOperator::Le),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOperator::Gt => write!(f, ">"),
            ComparisonOperator::Ge => write!(f, ">="),
            ComparisonOperator::Lt => write!(f, "<"),
            ComparisonOperator::Le => write!(f, "<="),
        }
    }
}

/// Parsed `<attribute> <op> <number>` query
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub attribute: String,
    pub operator: ComparisonOperator,
    pub operand: f64,
}

impl Comparison {
    /// Parse a comparison string.
    ///
    /// The query must split on whitespace into exactly three tokens, the
    /// middle one being `>`, `>=`, `<` or `<=`. The last token is read as its
    /// longest leading number (`"10abc"` is 10, `"1_000"` is 1000) and as 0
    /// when it has none.
    pub fn parse(query: &str) -> Result<Self> {
        let malformed = || Error::MalformedComparison(query.to_string());

        let tokens: Vec<&str> = query.split_whitespace().collect();
        let [attribute, operator, operand] = tokens.as_slice() else {
            return Err(malformed());
        };

        let operator = operator.parse::<ComparisonOperator>().map_err(|_| malformed())?;

        Ok(Comparison {
            attribute: attribute.to_string(),
            operator,
            operand: leading_number(operand),
        })
    }

    /// Test an attribute value; null, absent and non-numeric values never match
    pub fn holds_for(&self, value: Option<&Value>) -> bool {
        value
            .and_then(Value::as_f64)
            .is_some_and(|v| self.operator.apply(v, self.operand))
    }
}

/// Longest prefix of `text` that reads as a decimal float, or 0.0.
///
/// Single underscores are allowed between digits. An exponent only counts
/// when digits follow it.
fn leading_number(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut literal = String::with_capacity(text.len());
    let mut pos = 0;

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        literal.push(sign as char);
        pos += 1;
    }
    let integral = take_digits(bytes, &mut pos, &mut literal);

    let has_fraction = bytes.get(pos) == Some(&b'.')
        && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit());
    if has_fraction {
        literal.push('.');
        pos += 1;
        take_digits(bytes, &mut pos, &mut literal);
    } else if integral == 0 {
        return 0.0;
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        let mut exp_pos = pos + 1;
        let mut exponent = String::from("e");
        if let Some(&sign @ (b'+' | b'-')) = bytes.get(exp_pos) {
            exponent.push(sign as char);
            exp_pos += 1;
        }
        if take_digits(bytes, &mut exp_pos, &mut exponent) > 0 {
            literal.push_str(&exponent);
        }
    }

    literal.parse().unwrap_or(0.0)
}

fn take_digits(bytes: &[u8], pos: &mut usize, out: &mut String) -> usize {
    let mut count = 0;
    while let Some(&b) = bytes.get(*pos) {
        let joins_digits =
            b == b'_' && count > 0 && bytes.get(*pos + 1).is_some_and(|n| n.is_ascii_digit());
        if b.is_ascii_digit() {
            out.push(b as char);
            count += 1;
        } else if !joins_digits {
            break;
        }
        *pos += 1;
    }
    count
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comparison() {
        let cmp = Comparison::parse("price_net > 0").unwrap();
        assert_eq!(cmp.attribute, "price_net");
        assert_eq!(cmp.operator, ComparisonOperator::Gt);
        assert_eq!(cmp.operand, 0.0);

        let cmp = Comparison::parse("  stock_level\t<=   2.5 ").unwrap();
        assert_eq!(cmp.operator, ComparisonOperator::Le);
        assert_eq!(cmp.operand, 2.5);
    }

    #[test]
    fn test_parse_rejects_wrong_token_count() {
        for query in ["", "price", "price >", "a b c d", "price > 10 AND"] {
            assert!(
                matches!(Comparison::parse(query), Err(Error::MalformedComparison(_))),
                "{query:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        for query in ["price >> 10", "price = 10", "price != 10", "price => 10"] {
            assert!(matches!(
                Comparison::parse(query),
                Err(Error::MalformedComparison(_))
            ));
        }
    }

    #[test]
    fn test_parse_reads_leading_number() {
        let operand = |query: &str| Comparison::parse(query).unwrap().operand;
        assert_eq!(operand("price > 1_000"), 1000.0);
        assert_eq!(operand("price > 10abc"), 10.0);
        assert_eq!(operand("price > -2.5kg"), -2.5);
        assert_eq!(operand("price > .5"), 0.5);
        assert_eq!(operand("price > 1e3"), 1000.0);
        assert_eq!(operand("price > 2e"), 2.0);
        assert_eq!(operand("price > 3."), 3.0);
        assert_eq!(operand("price > 1__0"), 1.0);
        assert_eq!(operand("price > _1"), 0.0);
        assert_eq!(operand("price > ten"), 0.0);
        assert_eq!(operand("price > NaN"), 0.0);
        assert_eq!(operand("price > -"), 0.0);
    }

    #[test]
    fn test_holds_for() {
        let cmp = Comparison::parse("price >= 10").unwrap();
        assert!(cmp.holds_for(Some(&Value::Integer(10))));
        assert!(cmp.holds_for(Some(&Value::Float(10.5))));
        assert!(!cmp.holds_for(Some(&Value::Integer(9))));
        assert!(!cmp.holds_for(Some(&Value::Null)));
        assert!(!cmp.holds_for(Some(&Value::String("11".into()))));
        assert!(!cmp.holds_for(None));
    }

    #[test]
    fn test_spec_conversions() {
        assert_eq!(
            FilterSpec::from("price > 1"),
            FilterSpec::Comparison("price > 1".to_string())
        );
        assert_eq!(
            FilterSpec::from([("warehouse_id", 3)]),
            FilterSpec::Attributes(vec![Condition::new("warehouse_id", 3)])
        );
        assert_eq!(
            FilterSpec::from(Value::Integer(7)),
            FilterSpec::Unsupported(Value::Integer(7))
        );
        assert_eq!(
            FilterSpec::from(Value::from("a > 1")),
            FilterSpec::Comparison("a > 1".to_string())
        );
    }
}
