//! Input limits for query arguments
//!
//! Every recognized operation validates its arguments against a
//! [`QueryLimits`] before it runs, in both execution modes, so an oversized
//! filter is rejected the same way whether or not the data was preloaded.
//! The default accepts everything; bounds are opt-in through
//! [`QueryLimits::recommended`] or the `with_*` builders.

use crate::error::{Error, Result};
use crate::filter::FilterSpec;
use crate::value::Value;

/// Maximum comparison-string length (1 KiB)
pub const RECOMMENDED_MAX_COMPARISON_LEN: usize = 1024;

/// Maximum number of attribute conditions in one filter
pub const RECOMMENDED_MAX_CONDITIONS: usize = 64;

/// Maximum number of columns in one `pluck`
pub const RECOMMENDED_MAX_PLUCK_COLUMNS: usize = 64;

/// Maximum number of values in one membership list
pub const RECOMMENDED_MAX_MEMBERSHIP_VALUES: usize = 10_000;

/// Limits applied to query arguments
///
/// `QueryLimits::default()` is [`QueryLimits::unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Longest accepted comparison string, in bytes
    pub max_comparison_len: usize,
    /// Most conditions in one attribute-map filter
    pub max_conditions: usize,
    /// Most columns in one `pluck`
    pub max_pluck_columns: usize,
    /// Most values in one membership list
    pub max_membership_values: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl QueryLimits {
    /// Bounds suited to filters built from untrusted input
    pub fn recommended() -> Self {
        Self {
            max_comparison_len: RECOMMENDED_MAX_COMPARISON_LEN,
            max_conditions: RECOMMENDED_MAX_CONDITIONS,
            max_pluck_columns: RECOMMENDED_MAX_PLUCK_COLUMNS,
            max_membership_values: RECOMMENDED_MAX_MEMBERSHIP_VALUES,
        }
    }

    /// Limits that accept everything
    pub fn unlimited() -> Self {
        Self {
            max_comparison_len: usize::MAX,
            max_conditions: usize::MAX,
            max_pluck_columns: usize::MAX,
            max_membership_values: usize::MAX,
        }
    }

    /// Set the comparison-string length limit
    pub fn with_max_comparison_len(mut self, len: usize) -> Self {
        self.max_comparison_len = len;
        self
    }

    /// Set the condition count limit
    pub fn with_max_conditions(mut self, count: usize) -> Self {
        self.max_conditions = count;
        self
    }

    /// Set the pluck column limit
    pub fn with_max_pluck_columns(mut self, count: usize) -> Self {
        self.max_pluck_columns = count;
        self
    }

    /// Set the membership list limit
    pub fn with_max_membership_values(mut self, count: usize) -> Self {
        self.max_membership_values = count;
        self
    }

    /// Validates a filter specification.
    ///
    /// Only sizes are checked here; shape errors (`MalformedComparison`,
    /// `UnknownOptions`) are left to evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if a limit is exceeded
    pub fn validate_spec(&self, spec: &FilterSpec) -> Result<()> {
        match spec {
            FilterSpec::Comparison(query) => {
                if query.len() > self.max_comparison_len {
                    return Err(Error::InvalidInput(format!(
                        "Comparison length {} exceeds maximum {}",
                        query.len(),
                        self.max_comparison_len
                    )));
                }
            }
            FilterSpec::Attributes(conditions) => {
                if conditions.len() > self.max_conditions {
                    return Err(Error::InvalidInput(format!(
                        "Filter has {} conditions, maximum is {}",
                        conditions.len(),
                        self.max_conditions
                    )));
                }
                for condition in conditions {
                    if let Value::List(values) = &condition.expected {
                        if values.len() > self.max_membership_values {
                            return Err(Error::InvalidInput(format!(
                                "Membership list for '{}' has {} values, maximum is {}",
                                condition.attribute,
                                values.len(),
                                self.max_membership_values
                            )));
                        }
                    }
                }
            }
            FilterSpec::Unsupported(_) => {}
        }
        Ok(())
    }

    /// Validates the column list of a `pluck`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for an empty column name or too many columns
    pub fn validate_columns<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        if columns.len() > self.max_pluck_columns {
            return Err(Error::InvalidInput(format!(
                "Pluck of {} columns exceeds maximum {}",
                columns.len(),
                self.max_pluck_columns
            )));
        }
        if columns.iter().any(|c| c.as_ref().is_empty()) {
            return Err(Error::InvalidInput("Column name cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Condition;

    #[test]
    fn test_default_is_unlimited() {
        let limits = QueryLimits::default();
        assert_eq!(limits, QueryLimits::unlimited());
        let ids: Vec<i64> = (0..=RECOMMENDED_MAX_MEMBERSHIP_VALUES as i64).collect();
        assert!(limits.validate_spec(&FilterSpec::from([("id", ids)])).is_ok());
    }

    #[test]
    fn test_recommended_accepts_ordinary_specs() {
        let limits = QueryLimits::recommended();
        assert!(limits.validate_spec(&"price > 10".into()).is_ok());
        assert!(limits
            .validate_spec(&FilterSpec::from([("warehouse_id", vec![1, 2, 3])]))
            .is_ok());
        assert!(limits.validate_columns(&["stock_level", "price"]).is_ok());
    }

    #[test]
    fn test_comparison_length() {
        let limits = QueryLimits::default().with_max_comparison_len(8);
        assert!(limits.validate_spec(&"a > 1".into()).is_ok());
        assert!(matches!(
            limits.validate_spec(&"price_net > 0".into()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_condition_and_membership_counts() {
        let limits = QueryLimits::recommended()
            .with_max_conditions(1)
            .with_max_membership_values(2);

        let two = FilterSpec::Attributes(vec![Condition::new("a", 1), Condition::new("b", 2)]);
        assert!(matches!(
            limits.validate_spec(&two),
            Err(Error::InvalidInput(_))
        ));

        let wide = FilterSpec::from([("a", vec![1, 2, 3])]);
        assert!(matches!(
            limits.validate_spec(&wide),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_columns() {
        let limits = QueryLimits::default().with_max_pluck_columns(1);
        assert!(limits.validate_columns(&["id", "price"]).is_err());
        assert!(QueryLimits::unlimited().validate_columns(&[""]).is_err());
        assert!(QueryLimits::unlimited().validate_columns::<&str>(&[]).is_ok());
    }
}
