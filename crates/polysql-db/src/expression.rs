//! Raw SQL expressions.

use std::fmt;

use crate::params::ParameterMap;
use crate::value::Value;

/// A raw SQL fragment embedded verbatim, together with its own parameters.
///
/// Expressions are the escape hatch of the builder: nothing inside `sql` is
/// quoted or sanitized, and `params` are merged into the build accumulator
/// unchanged. A name already bound to a different value fails the build.
///
/// # Examples
///
/// ```
/// use polysql_db::expression::Expression;
///
/// let expr = Expression::new("NOW()");
/// assert_eq!(expr.sql(), "NOW()");
///
/// let expr = Expression::new("age > :min").bind(":min", 18);
/// assert_eq!(expr.params().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    sql: String,
    params: ParameterMap,
}

impl Expression {
    /// Creates an expression without parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: ParameterMap::new(),
        }
    }

    /// Creates an expression with a prepared parameter map.
    pub fn with_params(sql: impl Into<String>, params: ParameterMap) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Adds one named parameter.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The parameters carried by this expression.
    pub const fn params(&self) -> &ParameterMap {
        &self.params
    }

    /// Returns `true` when the SQL text is blank.
    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<&str> for Expression {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_params() {
        let expr = Expression::new("COUNT(*)");
        assert_eq!(expr.to_string(), "COUNT(*)");
        assert!(expr.params().is_empty());
    }

    #[test]
    fn test_bind_chain() {
        let expr = Expression::new("a = :a OR b = :b").bind(":a", 1).bind(":b", "x");
        assert_eq!(expr.params().get(":b"), Some(&Value::from("x")));
    }

    #[test]
    fn test_is_empty() {
        assert!(Expression::new("   ").is_empty());
        assert!(!Expression::from("1").is_empty());
    }
}
