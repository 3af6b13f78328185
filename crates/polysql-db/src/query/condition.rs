//! Structured conditions for `WHERE`, `HAVING`, and `ON` clauses.
//!
//! [`Condition`] is a closed set of predicate shapes. Leaves render to one
//! SQL fragment plus zero or more bound parameters; conjunctions only join
//! and parenthesize their children. Conditions compose with `&`, `|`, and
//! `!`.
//!
//! # Examples
//!
//! ```
//! use polysql_db::query::condition::Condition;
//!
//! // status = 1 AND (name LIKE '%ann%' OR age > 30)
//! let cond = Condition::eq("status", 1)
//!     & (Condition::like("name", ["ann"]) | Condition::gt("age", 30));
//!
//! // NOT (deleted_at IS NULL)
//! let negated = !Condition::is_null("deleted_at");
//! ```

use std::ops;

use crate::expression::Expression;
use crate::params::ParameterMap;
use crate::query::operand::{LikePattern, Operand};
use crate::query::select::Query;
use crate::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl ComparisonOp {
    /// The SQL spelling of the operator.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// How sibling conditions are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `AND`
    And,
    /// `OR`
    Or,
}

impl Connective {
    /// The SQL keyword.
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Escaping applied to literal `LIKE` patterns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LikeEscape {
    /// Use the dialect's escape table.
    #[default]
    Dialect,
    /// Bind patterns verbatim; `%` and `_` keep their wildcard meaning and
    /// no surrounding `%` is added.
    Disabled,
    /// Use a caller-supplied replacement table.
    Custom(Vec<(char, String)>),
}

/// The left-hand side of an `IN` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InColumns {
    /// A single column.
    Single(String),
    /// A column list, compared as a row value.
    Multiple(Vec<String>),
}

impl From<&str> for InColumns {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for InColumns {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for InColumns {
    fn from(v: Vec<String>) -> Self {
        Self::Multiple(v)
    }
}

impl From<Vec<&str>> for InColumns {
    fn from(v: Vec<&str>) -> Self {
        Self::Multiple(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for InColumns {
    fn from(v: [&str; N]) -> Self {
        Self::Multiple(v.iter().map(|s| (*s).to_string()).collect())
    }
}

/// The right-hand side of an `IN` condition.
#[derive(Debug, Clone, PartialEq)]
pub enum InValues {
    /// Scalar values for a single column.
    List(Vec<Value>),
    /// One row per tuple, positionally matching a column list.
    Rows(Vec<Vec<Value>>),
    /// A subquery.
    Subquery(Box<Query>),
}

/// A structured predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> value`.
    Comparison {
        /// The column name.
        column: String,
        /// The operator.
        op: ComparisonOp,
        /// The right-hand side.
        value: Operand,
    },
    /// Column/value pairs combined with `AND`. `NULL` values turn into
    /// `IS NULL` and list values into `IN`.
    Hash(Vec<(String, Value)>),
    /// `IN` / `NOT IN`.
    In {
        /// The column or column list.
        columns: InColumns,
        /// `NOT IN` when set.
        negated: bool,
        /// The value list, row list, or subquery.
        values: InValues,
    },
    /// `LIKE` family.
    Like {
        /// The column name.
        column: String,
        /// One part per pattern.
        patterns: Vec<LikePattern>,
        /// `NOT LIKE` when set.
        negated: bool,
        /// How the per-pattern parts are joined.
        connective: Connective,
        /// Escaping for literal patterns.
        escape: LikeEscape,
        /// Match regardless of case.
        case_insensitive: bool,
    },
    /// `BETWEEN` / `NOT BETWEEN`.
    Between {
        /// The column name.
        column: String,
        /// Lower bound.
        from: Operand,
        /// Upper bound.
        to: Operand,
        /// `NOT BETWEEN` when set.
        negated: bool,
    },
    /// `AND` / `OR` of child conditions.
    Conjunction {
        /// The joining keyword.
        connective: Connective,
        /// The children, in order.
        conditions: Vec<Condition>,
    },
    /// `NOT (condition)`.
    Not(Box<Condition>),
    /// `EXISTS (subquery)` / `NOT EXISTS`.
    Exists {
        /// `NOT EXISTS` when set.
        negated: bool,
        /// The subquery.
        query: Box<Query>,
    },
    /// A raw SQL fragment with its parameters.
    Raw(Expression),
}

impl Condition {
    // ── Comparisons ─────────────────────────────────────────────────

    /// `column <op> value`.
    pub fn compare(column: impl Into<String>, op: ComparisonOp, value: impl Into<Operand>) -> Self {
        Self::Comparison {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// `column = value` (`IS NULL` for a null value).
    pub fn eq(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::Eq, value)
    }

    /// `column != value` (`IS NOT NULL` for a null value).
    pub fn ne(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::NotEq, value)
    }

    /// `column > value`.
    pub fn gt(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::Gt, value)
    }

    /// `column >= value`.
    pub fn gte(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::Gte, value)
    }

    /// `column < value`.
    pub fn lt(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::Lt, value)
    }

    /// `column <= value`.
    pub fn lte(column: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(column, ComparisonOp::Lte, value)
    }

    /// `column IS NULL`.
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::eq(column, Value::Null)
    }

    /// `column IS NOT NULL`.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::ne(column, Value::Null)
    }

    /// Column/value pairs combined with `AND`.
    pub fn hash<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Hash(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    // ── IN ──────────────────────────────────────────────────────────

    /// `column IN (values...)`.
    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::In {
            columns: InColumns::Single(column.into()),
            negated: false,
            values: InValues::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// `column NOT IN (values...)`.
    pub fn not_in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::in_list(column, values).negated()
    }

    /// `(a, b) IN ((...), (...))`.
    pub fn in_rows<C, S>(columns: C, rows: Vec<Vec<Value>>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::In {
            columns: InColumns::Multiple(columns.into_iter().map(Into::into).collect()),
            negated: false,
            values: InValues::Rows(rows),
        }
    }

    /// `(a, b) NOT IN ((...), (...))`.
    pub fn not_in_rows<C, S>(columns: C, rows: Vec<Vec<Value>>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::in_rows(columns, rows).negated()
    }

    /// `column IN (subquery)`. A column list renders as a row value.
    pub fn in_subquery(columns: impl Into<InColumns>, query: Query) -> Self {
        Self::In {
            columns: columns.into(),
            negated: false,
            values: InValues::Subquery(Box::new(query)),
        }
    }

    /// `column NOT IN (subquery)`.
    pub fn not_in_subquery(columns: impl Into<InColumns>, query: Query) -> Self {
        Self::in_subquery(columns, query).negated()
    }

    // ── LIKE ────────────────────────────────────────────────────────

    fn like_with<I, P>(
        column: impl Into<String>,
        patterns: I,
        negated: bool,
        connective: Connective,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LikePattern>,
    {
        Self::Like {
            column: column.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            negated,
            connective,
            escape: LikeEscape::Dialect,
            case_insensitive: false,
        }
    }

    /// `column LIKE '%p1%' AND column LIKE '%p2%'`.
    pub fn like<I, P>(column: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LikePattern>,
    {
        Self::like_with(column, patterns, false, Connective::And)
    }

    /// `column NOT LIKE '%p1%' AND column NOT LIKE '%p2%'`.
    pub fn not_like<I, P>(column: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LikePattern>,
    {
        Self::like_with(column, patterns, true, Connective::And)
    }

    /// `column LIKE '%p1%' OR column LIKE '%p2%'`.
    pub fn or_like<I, P>(column: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LikePattern>,
    {
        Self::like_with(column, patterns, false, Connective::Or)
    }

    /// `column NOT LIKE '%p1%' OR column NOT LIKE '%p2%'`.
    pub fn or_not_like<I, P>(column: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<LikePattern>,
    {
        Self::like_with(column, patterns, true, Connective::Or)
    }

    /// Sets the escaping of a `LIKE` condition. Other conditions are returned unchanged.
    #[must_use]
    pub fn with_escape(mut self, new_escape: LikeEscape) -> Self {
        if let Self::Like { escape, .. } = &mut self {
            *escape = new_escape;
        }
        self
    }

    /// Makes a `LIKE` condition case-insensitive. Other conditions are returned unchanged.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        if let Self::Like {
            case_insensitive, ..
        } = &mut self
        {
            *case_insensitive = true;
        }
        self
    }

    // ── BETWEEN ─────────────────────────────────────────────────────

    /// `column BETWEEN from AND to`.
    pub fn between(
        column: impl Into<String>,
        from: impl Into<Operand>,
        to: impl Into<Operand>,
    ) -> Self {
        Self::Between {
            column: column.into(),
            from: from.into(),
            to: to.into(),
            negated: false,
        }
    }

    /// `column NOT BETWEEN from AND to`.
    pub fn not_between(
        column: impl Into<String>,
        from: impl Into<Operand>,
        to: impl Into<Operand>,
    ) -> Self {
        Self::between(column, from, to).negated()
    }

    // ── Composition ─────────────────────────────────────────────────

    /// `(c1) AND (c2) ...`.
    pub fn and<I: IntoIterator<Item = Self>>(conditions: I) -> Self {
        Self::Conjunction {
            connective: Connective::And,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// `(c1) OR (c2) ...`.
    pub fn or<I: IntoIterator<Item = Self>>(conditions: I) -> Self {
        Self::Conjunction {
            connective: Connective::Or,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// `NOT (condition)`.
    pub fn negate(condition: Self) -> Self {
        Self::Not(Box::new(condition))
    }

    /// `EXISTS (subquery)`.
    pub fn exists(query: Query) -> Self {
        Self::Exists {
            negated: false,
            query: Box::new(query),
        }
    }

    /// `NOT EXISTS (subquery)`.
    pub fn not_exists(query: Query) -> Self {
        Self::Exists {
            negated: true,
            query: Box::new(query),
        }
    }

    /// A raw SQL fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(Expression::new(sql))
    }

    /// A raw SQL fragment with named parameters.
    pub fn raw_with_params(sql: impl Into<String>, params: ParameterMap) -> Self {
        Self::Raw(Expression::with_params(sql, params))
    }

    /// Flips the `negated` flag of `IN`, `BETWEEN`, and `EXISTS` conditions.
    fn negated(mut self) -> Self {
        match &mut self {
            Self::In { negated, .. }
            | Self::Between { negated, .. }
            | Self::Exists { negated, .. } => *negated = !*negated,
            _ => {}
        }
        self
    }

    /// Returns `true` if the condition renders to nothing.
    ///
    /// Empty conjunctions, empty hashes, and blank raw fragments are empty;
    /// a conjunction whose children are all empty is empty too.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Conjunction { conditions, .. } => conditions.iter().all(Self::is_empty),
            Self::Hash(pairs) => pairs.is_empty(),
            Self::Not(inner) => inner.is_empty(),
            Self::Raw(expr) => expr.is_empty(),
            _ => false,
        }
    }
}

impl From<Expression> for Condition {
    fn from(expr: Expression) -> Self {
        Self::Raw(expr)
    }
}

impl ops::BitAnd for Condition {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        combine(Connective::And, self, rhs)
    }
}

impl ops::BitOr for Condition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        combine(Connective::Or, self, rhs)
    }
}

impl ops::Not for Condition {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            // Double negation cancels out
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }
}

/// Joins two conditions, flattening same-kind conjunctions.
fn combine(connective: Connective, left: Condition, right: Condition) -> Condition {
    let mut conditions = Vec::new();
    for side in [left, right] {
        match side {
            Condition::Conjunction {
                connective: c,
                conditions: children,
            } if c == connective => conditions.extend(children),
            other => conditions.push(other),
        }
    }
    Condition::Conjunction {
        connective,
        conditions,
    }
}
