//! Right-hand sides of predicates.

use crate::expression::Expression;
use crate::query::select::Query;
use crate::value::Value;

/// The value side of a comparison, a `BETWEEN` bound, or an assignment.
///
/// Plain Rust values convert into [`Operand::Value`] and get bound as
/// placeholders. The other variants are rendered by the builder according to
/// the dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A value bound as a placeholder.
    Value(Value),
    /// A quoted column reference (`t.col`).
    Column(String),
    /// A raw expression embedded verbatim.
    Expression(Expression),
    /// A subquery, rendered in parentheses.
    Subquery(Box<Query>),
    /// A JSON document, cast per dialect.
    Json(serde_json::Value),
    /// An array literal (PostgreSQL only).
    Array {
        /// The array members, each bound separately.
        values: Vec<Value>,
        /// Optional element type for the trailing cast (`int` -> `::int[]`).
        element_type: Option<String>,
    },
}

impl Operand {
    /// A column reference.
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    /// A JSON document.
    pub const fn json(doc: serde_json::Value) -> Self {
        Self::Json(doc)
    }

    /// An array literal with an optional element type.
    pub fn array<I, V>(values: I, element_type: Option<&str>) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Array {
            values: values.into_iter().map(Into::into).collect(),
            element_type: element_type.map(str::to_string),
        }
    }

    /// Returns `true` for a bound `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Expression> for Operand {
    fn from(e: Expression) -> Self {
        Self::Expression(e)
    }
}

impl From<Query> for Operand {
    fn from(q: Query) -> Self {
        Self::Subquery(Box::new(q))
    }
}

macro_rules! operand_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Self::Value(Value::from(v))
                }
            }
        )*
    };
}

operand_from_value!(
    bool,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    String,
    &str,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
    chrono::DateTime<chrono::Utc>,
);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Self::Value(Value::from(v))
    }
}

/// One pattern of a `LIKE` condition.
#[derive(Debug, Clone, PartialEq)]
pub enum LikePattern {
    /// A literal substring: escaped, wrapped in `%`, and bound.
    Literal(String),
    /// A raw expression used as the pattern verbatim.
    Expression(Expression),
}

impl From<&str> for LikePattern {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for LikePattern {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Expression> for LikePattern {
    fn from(e: Expression) -> Self {
        Self::Expression(e)
    }
}
