//! Scalars a builder binds or inlines.
//!
//! A [`Value`] is either bound under a placeholder in a
//! [`ParameterMap`](crate::params::ParameterMap) or rendered inline by
//! [`DialectRules::quote_value`](crate::dialect::DialectRules::quote_value)
//! for batch inserts and column defaults. Every variant has a literal form
//! in each dialect. JSON documents are not values: they go through
//! [`Operand::Json`](crate::query::Operand::Json), which adds the dialect's cast.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Text form of temporal values, shared by `Display` and inline literals.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// A bound or inlined SQL scalar.
///
/// # Examples
///
/// ```
/// use polysql_db::value::Value;
///
/// assert_eq!(Value::from(42), Value::Int(42));
/// assert_eq!(Value::from(None::<&str>), Value::Null);
/// assert_eq!(Value::from(vec![Value::Int(1), Value::Int(2)]).to_string(), "(1, 2)");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    /// Timestamps are zone-less; UTC instants are converted on the way in.
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Uuid(uuid::Uuid),
    /// Expanded to `IN (...)` in hash conditions and to `(a, b)` inline.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` for SQL `NULL`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Renders the value the way it reads inside SQL, without quoting.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::Bytes(b) => b.iter().try_for_each(|byte| write!(f, "{byte:02x}")),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
            Self::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

value_from!(
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    uuid::Uuid => Uuid,
);

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(v: chrono::DateTime<chrono::Utc>) -> Self {
        Self::DateTime(v.naive_utc())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
