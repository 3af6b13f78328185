//! Abstract column types and their physical spelling per dialect.

use polysql_core::{PolySqlError, PolySqlResult};

use super::{Dialect, DialectRules};
use crate::expression::Expression;
use crate::value::Value;

/// An abstract column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key.
    Pk,
    /// Auto-incrementing big integer primary key.
    BigPk,
    /// Short variable-length string.
    String,
    /// Long text.
    Text,
    /// Small integer.
    SmallInt,
    /// Integer.
    Integer,
    /// Big integer.
    BigInt,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Fixed-point decimal.
    Decimal,
    /// Date and time.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Time of day.
    Time,
    /// Calendar date.
    Date,
    /// Binary data.
    Binary,
    /// Boolean.
    Boolean,
    /// Monetary amount.
    Money,
    /// JSON document.
    Json,
    /// A physical type passed through unchanged.
    Custom(String),
}

impl ColumnType {
    /// Position in the per-dialect type tables. `None` for custom types.
    const fn slot(&self) -> Option<usize> {
        Some(match self {
            Self::Pk => 0,
            Self::BigPk => 1,
            Self::String => 2,
            Self::Text => 3,
            Self::SmallInt => 4,
            Self::Integer => 5,
            Self::BigInt => 6,
            Self::Float => 7,
            Self::Double => 8,
            Self::Decimal => 9,
            Self::DateTime => 10,
            Self::Timestamp => 11,
            Self::Time => 12,
            Self::Date => 13,
            Self::Binary => 14,
            Self::Boolean => 15,
            Self::Money => 16,
            Self::Json => 17,
            Self::Custom(_) => return None,
        })
    }

    /// The physical type for `dialect`, or `None` if the dialect has no DDL.
    pub fn physical(&self, dialect: Dialect) -> Option<String> {
        let table = match dialect {
            Dialect::MySql => &MYSQL_TYPES,
            Dialect::Sqlite => &SQLITE_TYPES,
            Dialect::PostgreSql => &PGSQL_TYPES,
            Dialect::MsSql => &MSSQL_TYPES,
            Dialect::Cubrid => &CUBRID_TYPES,
            Dialect::Oracle => &ORACLE_TYPES,
            Dialect::Sphinx => return None,
        };
        match (self, self.slot()) {
            (Self::Custom(raw), _) => Some(raw.clone()),
            (_, Some(slot)) => table.get(slot).map(|t| (*t).to_string()),
            (_, None) => None,
        }
    }
}

// Order: pk, bigpk, string, text, smallint, integer, bigint, float, double,
// decimal, datetime, timestamp, time, date, binary, boolean, money, json.

const MYSQL_TYPES: [&str; 18] = [
    "int(11) NOT NULL AUTO_INCREMENT PRIMARY KEY",
    "bigint(20) NOT NULL AUTO_INCREMENT PRIMARY KEY",
    "varchar(255)",
    "text",
    "smallint(6)",
    "int(11)",
    "bigint(20)",
    "float",
    "double",
    "decimal(10,0)",
    "datetime",
    "timestamp",
    "time",
    "date",
    "blob",
    "tinyint(1)",
    "decimal(19,4)",
    "json",
];

const SQLITE_TYPES: [&str; 18] = [
    "integer PRIMARY KEY AUTOINCREMENT NOT NULL",
    "integer PRIMARY KEY AUTOINCREMENT NOT NULL",
    "varchar(255)",
    "text",
    "smallint",
    "integer",
    "bigint",
    "float",
    "double",
    "decimal(10,0)",
    "datetime",
    "timestamp",
    "time",
    "date",
    "blob",
    "boolean",
    "decimal(19,4)",
    "text",
];

const PGSQL_TYPES: [&str; 18] = [
    "serial NOT NULL PRIMARY KEY",
    "bigserial NOT NULL PRIMARY KEY",
    "varchar(255)",
    "text",
    "smallint",
    "integer",
    "bigint",
    "double precision",
    "double precision",
    "numeric(10,0)",
    "timestamp(0)",
    "timestamp(0)",
    "time(0)",
    "date",
    "bytea",
    "boolean",
    "numeric(19,4)",
    "jsonb",
];

const MSSQL_TYPES: [&str; 18] = [
    "int IDENTITY PRIMARY KEY",
    "bigint IDENTITY PRIMARY KEY",
    "nvarchar(255)",
    "nvarchar(max)",
    "smallint",
    "int",
    "bigint",
    "float",
    "float",
    "decimal(18,0)",
    "datetime",
    "datetime",
    "time",
    "date",
    "varbinary(max)",
    "bit",
    "decimal(19,4)",
    "nvarchar(max)",
];

const CUBRID_TYPES: [&str; 18] = [
    "int NOT NULL AUTO_INCREMENT PRIMARY KEY",
    "bigint NOT NULL AUTO_INCREMENT PRIMARY KEY",
    "varchar(255)",
    "varchar",
    "smallint",
    "int",
    "bigint",
    "float(7)",
    "double(15)",
    "decimal(10,0)",
    "datetime",
    "timestamp",
    "time",
    "date",
    "blob",
    "smallint",
    "decimal(19,4)",
    "json",
];

const ORACLE_TYPES: [&str; 18] = [
    "NUMBER(10) NOT NULL PRIMARY KEY",
    "NUMBER(20) NOT NULL PRIMARY KEY",
    "VARCHAR2(255)",
    "CLOB",
    "NUMBER(5)",
    "NUMBER(10)",
    "NUMBER(20)",
    "NUMBER",
    "NUMBER",
    "NUMBER",
    "TIMESTAMP",
    "TIMESTAMP",
    "TIMESTAMP",
    "DATE",
    "BLOB",
    "NUMBER(1)",
    "NUMBER(19,4)",
    "CLOB",
];

/// A column default.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    /// A literal, quoted per dialect.
    Value(Value),
    /// A raw expression (`CURRENT_TIMESTAMP`).
    Expression(Expression),
}

/// A column definition for `CREATE TABLE`.
///
/// # Examples
///
/// ```
/// use polysql_db::dialect::{ColumnDefinition, ColumnType, Dialect};
///
/// let def = ColumnDefinition::new(ColumnType::String).size(64).not_null();
/// assert_eq!(
///     Dialect::MySql.rules().column_type(&def).unwrap(),
///     "varchar(64) NOT NULL"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// The abstract type.
    pub column_type: ColumnType,
    /// Replaces the parenthesized part of the physical type (`64`, `10,2`).
    pub size: Option<String>,
    /// Adds `NOT NULL`.
    pub not_null: bool,
    /// Adds `UNIQUE`.
    pub unique: bool,
    /// Adds `DEFAULT ...`.
    pub default: Option<ColumnDefault>,
    /// Column comment, inlined where the dialect allows it.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a definition with no modifiers.
    pub const fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            size: None,
            not_null: false,
            unique: false,
            default: None,
            comment: None,
        }
    }

    /// Sets a length or precision.
    #[must_use]
    pub fn size(mut self, size: impl ToString) -> Self {
        self.size = Some(size.to_string());
        self
    }

    /// Sets precision and scale (`decimal(10,2)`).
    #[must_use]
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.size = Some(format!("{precision},{scale}"));
        self
    }

    /// Adds `NOT NULL`.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Adds `UNIQUE`.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a literal default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(ColumnDefault::Value(value.into()));
        self
    }

    /// Sets an expression default.
    #[must_use]
    pub fn default_expression(mut self, expr: Expression) -> Self {
        self.default = Some(ColumnDefault::Expression(expr));
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl From<ColumnType> for ColumnDefinition {
    fn from(column_type: ColumnType) -> Self {
        Self::new(column_type)
    }
}

impl DialectRules {
    /// Renders a column definition as the dialect's physical type plus modifiers.
    ///
    /// # Errors
    ///
    /// Returns [`PolySqlError::UnsupportedOperation`] on dialects without DDL.
    pub fn column_type(&self, def: &ColumnDefinition) -> PolySqlResult<String> {
        let mut sql = def
            .column_type
            .physical(self.dialect)
            .ok_or_else(|| PolySqlError::unsupported("Column types", self.dialect.name()))?;

        if let Some(size) = &def.size {
            sql = replace_size(&sql, size);
        }
        if def.not_null && !sql.contains("NOT NULL") {
            sql.push_str(" NOT NULL");
        }
        if def.unique {
            sql.push_str(" UNIQUE");
        }
        match &def.default {
            Some(ColumnDefault::Value(value)) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(&self.quote_value(value));
            }
            Some(ColumnDefault::Expression(expr)) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(expr.sql());
            }
            None => {}
        }
        if let Some(comment) = &def.comment {
            if self.supports(super::Feature::InlineColumnComment) {
                sql.push_str(" COMMENT ");
                sql.push_str(&self.quote_string(comment));
            }
        }
        Ok(sql)
    }
}

/// Replaces the first parenthesized group; types without one are unchanged.
fn replace_size(physical: &str, size: &str) -> String {
    match (physical.find('('), physical.find(')')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}({size}){}", &physical[..open], &physical[close + 1..])
        }
        _ => physical.to_string(),
    }
}
