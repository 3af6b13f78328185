//! Dialect descriptors.
//!
//! Each supported engine is described by one immutable [`DialectRules`]
//! value: identifier quotes, `LIKE` escaping, paging and union syntax,
//! boolean literals, and the set of constructs it can express. Builders ask
//! [`DialectRules::require`] before emitting anything optional.

pub mod quoting;
pub mod types;

use std::fmt;
use std::str::FromStr;

use polysql_core::{PolySqlError, PolySqlResult};

pub use types::{ColumnDefault, ColumnDefinition, ColumnType};

/// The closed set of supported SQL engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// SQLite 3.
    Sqlite,
    /// PostgreSQL.
    PostgreSql,
    /// Microsoft SQL Server.
    MsSql,
    /// CUBRID.
    Cubrid,
    /// Sphinx search (SphinxQL).
    Sphinx,
    /// Oracle 12c and later.
    Oracle,
}

impl Dialect {
    /// Every dialect, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::MySql,
        Self::Sqlite,
        Self::PostgreSql,
        Self::MsSql,
        Self::Cubrid,
        Self::Sphinx,
        Self::Oracle,
    ];

    /// Resolves a driver name (`pgsql`, `sqlsrv`, `oci`, ...) to a dialect.
    ///
    /// Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`PolySqlError::InvalidConfiguration`] for unknown names.
    pub fn from_driver_name(driver: &str) -> PolySqlResult<Self> {
        match driver.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mysqli" => Ok(Self::MySql),
            "sqlite" | "sqlite2" | "sqlite3" => Ok(Self::Sqlite),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::PostgreSql),
            "sqlsrv" | "mssql" | "dblib" => Ok(Self::MsSql),
            "cubrid" => Ok(Self::Cubrid),
            "oci" | "oracle" => Ok(Self::Oracle),
            "sphinx" => Ok(Self::Sphinx),
            other => Err(PolySqlError::InvalidConfiguration(format!(
                "Unknown database driver '{other}'"
            ))),
        }
    }

    /// Human-readable name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MySql => "MySQL",
            Self::Sqlite => "SQLite",
            Self::PostgreSql => "PostgreSQL",
            Self::MsSql => "MSSQL",
            Self::Cubrid => "CUBRID",
            Self::Sphinx => "Sphinx",
            Self::Oracle => "Oracle",
        }
    }

    /// The canonical driver name.
    pub const fn driver_name(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::PostgreSql => "pgsql",
            Self::MsSql => "sqlsrv",
            Self::Cubrid => "cubrid",
            Self::Sphinx => "sphinx",
            Self::Oracle => "oci",
        }
    }

    /// Returns the rules for this dialect.
    pub fn rules(self) -> DialectRules {
        DialectRules::for_dialect(self)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = PolySqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_driver_name(s)
    }
}

/// Constructs whose availability differs between dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// `(a, b) IN ((..), (..))`.
    RowValueIn,
    /// `(a, b) IN (SELECT ...)`.
    MultiColumnSubqueryIn,
    /// Subqueries anywhere in a statement.
    Subquery,
    /// The `LIKE` family.
    Like,
    /// Native `ILIKE`.
    ILike,
    /// `EXISTS (...)`.
    Exists,
    /// `JOIN` clauses.
    Join,
    /// `UNION`.
    Union,
    /// `REPLACE INTO`.
    Replace,
    /// `ARRAY[...]` literals.
    Array,
    /// `COMMENT ON TABLE` or `ALTER TABLE ... COMMENT`.
    TableComment,
    /// `COMMENT ON COLUMN`.
    ColumnComment,
    /// `COMMENT '...'` inside a column definition.
    InlineColumnComment,
    /// `CREATE TABLE`, `DROP TABLE`.
    Ddl,
    /// Sphinx `MATCH`, `WITHIN GROUP ORDER BY`, and `OPTION`.
    FullText,
    /// `INSERT ... SELECT`.
    InsertFromQuery,
}

/// Paging syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStyle {
    /// `LIMIT n OFFSET m`; offset alone becomes `LIMIT m, <max>`.
    MySql,
    /// `LIMIT n OFFSET m`; offset alone becomes `LIMIT <max> OFFSET m`.
    Sqlite,
    /// `LIMIT n OFFSET m`, either part optional.
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
    OffsetFetch,
    /// `LIMIT m,n`; offset alone uses the default page of 1000.
    Sphinx,
}

/// How `UNION` operands are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionStyle {
    /// `(a) UNION (b)`.
    Parenthesized,
    /// `a UNION b`.
    Bare,
}

/// How a multi-row insert is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchInsertStyle {
    /// `INSERT INTO t (..) VALUES (..), (..)`.
    MultiValues,
    /// `INSERT ALL INTO t (..) VALUES (..) ... SELECT 1 FROM SYS.DUAL`.
    InsertAll,
}

const BACKSLASH_ESCAPES: &[(char, &str)] = &[('\\', "\\\\"), ('%', "\\%"), ('_', "\\_")];
const BRACKET_ESCAPES: &[(char, &str)] = &[
    ('%', "[%]"),
    ('_', "[_]"),
    ('[', "[[]"),
    (']', "[]]"),
    ('\\', "[\\]"),
];
const BANG_ESCAPES: &[(char, &str)] = &[('!', "!!"), ('%', "!%"), ('_', "!_")];

/// Immutable per-dialect rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectRules {
    /// The dialect these rules describe.
    pub dialect: Dialect,
    /// Opening and closing identifier quote, if identifiers are quoted.
    pub identifier_quotes: Option<(&'static str, &'static str)>,
    /// Replacement table for `LIKE` literals.
    pub like_escapes: &'static [(char, &'static str)],
    /// Character named in a trailing `ESCAPE '...'` clause, if one is needed.
    pub like_escape_char: Option<char>,
    /// Paging syntax.
    pub limit_style: LimitStyle,
    /// Union wrapping.
    pub union_style: UnionStyle,
    /// Multi-row insert syntax.
    pub batch_insert_style: BatchInsertStyle,
    /// Literal spellings of `true` and `false`.
    pub bool_literals: (&'static str, &'static str),
    /// Whether backslashes in string literals must be doubled.
    pub backslash_in_strings: bool,
    /// Maximum number of values in one `IN (...)` list, if limited.
    pub max_in_list: Option<usize>,
    features: &'static [Feature],
}

impl DialectRules {
    /// Builds the rules for one dialect.
    pub const fn for_dialect(dialect: Dialect) -> Self {
        use Feature::{
            Array, ColumnComment, Ddl, Exists, FullText, ILike, InlineColumnComment,
            InsertFromQuery, Join, Like, MultiColumnSubqueryIn, Replace, RowValueIn, Subquery,
            TableComment, Union,
        };

        match dialect {
            Dialect::MySql => Self {
                dialect,
                identifier_quotes: Some(("`", "`")),
                like_escapes: BACKSLASH_ESCAPES,
                like_escape_char: None,
                limit_style: LimitStyle::MySql,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("1", "0"),
                backslash_in_strings: true,
                max_in_list: None,
                features: &[
                    RowValueIn,
                    MultiColumnSubqueryIn,
                    Subquery,
                    Like,
                    Exists,
                    Join,
                    Union,
                    Replace,
                    TableComment,
                    InlineColumnComment,
                    Ddl,
                    InsertFromQuery,
                ],
            },
            Dialect::Sqlite => Self {
                dialect,
                identifier_quotes: Some(("`", "`")),
                like_escapes: BACKSLASH_ESCAPES,
                like_escape_char: Some('\\'),
                limit_style: LimitStyle::Sqlite,
                union_style: UnionStyle::Bare,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("1", "0"),
                backslash_in_strings: false,
                max_in_list: None,
                features: &[
                    Subquery,
                    Like,
                    Exists,
                    Join,
                    Union,
                    Replace,
                    Ddl,
                    InsertFromQuery,
                ],
            },
            Dialect::PostgreSql => Self {
                dialect,
                identifier_quotes: Some(("\"", "\"")),
                like_escapes: BACKSLASH_ESCAPES,
                like_escape_char: None,
                limit_style: LimitStyle::LimitOffset,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("TRUE", "FALSE"),
                backslash_in_strings: false,
                max_in_list: None,
                features: &[
                    RowValueIn,
                    MultiColumnSubqueryIn,
                    Subquery,
                    Like,
                    ILike,
                    Exists,
                    Join,
                    Union,
                    Array,
                    TableComment,
                    ColumnComment,
                    Ddl,
                    InsertFromQuery,
                ],
            },
            Dialect::MsSql => Self {
                dialect,
                identifier_quotes: Some(("[", "]")),
                like_escapes: BRACKET_ESCAPES,
                like_escape_char: None,
                limit_style: LimitStyle::OffsetFetch,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("1", "0"),
                backslash_in_strings: false,
                max_in_list: None,
                features: &[
                    Subquery,
                    Like,
                    Exists,
                    Join,
                    Union,
                    Ddl,
                    InsertFromQuery,
                ],
            },
            Dialect::Cubrid => Self {
                dialect,
                identifier_quotes: Some(("\"", "\"")),
                like_escapes: BANG_ESCAPES,
                like_escape_char: Some('!'),
                limit_style: LimitStyle::MySql,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("1", "0"),
                backslash_in_strings: true,
                max_in_list: None,
                features: &[
                    RowValueIn,
                    MultiColumnSubqueryIn,
                    Subquery,
                    Like,
                    Exists,
                    Join,
                    Union,
                    TableComment,
                    InlineColumnComment,
                    Ddl,
                    InsertFromQuery,
                ],
            },
            Dialect::Sphinx => Self {
                dialect,
                identifier_quotes: None,
                like_escapes: &[],
                like_escape_char: None,
                limit_style: LimitStyle::Sphinx,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::MultiValues,
                bool_literals: ("1", "0"),
                backslash_in_strings: true,
                max_in_list: None,
                features: &[RowValueIn, Replace, FullText],
            },
            Dialect::Oracle => Self {
                dialect,
                identifier_quotes: Some(("\"", "\"")),
                like_escapes: BANG_ESCAPES,
                like_escape_char: Some('!'),
                limit_style: LimitStyle::OffsetFetch,
                union_style: UnionStyle::Parenthesized,
                batch_insert_style: BatchInsertStyle::InsertAll,
                bool_literals: ("1", "0"),
                backslash_in_strings: false,
                max_in_list: Some(1000),
                features: &[
                    RowValueIn,
                    MultiColumnSubqueryIn,
                    Subquery,
                    Like,
                    Exists,
                    Join,
                    Union,
                    TableComment,
                    ColumnComment,
                    Ddl,
                    InsertFromQuery,
                ],
            },
        }
    }

    /// Returns `true` if the dialect can express `feature`.
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Fails with [`PolySqlError::UnsupportedOperation`] naming `what` unless
    /// `feature` is supported.
    ///
    /// # Errors
    ///
    /// Returns the unsupported-operation error when the dialect lacks `feature`.
    pub fn require(&self, feature: Feature, what: &str) -> PolySqlResult<()> {
        if self.supports(feature) {
            Ok(())
        } else {
            tracing::warn!(
                dialect = self.dialect.name(),
                construct = what,
                "Unsupported construct"
            );
            Err(PolySqlError::unsupported(what, self.dialect.name()))
        }
    }

    /// The literal for a boolean.
    pub const fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            self.bool_literals.0
        } else {
            self.bool_literals.1
        }
    }
}

impl From<Dialect> for DialectRules {
    fn from(dialect: Dialect) -> Self {
        Self::for_dialect(dialect)
    }
}
