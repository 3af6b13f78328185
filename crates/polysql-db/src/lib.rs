//! # polysql-db
//!
//! Cross-dialect SQL building. Calling code describes a statement as a
//! [`Query`] or [`Condition`] value; a [`QueryBuilder`] for one [`Dialect`]
//! renders it into SQL text plus a [`ParameterMap`] of named placeholders.
//!
//! ## Architecture
//!
//! Building is a pure function of `(query, dialect, settings)`. Each dialect
//! is an immutable [`DialectRules`] table, so adding a dialect means adding a
//! table rather than another builder type. Constructs a dialect cannot
//! express fail with `UnsupportedOperation` instead of producing SQL the
//! engine would reject.
//!
//! ## Module Overview
//!
//! - [`value`] - The [`Value`] enum bound into placeholders
//! - [`params`] - The ordered [`ParameterMap`]
//! - [`expression`] - Raw SQL fragments with their own parameters
//! - [`query`] - The condition and query AST
//! - [`dialect`] - Per-engine rules, quoting, and column types
//! - [`builder`] - Rendering of SELECT, DML, DDL, and conditions
//!
//! ## Example
//!
//! ```
//! use polysql_db::{Condition, Dialect, Query, QueryBuilder};
//!
//! let query = Query::table("users").filter(
//!     Condition::in_list("id", [1, 2, 3]) & Condition::like("name", ["ann"]),
//! );
//! let (sql, params) = QueryBuilder::new(Dialect::Sqlite).build(&query).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM `users` WHERE (`id` IN (:qp0, :qp1, :qp2)) AND (`name` LIKE :qp3 ESCAPE '\\')"
//! );
//! assert_eq!(params.len(), 4);
//! ```

// These clippy lints are intentionally allowed for the builder crate:
// - module_name_repetitions: QueryBuilder, DialectRules read better than Builder, Rules
// - format_push_string: format! with push_str is clearer than write! for SQL generation
// - doc_markdown: backtick requirements for SQL keywords in docs are too strict
// - return_self_not_must_use: chain methods carry #[must_use] where it matters
// - missing_const_for_fn: several accessors may grow non-const bodies
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::match_same_arms)]
// literal_string_with_formatting_args: `{{table}}` placeholders are SQL syntax, not format args
#![allow(clippy::literal_string_with_formatting_args)]

pub mod builder;
pub mod dialect;
pub mod expression;
pub mod params;
pub mod query;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use builder::QueryBuilder;
pub use dialect::{
    ColumnDefault, ColumnDefinition, ColumnType, Dialect, DialectRules, Feature, LimitStyle,
};
pub use expression::Expression;
pub use params::{ParameterMap, DEFAULT_PARAM_PREFIX};
pub use query::{
    ColumnRef, ComparisonOp, Condition, InColumns, InValues, Join, JoinType, LikeEscape,
    LikePattern, MatchExpr, Operand, OptionValue, OrderBy, Query, SelectColumn, SortDirection,
    TableRef,
};
pub use value::Value;
