//! # polysql
//!
//! A cross-dialect SQL condition and query builder.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `polysql` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use polysql::prelude::*;
//!
//! let query = Query::table("users")
//!     .select(["id"])
//!     .filter(Condition::eq("status", 1))
//!     .order_by(OrderBy::asc("id"))
//!     .limit(10);
//!
//! let (sql, params) = QueryBuilder::new(Dialect::MsSql).build(&query).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT [id] FROM [users] WHERE [status]=:qp0 ORDER BY [id] OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
//! );
//! assert_eq!(params.get(":qp0"), Some(&Value::Int(1)));
//! ```

/// Error types, settings, and logging setup.
pub use polysql_core as core;

/// Values, the condition and query AST, dialect rules, and the builder.
pub use polysql_db as db;

/// Connection descriptors and the alias registry.
pub use polysql_db_backends as db_backends;

/// JSON documents for [`Operand::Json`](polysql_db::Operand::Json).
pub use serde_json;

/// The most commonly used types in one import.
pub mod prelude {
    pub use polysql_core::{PolySqlError, PolySqlResult, Settings};
    pub use polysql_db::{
        ColumnDefinition, ColumnType, Condition, Dialect, Expression, LikeEscape, Operand,
        OrderBy, ParameterMap, Query, QueryBuilder, Value,
    };
    pub use polysql_db_backends::{Connection, ConnectionRegistry, DatabaseConfig};
}
