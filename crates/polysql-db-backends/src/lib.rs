//! # polysql-db-backends
//!
//! Connection descriptors for the polysql builders. A [`DatabaseConfig`]
//! names an engine by driver or PDO-style DSN, a [`Connection`] fixes its
//! dialect and hands out configured [`QueryBuilder`](polysql_db::QueryBuilder)s,
//! and a [`ConnectionRegistry`] resolves the aliases declared in
//! [`Settings`](polysql_core::Settings).
//!
//! Nothing here opens a socket or runs SQL; connecting and executing the
//! built statements is left to the caller's driver.
//!
//! Supported drivers:
//! - `mysql`, `sqlite`, `pgsql`, `sqlsrv`, `cubrid`, `oci`, `sphinx`

pub mod base;
pub mod connection;
pub mod registry;

pub use base::DatabaseConfig;
pub use connection::Connection;
pub use registry::{ConnectionRegistry, DEFAULT_ALIAS};
