//! A resolved connection descriptor.

use polysql_core::{BuilderSettings, PolySqlResult};
use polysql_db::{Dialect, DialectRules, QueryBuilder, Value};

use crate::base::DatabaseConfig;

/// A connection handle that owns its dialect and hands out builders.
///
/// Opening a `Connection` performs no I/O. It fixes the dialect, table
/// prefix, and builder options so every [`QueryBuilder`] it creates renders
/// SQL the same way.
///
/// # Examples
///
/// ```
/// use polysql_db::Query;
/// use polysql_db_backends::{Connection, DatabaseConfig};
///
/// let conn = Connection::open(DatabaseConfig::sqlite_memory().with_table_prefix("app_"));
/// assert_eq!(conn.quote_sql("SELECT * FROM {{%user}}"), "SELECT * FROM `app_user`");
///
/// let (sql, _) = conn.query_builder().build(&Query::table("t")).unwrap();
/// assert_eq!(sql, "SELECT * FROM `t`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    config: DatabaseConfig,
    builder: BuilderSettings,
}

impl Connection {
    /// Opens a connection handle with default builder settings.
    pub fn open(config: DatabaseConfig) -> Self {
        Self::with_settings(config, BuilderSettings::default())
    }

    /// Opens a connection handle with explicit builder settings.
    pub fn with_settings(config: DatabaseConfig, builder: BuilderSettings) -> Self {
        Self { config, builder }
    }

    /// Opens a connection handle from a PDO-style DSN.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the DSN cannot be parsed.
    pub fn from_dsn(dsn: &str) -> PolySqlResult<Self> {
        Ok(Self::open(DatabaseConfig::from_dsn(dsn)?))
    }

    /// The connection configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The dialect of this connection.
    pub const fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// The dialect rules of this connection.
    pub fn rules(&self) -> DialectRules {
        self.config.dialect.rules()
    }

    /// The canonical driver name.
    pub const fn driver_name(&self) -> &'static str {
        self.config.driver_name()
    }

    /// A builder configured for this connection.
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::from_settings(self.config.dialect, &self.builder)
            .with_table_prefix(self.config.table_prefix.clone())
    }

    /// Quotes a table name for this dialect.
    pub fn quote_table_name(&self, name: &str) -> String {
        self.rules().quote_table_name(name)
    }

    /// Quotes a column name for this dialect.
    pub fn quote_column_name(&self, name: &str) -> String {
        self.rules().quote_column_name(name)
    }

    /// Renders a value as an inline literal for this dialect.
    pub fn quote_value(&self, value: &Value) -> String {
        self.rules().quote_value(value)
    }

    /// Rewrites `{{table}}` and `[[column]]` placeholders with this
    /// connection's quoting and table prefix.
    pub fn quote_sql(&self, sql: &str) -> String {
        self.rules().quote_sql(sql, &self.config.table_prefix)
    }
}
