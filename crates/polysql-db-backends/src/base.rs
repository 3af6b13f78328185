//! Connection descriptors.
//!
//! A [`DatabaseConfig`] names the engine and the parameters a driver would
//! need to reach it. The dialect comes from an explicit driver name or from
//! the prefix of a PDO-style DSN (`pgsql:host=localhost;dbname=app`).

use std::collections::HashMap;

use polysql_core::{DatabaseSettings, PolySqlError, PolySqlResult};
use polysql_db::Dialect;

/// Configuration for connecting to a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// The dialect of the engine.
    pub dialect: Dialect,
    /// The database name or file path.
    pub name: String,
    /// The database host (for network-based backends).
    pub host: Option<String>,
    /// The database port.
    pub port: Option<u16>,
    /// The database user.
    pub user: Option<String>,
    /// The database password.
    pub password: Option<String>,
    /// Prefix substituted for `%` in `{{%table}}` placeholders.
    pub table_prefix: String,
    /// Additional connection options.
    pub options: HashMap<String, String>,
}

impl DatabaseConfig {
    fn bare(dialect: Dialect, name: impl Into<String>) -> Self {
        Self {
            dialect,
            name: name.into(),
            host: None,
            port: None,
            user: None,
            password: None,
            table_prefix: String::new(),
            options: HashMap::new(),
        }
    }

    fn network(
        dialect: Dialect,
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            user: Some(user.into()),
            password: Some(password.into()),
            ..Self::bare(dialect, name)
        }
    }

    /// Creates a configuration for an in-memory SQLite database.
    pub fn sqlite_memory() -> Self {
        Self::bare(Dialect::Sqlite, ":memory:")
    }

    /// Creates a configuration for a SQLite file database.
    pub fn sqlite_file(path: impl Into<String>) -> Self {
        Self::bare(Dialect::Sqlite, path)
    }

    /// Creates a configuration for a PostgreSQL database.
    pub fn postgres(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::network(Dialect::PostgreSql, name, host, port, user, password)
    }

    /// Creates a configuration for a MySQL database.
    pub fn mysql(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::network(Dialect::MySql, name, host, port, user, password)
    }

    /// Creates a configuration for a SQL Server database.
    pub fn mssql(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::network(Dialect::MsSql, name, host, port, user, password)
    }

    /// Creates a configuration for an Oracle database.
    pub fn oracle(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::network(Dialect::Oracle, name, host, port, user, password)
    }

    /// Creates a configuration for a CUBRID database.
    pub fn cubrid(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::network(Dialect::Cubrid, name, host, port, user, password)
    }

    /// Creates a configuration for a Sphinx search daemon (SphinxQL).
    pub fn sphinx(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            ..Self::bare(Dialect::Sphinx, "")
        }
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Parses a PDO-style DSN: `driver:key=value;key=value`.
    ///
    /// SQLite DSNs carry a path instead of pairs (`sqlite:/tmp/app.db`,
    /// `sqlite::memory:`). Recognized keys are `host`/`server`, `port`,
    /// and `dbname`/`database`; `server=host,port` is split on the comma.
    /// Anything else lands in `options`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a missing driver prefix, an
    /// unknown driver, a pair without `=`, or a non-numeric port.
    ///
    /// # Examples
    ///
    /// ```
    /// use polysql_db::Dialect;
    /// use polysql_db_backends::DatabaseConfig;
    ///
    /// let cfg = DatabaseConfig::from_dsn("pgsql:host=db;port=5433;dbname=app").unwrap();
    /// assert_eq!(cfg.dialect, Dialect::PostgreSql);
    /// assert_eq!(cfg.host.as_deref(), Some("db"));
    /// assert_eq!(cfg.port, Some(5433));
    /// assert_eq!(cfg.name, "app");
    /// ```
    pub fn from_dsn(dsn: &str) -> PolySqlResult<Self> {
        let (driver, rest) = dsn.split_once(':').ok_or_else(|| {
            PolySqlError::InvalidConfiguration(format!(
                "Malformed DSN '{dsn}': missing driver prefix"
            ))
        })?;
        let dialect = Dialect::from_driver_name(driver)?;

        if dialect == Dialect::Sqlite {
            return Ok(Self::bare(dialect, rest));
        }

        let mut config = Self::bare(dialect, "");
        for pair in rest.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                PolySqlError::InvalidConfiguration(format!(
                    "Malformed DSN '{dsn}': expected key=value, got '{pair}'"
                ))
            })?;
            match key.trim().to_ascii_lowercase().as_str() {
                "host" => config.host = Some(value.to_string()),
                "server" => match value.split_once(',') {
                    Some((host, port)) => {
                        config.host = Some(host.to_string());
                        config.port = Some(parse_port(dsn, port)?);
                    }
                    None => config.host = Some(value.to_string()),
                },
                "port" => config.port = Some(parse_port(dsn, value)?),
                "dbname" | "database" => config.name = value.to_string(),
                other => {
                    config.options.insert(other.to_string(), value.to_string());
                }
            }
        }
        Ok(config)
    }

    /// The canonical driver name of the dialect (`pgsql`, `sqlsrv`, ...).
    pub const fn driver_name(&self) -> &'static str {
        self.dialect.driver_name()
    }
}

fn parse_port(dsn: &str, raw: &str) -> PolySqlResult<u16> {
    raw.trim().parse().map_err(|_| {
        PolySqlError::InvalidConfiguration(format!("Malformed DSN '{dsn}': invalid port '{raw}'"))
    })
}

impl TryFrom<&DatabaseSettings> for DatabaseConfig {
    type Error = PolySqlError;

    /// Resolves settings into a config. A DSN, when present, decides the
    /// dialect and fills host, port and name; explicit non-empty settings
    /// fields win over DSN values.
    fn try_from(settings: &DatabaseSettings) -> PolySqlResult<Self> {
        let mut config = match settings.dsn.as_deref().filter(|d| !d.is_empty()) {
            Some(dsn) => Self::from_dsn(dsn)?,
            None => Self::bare(Dialect::from_driver_name(&settings.driver)?, ""),
        };

        if !settings.name.is_empty() {
            config.name.clone_from(&settings.name);
        }
        if !settings.host.is_empty() {
            config.host = Some(settings.host.clone());
        }
        if settings.port != 0 {
            config.port = Some(settings.port);
        }
        if !settings.user.is_empty() {
            config.user = Some(settings.user.clone());
        }
        if !settings.password.is_empty() {
            config.password = Some(settings.password.clone());
        }
        config.table_prefix.clone_from(&settings.table_prefix);
        config
            .options
            .extend(settings.options.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(config)
    }
}
