//! Settings for polysql.
//!
//! This module provides the [`Settings`] struct, which holds builder options,
//! logging options, and database connection descriptors keyed by alias.
//! Settings are plain values: load them once and pass them to the code that
//! needs them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Database connection configuration.
///
/// Either `driver` or a PDO-style `dsn` (`mysql:host=localhost;dbname=app`)
/// identifies the dialect. When both are set the DSN prefix wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The driver name (e.g. `mysql`, `pgsql`, `sqlite`, `sqlsrv`).
    pub driver: String,
    /// Optional PDO-style data source name.
    pub dsn: Option<String>,
    /// The database name (or file path for `SQLite`).
    pub name: String,
    /// The database user.
    pub user: String,
    /// The database password.
    pub password: String,
    /// The database host.
    pub host: String,
    /// The database port.
    pub port: u16,
    /// Prefix substituted for `%` in `{{%table}}` placeholders.
    pub table_prefix: String,
    /// Additional driver-specific options.
    pub options: HashMap<String, String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            dsn: None,
            name: ":memory:".to_string(),
            user: String::new(),
            password: String::new(),
            host: String::new(),
            port: 0,
            table_prefix: String::new(),
            options: HashMap::new(),
        }
    }
}

/// Options that shape generated SQL independent of the dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderSettings {
    /// String placed between clauses (a single space by default).
    pub separator: String,
    /// Prefix of generated placeholder names.
    pub param_prefix: String,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            param_prefix: ":qp".to_string(),
        }
    }
}

/// The complete set of polysql settings.
///
/// # Examples
///
/// ```
/// use polysql_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.builder.param_prefix, ":qp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "polysql_db=debug").
    pub log_level: String,
    /// Builder options.
    pub builder: BuilderSettings,
    /// Database configurations, keyed by alias (e.g. "default").
    pub databases: HashMap<String, DatabaseSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut databases = HashMap::new();
        databases.insert("default".to_string(), DatabaseSettings::default());

        Self {
            debug: false,
            log_level: "info".to_string(),
            builder: BuilderSettings::default(),
            databases,
        }
    }
}

impl Settings {
    /// Returns the settings of the database registered under `alias`.
    pub fn database(&self, alias: &str) -> Option<&DatabaseSettings> {
        self.databases.get(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(!s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.builder.separator, " ");
        assert_eq!(s.builder.param_prefix, ":qp");
    }

    #[test]
    fn test_default_database() {
        let s = Settings::default();
        let db = s.database("default").expect("default db should exist");
        assert_eq!(db.driver, "sqlite");
        assert_eq!(db.name, ":memory:");
        assert!(db.dsn.is_none());
        assert!(db.table_prefix.is_empty());
    }

    #[test]
    fn test_missing_database() {
        assert!(Settings::default().database("replica").is_none());
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let mut s = Settings::default();
        s.builder.separator = "\n".to_string();
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
