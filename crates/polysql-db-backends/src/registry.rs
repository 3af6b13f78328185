//! Named connections resolved from settings.

use std::collections::HashMap;

use polysql_core::{PolySqlError, PolySqlResult, Settings};
use tracing::info;

use crate::base::DatabaseConfig;
use crate::connection::Connection;

/// The alias used when none is given.
pub const DEFAULT_ALIAS: &str = "default";

/// Maps connection aliases to [`Connection`] handles.
///
/// # Examples
///
/// ```
/// use polysql_core::Settings;
/// use polysql_db::Dialect;
/// use polysql_db_backends::ConnectionRegistry;
///
/// let registry = ConnectionRegistry::from_settings(&Settings::default()).unwrap();
/// assert_eq!(registry.default_connection().unwrap().dialect(), Dialect::Sqlite);
/// assert!(registry.get("reporting").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, Connection>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every entry of `settings.databases`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any entry names an unknown driver or
    /// carries a malformed DSN.
    pub fn from_settings(settings: &Settings) -> PolySqlResult<Self> {
        let mut registry = Self::new();
        for (alias, db) in &settings.databases {
            let config = DatabaseConfig::try_from(db).map_err(|e| match e {
                PolySqlError::InvalidConfiguration(msg) => PolySqlError::InvalidConfiguration(
                    format!("Connection '{alias}': {msg}"),
                ),
                other => other,
            })?;
            registry.register(
                alias.clone(),
                Connection::with_settings(config, settings.builder.clone()),
            );
        }
        Ok(registry)
    }

    /// Registers or replaces a connection.
    pub fn register(&mut self, alias: impl Into<String>, connection: Connection) {
        let alias = alias.into();
        info!(
            alias = alias.as_str(),
            driver = connection.driver_name(),
            "Registered database connection"
        );
        self.connections.insert(alias, connection);
    }

    /// Returns the connection registered under `alias`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an unknown alias.
    pub fn get(&self, alias: &str) -> PolySqlResult<&Connection> {
        self.connections.get(alias).ok_or_else(|| {
            PolySqlError::InvalidConfiguration(format!("Unknown connection alias '{alias}'"))
        })
    }

    /// Returns the `default` connection.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when no default is registered.
    pub fn default_connection(&self) -> PolySqlResult<&Connection> {
        self.get(DEFAULT_ALIAS)
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.connections.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
