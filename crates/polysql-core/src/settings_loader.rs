//! Settings loading from configuration files.
//!
//! This module loads [`Settings`] from TOML or JSON and applies environment
//! variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `POLYSQL_DEBUG` | `debug` |
//! | `POLYSQL_LOG_LEVEL` | `log_level` |
//! | `POLYSQL_SEPARATOR` | `builder.separator` |
//! | `POLYSQL_PARAM_PREFIX` | `builder.param_prefix` |
//! | `POLYSQL_DB_DRIVER` | `databases.default.driver` |
//! | `POLYSQL_DB_DSN` | `databases.default.dsn` |
//! | `POLYSQL_TABLE_PREFIX` | `databases.default.table_prefix` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use polysql_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/polysql.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/polysql.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::PolySqlError;
use crate::settings::{DatabaseSettings, Settings};

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values, including
/// fields of nested tables such as `[databases.default]`.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, PolySqlError> {
    // Go through serde_json so the document can be deep-merged over the
    // serialized defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| PolySqlError::InvalidConfiguration(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, PolySqlError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, PolySqlError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, PolySqlError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| PolySqlError::InvalidConfiguration(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, PolySqlError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `POLYSQL_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides read through `lookup` instead of the process environment.
///
/// `POLYSQL_DEBUG` accepts "true"/"1"/"yes"; anything else means `false`.
/// The `POLYSQL_DB_*` and `POLYSQL_TABLE_PREFIX` variables target the
/// `default` database, which is created if missing.
pub fn apply_overrides_from<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("POLYSQL_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("POLYSQL_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("POLYSQL_SEPARATOR") {
        settings.builder.separator = val;
    }

    if let Some(val) = lookup("POLYSQL_PARAM_PREFIX") {
        settings.builder.param_prefix = val;
    }

    let driver = lookup("POLYSQL_DB_DRIVER");
    let dsn = lookup("POLYSQL_DB_DSN");
    let prefix = lookup("POLYSQL_TABLE_PREFIX");
    if driver.is_none() && dsn.is_none() && prefix.is_none() {
        return;
    }

    let default_db = settings
        .databases
        .entry("default".to_string())
        .or_insert_with(DatabaseSettings::default);
    if let Some(val) = driver {
        default_db.driver = val;
    }
    if let Some(val) = dsn {
        default_db.dsn = Some(val);
    }
    if let Some(val) = prefix {
        default_db.table_prefix = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, PolySqlError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        PolySqlError::Serialization(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, fill_database_defaults(value)?);
    serde_json::from_value(merged).map_err(|e| {
        PolySqlError::InvalidConfiguration(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Merges every database entry over `DatabaseSettings::default()` so that
/// aliases other than `default` can omit fields too.
fn fill_database_defaults(mut value: serde_json::Value) -> Result<serde_json::Value, PolySqlError> {
    let Some(databases) = value
        .get_mut("databases")
        .and_then(serde_json::Value::as_object_mut)
    else {
        return Ok(value);
    };

    let db_default = serde_json::to_value(DatabaseSettings::default()).map_err(|e| {
        PolySqlError::Serialization(format!("Failed to serialize default database: {e}"))
    })?;
    for entry in databases.values_mut() {
        let taken = std::mem::take(entry);
        *entry = merge_json(db_default.clone(), taken);
    }
    Ok(value)
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = true
            log_level = "polysql_db=debug"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "polysql_db=debug");
        // Defaults preserved
        assert_eq!(settings.builder.param_prefix, ":qp");
    }

    #[test]
    fn test_from_toml_str_builder_table() {
        let toml = r#"
            [builder]
            separator = "\n"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.builder.separator, "\n");
        assert_eq!(settings.builder.param_prefix, ":qp");
    }

    #[test]
    fn test_from_toml_str_databases() {
        let toml = r#"
            [databases.default]
            driver = "pgsql"
            name = "app"
            host = "localhost"
            port = 5432
            table_prefix = "tbl_"

            [databases.search]
            driver = "sphinx"
        "#;

        let settings = from_toml_str(toml).unwrap();
        let db = settings.database("default").unwrap();
        assert_eq!(db.driver, "pgsql");
        assert_eq!(db.name, "app");
        assert_eq!(db.port, 5432);
        assert_eq!(db.table_prefix, "tbl_");

        let search = settings.database("search").unwrap();
        assert_eq!(search.driver, "sphinx");
        assert_eq!(search.name, ":memory:");
        assert!(search.options.is_empty());
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(PolySqlError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"maybe\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "log_level": "warn",
            "databases": {
                "default": { "dsn": "mysql:host=localhost;dbname=test" }
            }
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.log_level, "warn");
        let db = settings.database("default").unwrap();
        assert_eq!(db.dsn.as_deref(), Some("mysql:host=localhost;dbname=test"));
        assert_eq!(db.driver, "sqlite");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/polysql.toml");
        let err = result.unwrap_err();
        assert!(matches!(err, PolySqlError::Io(_)));
        assert_eq!(err.category(), "io");

        let result = from_json_file("/nonexistent/polysql.json");
        assert!(matches!(result, Err(PolySqlError::Io(_))));
    }

    // ── Env overrides ───────────────────────────────────────────────

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_builder_and_logging() {
        let mut settings = Settings::default();
        apply_overrides_from(
            &mut settings,
            lookup_from(&[
                ("POLYSQL_DEBUG", "yes"),
                ("POLYSQL_LOG_LEVEL", "trace"),
                ("POLYSQL_SEPARATOR", "\n"),
                ("POLYSQL_PARAM_PREFIX", ":p"),
            ]),
        );
        assert!(settings.debug);
        assert_eq!(settings.log_level, "trace");
        assert_eq!(settings.builder.separator, "\n");
        assert_eq!(settings.builder.param_prefix, ":p");
    }

    #[test]
    fn test_overrides_default_database() {
        let mut settings = Settings::default();
        settings.databases.clear();
        apply_overrides_from(
            &mut settings,
            lookup_from(&[
                ("POLYSQL_DB_DRIVER", "sqlsrv"),
                ("POLYSQL_TABLE_PREFIX", "app_"),
            ]),
        );
        let db = settings.database("default").unwrap();
        assert_eq!(db.driver, "sqlsrv");
        assert_eq!(db.table_prefix, "app_");
    }

    #[test]
    fn test_overrides_debug_false_values() {
        let mut settings = Settings::default();
        settings.debug = true;
        apply_overrides_from(&mut settings, lookup_from(&[("POLYSQL_DEBUG", "off")]));
        assert!(!settings.debug);
    }

    #[test]
    fn test_no_overrides_leaves_databases_alone() {
        let mut settings = Settings::default();
        settings.databases.clear();
        apply_overrides_from(&mut settings, lookup_from(&[]));
        assert!(settings.databases.is_empty());
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}});
        let over = serde_json::json!({"a": {"c": 3}});
        assert_eq!(merge_json(base, over), serde_json::json!({"a": {"b": 1, "c": 3}}));
    }
}
