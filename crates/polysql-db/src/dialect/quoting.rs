//! Identifier and literal quoting.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Dialect, DialectRules};
use crate::query::condition::LikeEscape;
use crate::value::Value;

/// Matches `{{table}}` / `{{%table}}` and `[[column]]` placeholders.
static SQL_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(%?[\w\-\. ]+%?)\}\}|\[\[([\w\-\. ]+)\]\]").expect("valid regex")
});

impl DialectRules {
    fn is_quoted(&self, name: &str) -> bool {
        self.identifier_quotes
            .map_or(true, |(open, _)| name.contains(open))
    }

    fn wrap(&self, name: &str) -> String {
        match self.identifier_quotes {
            Some((open, close)) => format!("{open}{name}{close}"),
            None => name.to_string(),
        }
    }

    /// Quotes a single table name part. Already-quoted names are returned as-is.
    pub fn quote_simple_table_name(&self, name: &str) -> String {
        if self.is_quoted(name) {
            name.to_string()
        } else {
            self.wrap(name)
        }
    }

    /// Quotes a single column name part. `*` and already-quoted names are
    /// returned as-is.
    pub fn quote_simple_column_name(&self, name: &str) -> String {
        if name == "*" || self.is_quoted(name) {
            name.to_string()
        } else {
            self.wrap(name)
        }
    }

    /// Quotes a possibly schema-qualified table name.
    ///
    /// Names containing `(` or `{{` are treated as expressions and left alone.
    pub fn quote_table_name(&self, name: &str) -> String {
        if name.contains('(') || name.contains("{{") {
            return name.to_string();
        }
        name.split('.')
            .map(|part| self.quote_simple_table_name(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a possibly table-qualified column name.
    ///
    /// Names containing `(`, `[[` or `{{` are treated as expressions and left
    /// alone.
    pub fn quote_column_name(&self, name: &str) -> String {
        if name.contains('(') || name.contains("[[") || name.contains("{{") {
            return name.to_string();
        }
        match name.rsplit_once('.') {
            Some((prefix, column)) => format!(
                "{}.{}",
                self.quote_table_name(prefix),
                self.quote_simple_column_name(column)
            ),
            None => self.quote_simple_column_name(name),
        }
    }

    /// Rewrites `{{table}}` and `[[column]]` placeholders into quoted names.
    ///
    /// A `%` inside a table placeholder is replaced with `table_prefix`.
    pub fn quote_sql(&self, sql: &str, table_prefix: &str) -> String {
        SQL_PLACEHOLDER
            .replace_all(sql, |caps: &Captures<'_>| {
                if let Some(column) = caps.get(2) {
                    return self.quote_column_name(column.as_str());
                }
                let table = caps.get(1).map_or("", |m| m.as_str());
                self.quote_table_name(&table.replace('%', table_prefix))
            })
            .into_owned()
    }

    /// Quotes a string literal, doubling single quotes.
    pub fn quote_string(&self, s: &str) -> String {
        let mut escaped = s.replace('\'', "''");
        if self.backslash_in_strings {
            escaped = escaped.replace('\\', "\\\\");
        }
        format!("'{escaped}'")
    }

    /// Renders a value as an inline SQL literal.
    ///
    /// Temporal values become typed `DATE` / `TIMESTAMP` / `TIME` literals
    /// where the engine parses them, and plain strings elsewhere.
    pub fn quote_value(&self, value: &Value) -> String {
        let typed = matches!(
            self.dialect,
            Dialect::MySql | Dialect::PostgreSql | Dialect::Cubrid | Dialect::Oracle
        );
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => self.quote_string(s),
            Value::Bytes(_) => match self.dialect {
                Dialect::PostgreSql => format!("'\\x{value}'"),
                Dialect::MsSql => format!("0x{value}"),
                _ => format!("X'{value}'"),
            },
            Value::Date(_) if typed => format!("DATE '{value}'"),
            Value::DateTime(_) if typed => format!("TIMESTAMP '{value}'"),
            // Oracle has no TIME type.
            Value::Time(_) if typed && self.dialect != Dialect::Oracle => {
                format!("TIME '{value}'")
            }
            Value::Uuid(_) if self.dialect == Dialect::PostgreSql => format!("'{value}'::uuid"),
            Value::Date(_) | Value::DateTime(_) | Value::Time(_) | Value::Uuid(_) => {
                format!("'{value}'")
            }
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| self.quote_value(v)).collect();
                format!("({})", parts.join(", "))
            }
        }
    }

    /// Escapes a `LIKE` literal with the given escape mode.
    pub fn escape_like(&self, pattern: &str, escape: &LikeEscape) -> String {
        match escape {
            LikeEscape::Disabled => pattern.to_string(),
            LikeEscape::Dialect => replace_chars(pattern, self.like_escapes.iter().copied()),
            LikeEscape::Custom(table) => replace_chars(
                pattern,
                table.iter().map(|(c, replacement)| (*c, replacement.as_str())),
            ),
        }
    }
}

/// Replaces characters in one pass so replacements are never re-escaped.
fn replace_chars<'a, I>(input: &str, table: I) -> String
where
    I: Iterator<Item = (char, &'a str)> + Clone,
{
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match table.clone().find(|(c, _)| *c == ch) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}
