//! Rendering of queries and conditions into dialect-specific SQL.
//!
//! A [`QueryBuilder`] holds the [`DialectRules`] of one engine plus the
//! table prefix, clause separator, and placeholder prefix. It is an
//! immutable value: every build call owns its own [`ParameterMap`], so one
//! builder can serve any number of threads.
//!
//! The builder is split by statement family:
//!
//! - this module: `SELECT` and its clauses
//! - [`conditions`]: `WHERE` / `HAVING` / `ON` predicates
//! - [`dml`]: `INSERT`, `REPLACE`, `UPDATE`, `DELETE`
//! - [`ddl`]: `CREATE TABLE` and friends
//!
//! # Examples
//!
//! ```
//! use polysql_db::builder::QueryBuilder;
//! use polysql_db::dialect::Dialect;
//! use polysql_db::query::{Condition, OrderBy, Query};
//!
//! let builder = QueryBuilder::new(Dialect::PostgreSql);
//! let query = Query::table("users")
//!     .select(["id"])
//!     .filter(Condition::eq("status", 1))
//!     .order_by(OrderBy::asc("id"))
//!     .limit(10);
//! let (sql, params) = builder.build(&query).unwrap();
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id" FROM "users" WHERE "status"=:qp0 ORDER BY "id" LIMIT 10"#
//! );
//! assert_eq!(params.len(), 1);
//! ```

pub mod conditions;
pub mod ddl;
pub mod dml;

use once_cell::sync::Lazy;
use polysql_core::logging::build_span;
use polysql_core::{BuilderSettings, PolySqlResult};
use regex::Regex;
use tracing::debug;

use crate::dialect::{Dialect, DialectRules, Feature, LimitStyle, UnionStyle};
use crate::params::{ParameterMap, DEFAULT_PARAM_PREFIX};
use crate::query::condition::Condition;
use crate::query::select::{
    ColumnRef, Join, MatchExpr, OptionValue, OrderBy, Query, SelectColumn, SortDirection,
    TableRef,
};

/// Splits `"expr AS alias"` and `"expr alias"` select entries.
static COLUMN_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.*?)(?:\s+as\s+|\s+)([\w\-\.]+)$").expect("valid regex"));

/// Largest row count MySQL accepts in `LIMIT offset, count`.
const MYSQL_MAX_LIMIT: &str = "18446744073709551615";

/// Largest row count SQLite accepts in `LIMIT`.
const SQLITE_MAX_LIMIT: &str = "9223372036854775807";

/// Page size Sphinx applies when only an offset is given.
const SPHINX_DEFAULT_LIMIT: u64 = 1000;

/// Characters with a meaning in Sphinx full-text syntax.
const SPHINX_MATCH_SPECIALS: &[char] = &[
    '\\', '/', '"', '(', ')', '|', '-', '!', '@', '~', '&', '^', '$', '=', '>', '<',
];

/// Renders [`Query`] and [`Condition`] values for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    rules: DialectRules,
    table_prefix: String,
    separator: String,
    param_prefix: String,
}

impl QueryBuilder {
    /// Creates a builder with default settings.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            rules: dialect.rules(),
            table_prefix: String::new(),
            separator: " ".to_string(),
            param_prefix: DEFAULT_PARAM_PREFIX.to_string(),
        }
    }

    /// Creates a builder from a driver name (`pgsql`, `sqlsrv`, ...).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for unknown drivers.
    pub fn for_driver(driver: &str) -> PolySqlResult<Self> {
        Ok(Self::new(Dialect::from_driver_name(driver)?))
    }

    /// Creates a builder using the separator and prefix from settings.
    pub fn from_settings(dialect: Dialect, settings: &BuilderSettings) -> Self {
        Self::new(dialect)
            .with_separator(settings.separator.clone())
            .with_param_prefix(settings.param_prefix.clone())
    }

    /// Sets the prefix substituted for `%` in `{{%table}}` placeholders.
    #[must_use]
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Sets the string placed between clauses.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the prefix of generated placeholder names.
    #[must_use]
    pub fn with_param_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.param_prefix = prefix.into();
        self
    }

    /// The dialect rules in use.
    pub const fn rules(&self) -> &DialectRules {
        &self.rules
    }

    /// The dialect in use.
    pub const fn dialect(&self) -> Dialect {
        self.rules.dialect
    }

    /// The table prefix.
    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    /// The clause separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The placeholder prefix.
    pub fn param_prefix(&self) -> &str {
        &self.param_prefix
    }

    /// Rewrites `{{table}}` and `[[column]]` placeholders using this
    /// builder's table prefix.
    pub fn quote_sql(&self, sql: &str) -> String {
        self.rules.quote_sql(sql, &self.table_prefix)
    }

    // ── Entry points ─────────────────────────────────────────────────

    /// Builds a `SELECT` statement.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` if the query uses a construct the
    /// dialect cannot express, or `InvalidArgument` for inconsistent input.
    pub fn build(&self, query: &Query) -> PolySqlResult<(String, ParameterMap)> {
        self.build_with_params(query, ParameterMap::new())
    }

    /// Builds a `SELECT` statement on top of caller-supplied parameters.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::build`].
    pub fn build_with_params(
        &self,
        query: &Query,
        mut params: ParameterMap,
    ) -> PolySqlResult<(String, ParameterMap)> {
        let span = build_span(self.rules.dialect.name());
        let _enter = span.enter();

        let sql = self.build_query(query, &mut params)?;
        debug!(
            dialect = self.rules.dialect.name(),
            params = params.len(),
            "Built SELECT statement"
        );
        Ok((sql, params))
    }

    /// Builds a standalone condition into `params`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::build`].
    pub fn build_condition(
        &self,
        condition: &Condition,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        self.condition_sql(condition, params)
    }

    /// Builds a query into a shared accumulator. Used for subqueries.
    pub(crate) fn build_query(
        &self,
        query: &Query,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        params.merge(&query.params)?;

        if query.uses_sphinx_extensions() {
            self.rules.require(Feature::FullText, "MATCH, WITHIN GROUP ORDER BY and OPTION")?;
        }

        let clauses = [
            self.build_select(query, params)?,
            self.build_from(&query.from, params)?,
            self.build_joins(&query.joins, params)?,
            self.build_where(query.where_clause.as_ref(), query.match_text.as_ref(), params)?,
            self.build_group_by(&query.group_by, params)?,
            self.build_within(&query.within, params)?,
            self.build_having(query.having.as_ref(), params)?,
            self.build_order_by_and_limit(&query.order_by, query.limit, query.offset, params)?,
            self.build_options(&query.options, params)?,
        ];
        let sql = self.join_clauses(clauses);

        if query.unions.is_empty() {
            return Ok(sql);
        }
        self.build_unions(sql, query, params)
    }

    fn join_clauses<I: IntoIterator<Item = String>>(&self, clauses: I) -> String {
        clauses
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    /// Binds `value` under the next generated placeholder name.
    pub(crate) fn bind(&self, value: crate::value::Value, params: &mut ParameterMap) -> String {
        params.bind(value, &self.param_prefix)
    }

    /// Builds a subquery into the shared accumulator, wrapped in parentheses.
    pub(crate) fn subquery_sql(
        &self,
        query: &Query,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::Subquery, "Subqueries")?;
        Ok(format!("({})", self.build_query(query, params)?))
    }

    // ── SELECT ───────────────────────────────────────────────────────

    /// Builds the `SELECT` clause.
    ///
    /// # Errors
    ///
    /// Fails if a selected subquery cannot be built.
    pub fn build_select(&self, query: &Query, params: &mut ParameterMap) -> PolySqlResult<String> {
        let mut sql = String::from(if query.distinct {
            "SELECT DISTINCT"
        } else {
            "SELECT"
        });
        if let Some(option) = &query.select_option {
            sql.push(' ');
            sql.push_str(option);
        }

        if query.select.is_empty() {
            sql.push_str(" *");
            return Ok(sql);
        }

        let mut columns = Vec::with_capacity(query.select.len());
        for column in &query.select {
            columns.push(match column {
                SelectColumn::Star => "*".to_string(),
                SelectColumn::Column(name) => self.select_column_sql(name),
                SelectColumn::Expression { expr, alias } => {
                    params.merge(expr.params())?;
                    match alias {
                        Some(alias) => format!(
                            "{} AS {}",
                            expr.sql(),
                            self.rules.quote_column_name(alias)
                        ),
                        None => expr.sql().to_string(),
                    }
                }
                SelectColumn::Subquery { query, alias } => format!(
                    "{} AS {}",
                    self.subquery_sql(query, params)?,
                    self.rules.quote_column_name(alias)
                ),
            });
        }
        sql.push(' ');
        sql.push_str(&columns.join(", "));
        Ok(sql)
    }

    fn select_column_sql(&self, name: &str) -> String {
        if name.contains('(') {
            return name.to_string();
        }
        match COLUMN_ALIAS.captures(name) {
            Some(caps) => {
                let column = caps.get(1).map_or(name, |m| m.as_str());
                let alias = caps.get(2).map_or("", |m| m.as_str());
                format!(
                    "{} AS {}",
                    self.rules.quote_column_name(column),
                    self.rules.quote_column_name(alias)
                )
            }
            None => self.rules.quote_column_name(name),
        }
    }

    // ── FROM / JOIN ──────────────────────────────────────────────────

    /// Builds the `FROM` clause. Empty when there are no sources.
    ///
    /// # Errors
    ///
    /// Fails if a derived table cannot be built.
    pub fn build_from(
        &self,
        from: &[TableRef],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        if from.is_empty() {
            return Ok(String::new());
        }
        let tables = from
            .iter()
            .map(|table| self.table_sql(table, params))
            .collect::<PolySqlResult<Vec<_>>>()?;
        Ok(format!("FROM {}", tables.join(", ")))
    }

    fn table_sql(&self, table: &TableRef, params: &mut ParameterMap) -> PolySqlResult<String> {
        Ok(match table {
            TableRef::Table { name, alias } => {
                let name = self.rules.quote_table_name(name);
                match alias {
                    Some(alias) => format!("{name} {}", self.rules.quote_table_name(alias)),
                    None => name,
                }
            }
            TableRef::Subquery { query, alias } => format!(
                "{} {}",
                self.subquery_sql(query, params)?,
                self.rules.quote_table_name(alias)
            ),
            TableRef::Expression(expr) => {
                params.merge(expr.params())?;
                expr.sql().to_string()
            }
        })
    }

    /// Builds the JOIN clauses.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without joins.
    pub fn build_joins(&self, joins: &[Join], params: &mut ParameterMap) -> PolySqlResult<String> {
        if joins.is_empty() {
            return Ok(String::new());
        }
        self.rules.require(Feature::Join, "JOIN")?;

        let mut parts = Vec::with_capacity(joins.len());
        for join in joins {
            let mut sql = format!(
                "{} {}",
                join.join_type.sql_keyword(),
                self.table_sql(&join.table, params)?
            );
            if let Some(on) = &join.on {
                let on_sql = self.condition_sql(on, params)?;
                if !on_sql.is_empty() {
                    sql.push_str(" ON ");
                    sql.push_str(&on_sql);
                }
            }
            parts.push(sql);
        }
        Ok(parts.join(&self.separator))
    }

    // ── WHERE / GROUP BY / HAVING ────────────────────────────────────

    /// Builds the `WHERE` clause, with a Sphinx `MATCH` in front when set.
    ///
    /// # Errors
    ///
    /// Fails if the condition cannot be built.
    pub fn build_where(
        &self,
        condition: Option<&Condition>,
        match_text: Option<&MatchExpr>,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        let mut parts = Vec::new();
        if let Some(m) = match_text {
            parts.push(self.match_sql(m, params)?);
        }
        if let Some(condition) = condition {
            let sql = self.condition_sql(condition, params)?;
            if !sql.is_empty() {
                parts.push(sql);
            }
        }
        Ok(match parts.len() {
            0 => String::new(),
            1 => format!("WHERE {}", parts[0]),
            _ => format!("WHERE ({})", parts.join(") AND (")),
        })
    }

    fn match_sql(&self, m: &MatchExpr, params: &mut ParameterMap) -> PolySqlResult<String> {
        Ok(match m {
            MatchExpr::Text(text) => {
                let placeholder = self.bind(escape_match(text).into(), params);
                format!("MATCH({placeholder})")
            }
            MatchExpr::Expression(expr) => {
                params.merge(expr.params())?;
                format!("MATCH({})", expr.sql())
            }
        })
    }

    /// Builds the `GROUP BY` clause.
    ///
    /// # Errors
    ///
    /// Fails if an expression's parameters clash with ones already bound.
    pub fn build_group_by(
        &self,
        columns: &[ColumnRef],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        if columns.is_empty() {
            return Ok(String::new());
        }
        let parts = columns
            .iter()
            .map(|c| self.column_ref_sql(c, params))
            .collect::<PolySqlResult<Vec<_>>>()?;
        Ok(format!("GROUP BY {}", parts.join(", ")))
    }

    /// Builds the `HAVING` clause.
    ///
    /// # Errors
    ///
    /// Fails if the condition cannot be built.
    pub fn build_having(
        &self,
        condition: Option<&Condition>,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        let Some(condition) = condition else {
            return Ok(String::new());
        };
        let sql = self.condition_sql(condition, params)?;
        Ok(if sql.is_empty() {
            sql
        } else {
            format!("HAVING {sql}")
        })
    }

    fn column_ref_sql(
        &self,
        column: &ColumnRef,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        Ok(match column {
            ColumnRef::Name(name) => self.rules.quote_column_name(name),
            ColumnRef::Expression(expr) => {
                params.merge(expr.params())?;
                expr.sql().to_string()
            }
        })
    }

    // ── ORDER BY / LIMIT ─────────────────────────────────────────────

    fn order_list_sql(
        &self,
        orders: &[OrderBy],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        let mut parts = Vec::with_capacity(orders.len());
        for order in orders {
            let column = self.column_ref_sql(&order.target, params)?;
            parts.push(match (&order.target, order.direction) {
                (ColumnRef::Name(_), SortDirection::Desc) => format!("{column} DESC"),
                _ => column,
            });
        }
        Ok(parts.join(", "))
    }

    /// Builds the `ORDER BY` clause.
    ///
    /// # Errors
    ///
    /// Fails if an expression's parameters clash with ones already bound.
    pub fn build_order_by(
        &self,
        orders: &[OrderBy],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        if orders.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("ORDER BY {}", self.order_list_sql(orders, params)?))
    }

    /// Builds the Sphinx `WITHIN GROUP ORDER BY` clause.
    ///
    /// # Errors
    ///
    /// Fails if an expression's parameters clash with ones already bound.
    pub fn build_within(
        &self,
        orders: &[OrderBy],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        if orders.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "WITHIN GROUP ORDER BY {}",
            self.order_list_sql(orders, params)?
        ))
    }

    /// Builds `ORDER BY` and the paging clause together, since
    /// `OFFSET ... FETCH` needs an `ORDER BY` to attach to.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::build_order_by`].
    pub fn build_order_by_and_limit(
        &self,
        orders: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        let mut order_by = self.build_order_by(orders, params)?;
        let paged = limit.is_some() || offset.is_some();
        if paged
            && order_by.is_empty()
            && self.rules.limit_style == LimitStyle::OffsetFetch
        {
            order_by = "ORDER BY (SELECT NULL)".to_string();
        }
        Ok(self.join_clauses([order_by, self.build_limit(limit, offset)]))
    }

    /// Builds the paging clause alone.
    pub fn build_limit(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (self.rules.limit_style, limit, offset) {
            (_, None, None) => String::new(),
            (LimitStyle::OffsetFetch, limit, offset) => {
                let mut sql = format!("OFFSET {} ROWS", offset.unwrap_or(0));
                if let Some(n) = limit {
                    sql.push_str(&format!(" FETCH NEXT {n} ROWS ONLY"));
                }
                sql
            }
            (LimitStyle::Sphinx, limit, offset) => format!(
                "LIMIT {},{}",
                offset.unwrap_or(0),
                limit.unwrap_or(SPHINX_DEFAULT_LIMIT)
            ),
            (LimitStyle::MySql, None, Some(m)) => format!("LIMIT {m}, {MYSQL_MAX_LIMIT}"),
            (LimitStyle::Sqlite, None, Some(m)) => format!("LIMIT {SQLITE_MAX_LIMIT} OFFSET {m}"),
            (LimitStyle::LimitOffset, None, Some(m)) => format!("OFFSET {m}"),
            (_, Some(n), None) => format!("LIMIT {n}"),
            (_, Some(n), Some(m)) => format!("LIMIT {n} OFFSET {m}"),
        }
    }

    // ── OPTION ───────────────────────────────────────────────────────

    /// Builds the Sphinx `OPTION` clause.
    ///
    /// # Errors
    ///
    /// Fails if an expression's parameters clash with ones already bound.
    pub fn build_options(
        &self,
        options: &[(String, OptionValue)],
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        if options.is_empty() {
            return Ok(String::new());
        }
        let mut parts = Vec::with_capacity(options.len());
        for (name, value) in options {
            parts.push(match value {
                OptionValue::Scalar(v) => format!("{name}={v}"),
                OptionValue::Map(entries) => {
                    let inner: Vec<String> =
                        entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    format!("{name}=({})", inner.join(", "))
                }
                OptionValue::Expression(expr) => {
                    params.merge(expr.params())?;
                    format!("{name}={}", expr.sql())
                }
            });
        }
        Ok(format!("OPTION {}", parts.join(", ")))
    }

    // ── UNION ────────────────────────────────────────────────────────

    fn build_unions(
        &self,
        main: String,
        query: &Query,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::Union, "UNION")?;

        let wrap = |sql: String| match self.rules.union_style {
            UnionStyle::Parenthesized => format!("({sql})"),
            UnionStyle::Bare => sql,
        };

        let mut parts = vec![wrap(main)];
        for union in &query.unions {
            let keyword = if union.all { "UNION ALL" } else { "UNION" };
            let sql = self.build_query(&union.query, params)?;
            parts.push(format!("{keyword} {}", wrap(sql)));
        }
        Ok(parts.join(&self.separator))
    }
}

/// Escapes Sphinx full-text operators so the text matches literally.
///
/// Control characters are spelled out as `\x00`, `\n`, `\r` and `\x1a`.
fn escape_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\0' => out.push_str("\\x00"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\x1a"),
            _ => {
                if SPHINX_MATCH_SPECIALS.contains(&ch) {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
    }
    out
}
