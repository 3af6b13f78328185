//! The `SELECT` query AST.
//!
//! A [`Query`] is a plain value assembled through chainable methods. It holds
//! no connection and no dialect; the
//! [`QueryBuilder`](crate::builder::QueryBuilder) renders it for one dialect
//! and the same query can be rendered for several.

use crate::expression::Expression;
use crate::params::ParameterMap;
use crate::query::condition::Condition;
use crate::value::Value;

/// A sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending (rendered without a keyword).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A column name or a raw expression used in `GROUP BY` and `ORDER BY`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    /// A column, quoted on output.
    Name(String),
    /// An expression embedded verbatim.
    Expression(Expression),
}

impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl From<Expression> for ColumnRef {
    fn from(e: Expression) -> Self {
        Self::Expression(e)
    }
}

/// One `ORDER BY` (or Sphinx `WITHIN GROUP ORDER BY`) entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// The column or expression to order by.
    pub target: ColumnRef,
    /// The direction. Ignored for expressions.
    pub direction: SortDirection,
}

impl OrderBy {
    /// Creates an ascending order.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            target: ColumnRef::Name(column.into()),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending order.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            target: ColumnRef::Name(column.into()),
            direction: SortDirection::Desc,
        }
    }

    /// Orders by a raw expression.
    pub fn expression(expr: Expression) -> Self {
        Self {
            target: ColumnRef::Expression(expr),
            direction: SortDirection::Asc,
        }
    }
}

/// A column to select in a query.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// A column name; `"col AS alias"` and `"col alias"` are split.
    Column(String),
    /// An expression with an optional alias.
    Expression {
        /// The expression.
        expr: Expression,
        /// The alias, quoted on output.
        alias: Option<String>,
    },
    /// A subquery with an alias.
    Subquery {
        /// The subquery.
        query: Box<Query>,
        /// The alias, quoted on output.
        alias: String,
    },
    /// All columns (`*`).
    Star,
}

impl From<&str> for SelectColumn {
    fn from(s: &str) -> Self {
        if s == "*" {
            Self::Star
        } else {
            Self::Column(s.to_string())
        }
    }
}

impl From<String> for SelectColumn {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<Expression> for SelectColumn {
    fn from(expr: Expression) -> Self {
        Self::Expression { expr, alias: None }
    }
}

/// A `FROM` or `JOIN` source.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A table with an optional alias.
    Table {
        /// The table name, possibly schema-qualified.
        name: String,
        /// The alias.
        alias: Option<String>,
    },
    /// A derived table.
    Subquery {
        /// The subquery.
        query: Box<Query>,
        /// The alias.
        alias: String,
    },
    /// A raw expression embedded verbatim.
    Expression(Expression),
}

impl TableRef {
    /// Parses `"users"`, `"users u"` or `"users AS u"`.
    ///
    /// Names containing `(` are kept whole since they are expressions.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.contains('(') {
            return Self::Table {
                name: trimmed.to_string(),
                alias: None,
            };
        }
        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        match parts.as_slice() {
            [name, kw, alias] if kw.eq_ignore_ascii_case("as") => Self::Table {
                name: (*name).to_string(),
                alias: Some((*alias).to_string()),
            },
            [name, alias] => Self::Table {
                name: (*name).to_string(),
                alias: Some((*alias).to_string()),
            },
            _ => Self::Table {
                name: trimmed.to_string(),
                alias: None,
            },
        }
    }
}

impl From<&str> for TableRef {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for TableRef {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Expression> for TableRef {
    fn from(e: Expression) -> Self {
        Self::Expression(e)
    }
}

/// The type of a SQL JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// INNER JOIN
    Inner,
    /// LEFT JOIN
    Left,
    /// RIGHT JOIN
    Right,
    /// CROSS JOIN
    Cross,
}

impl JoinType {
    /// The SQL keyword for this join type.
    pub const fn sql_keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// The type of join.
    pub join_type: JoinType,
    /// The joined source.
    pub table: TableRef,
    /// The ON condition.
    pub on: Option<Condition>,
}

/// A query combined with the main one through `UNION`.
#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    /// The other query.
    pub query: Box<Query>,
    /// `UNION ALL` when set.
    pub all: bool,
}

/// The text of a Sphinx `MATCH(...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchExpr {
    /// Plain text; special characters are escaped and the result is bound.
    Text(String),
    /// A raw full-text expression.
    Expression(Expression),
}

impl From<&str> for MatchExpr {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MatchExpr {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Expression> for MatchExpr {
    fn from(e: Expression) -> Self {
        Self::Expression(e)
    }
}

/// The value of a Sphinx `OPTION` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A scalar, emitted verbatim (`ranker=bm25`).
    Scalar(String),
    /// A named map (`field_weights=(title=10, body=3)`).
    Map(Vec<(String, i64)>),
    /// A raw expression.
    Expression(Expression),
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        Self::Scalar(n.to_string())
    }
}

/// A `SELECT` statement.
///
/// # Examples
///
/// ```
/// use polysql_db::query::{Condition, OrderBy, Query};
///
/// let query = Query::table("users")
///     .select(["id", "name"])
///     .filter(Condition::eq("status", 1))
///     .order_by(OrderBy::asc("id"))
///     .limit(10);
/// assert_eq!(query.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Selected columns; empty means `*`.
    pub select: Vec<SelectColumn>,
    /// `SELECT DISTINCT`.
    pub distinct: bool,
    /// Text placed right after `SELECT` (`SQL_CALC_FOUND_ROWS`).
    pub select_option: Option<String>,
    /// `FROM` sources.
    pub from: Vec<TableRef>,
    /// JOIN clauses, in order.
    pub joins: Vec<Join>,
    /// The WHERE condition.
    pub where_clause: Option<Condition>,
    /// `GROUP BY` entries.
    pub group_by: Vec<ColumnRef>,
    /// The HAVING condition.
    pub having: Option<Condition>,
    /// `ORDER BY` entries.
    pub order_by: Vec<OrderBy>,
    /// Row limit.
    pub limit: Option<u64>,
    /// Row offset.
    pub offset: Option<u64>,
    /// Queries combined through UNION.
    pub unions: Vec<Union>,
    /// Caller-supplied parameters, merged before any generated ones.
    pub params: ParameterMap,
    /// Sphinx full-text `MATCH`.
    pub match_text: Option<MatchExpr>,
    /// Sphinx `WITHIN GROUP ORDER BY` entries.
    pub within: Vec<OrderBy>,
    /// Sphinx `OPTION` entries.
    pub options: Vec<(String, OptionValue)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query selecting from one table.
    pub fn table(table: impl Into<TableRef>) -> Self {
        Self::new().from(table)
    }

    // ── SELECT ───────────────────────────────────────────────────────

    /// Replaces the selected columns.
    #[must_use]
    pub fn select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Appends selected columns.
    #[must_use]
    pub fn add_select<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SelectColumn>,
    {
        self.select.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Appends an aliased expression.
    #[must_use]
    pub fn select_as(mut self, expr: Expression, alias: impl Into<String>) -> Self {
        self.select.push(SelectColumn::Expression {
            expr,
            alias: Some(alias.into()),
        });
        self
    }

    /// Appends an aliased subquery.
    #[must_use]
    pub fn select_subquery(mut self, query: Self, alias: impl Into<String>) -> Self {
        self.select.push(SelectColumn::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    /// Adds DISTINCT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the text placed right after `SELECT`.
    #[must_use]
    pub fn select_option(mut self, option: impl Into<String>) -> Self {
        self.select_option = Some(option.into());
        self
    }

    // ── FROM / JOIN ──────────────────────────────────────────────────

    /// Appends a `FROM` source.
    #[must_use]
    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from.push(table.into());
        self
    }

    /// Appends a derived table.
    #[must_use]
    pub fn from_subquery(mut self, query: Self, alias: impl Into<String>) -> Self {
        self.from.push(TableRef::Subquery {
            query: Box::new(query),
            alias: alias.into(),
        });
        self
    }

    fn join(mut self, join_type: JoinType, table: TableRef, on: Option<Condition>) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            on,
        });
        self
    }

    /// Appends an `INNER JOIN`.
    #[must_use]
    pub fn inner_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(JoinType::Inner, table.into(), Some(on))
    }

    /// Appends a `LEFT JOIN`.
    #[must_use]
    pub fn left_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(JoinType::Left, table.into(), Some(on))
    }

    /// Appends a `RIGHT JOIN`.
    #[must_use]
    pub fn right_join(self, table: impl Into<TableRef>, on: Condition) -> Self {
        self.join(JoinType::Right, table.into(), Some(on))
    }

    /// Appends a `CROSS JOIN`.
    #[must_use]
    pub fn cross_join(self, table: impl Into<TableRef>) -> Self {
        self.join(JoinType::Cross, table.into(), None)
    }

    // ── WHERE / GROUP BY / HAVING ────────────────────────────────────

    /// Replaces the WHERE condition.
    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.where_clause = Some(condition);
        self
    }

    /// AND-s a condition onto the WHERE clause.
    #[must_use]
    pub fn and_filter(mut self, condition: Condition) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing & condition,
            None => condition,
        });
        self
    }

    /// OR-s a condition onto the WHERE clause.
    #[must_use]
    pub fn or_filter(mut self, condition: Condition) -> Self {
        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing | condition,
            None => condition,
        });
        self
    }

    /// Appends `GROUP BY` entries.
    #[must_use]
    pub fn group_by<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Replaces the HAVING condition.
    #[must_use]
    pub fn having(mut self, condition: Condition) -> Self {
        self.having = Some(condition);
        self
    }

    // ── ORDER BY / LIMIT ─────────────────────────────────────────────

    /// Appends an `ORDER BY` entry.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Sets the LIMIT.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the OFFSET.
    #[must_use]
    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    // ── UNION ────────────────────────────────────────────────────────

    /// Appends a `UNION`.
    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.unions.push(Union {
            query: Box::new(other),
            all: false,
        });
        self
    }

    /// Appends a `UNION ALL`.
    #[must_use]
    pub fn union_all(mut self, other: Self) -> Self {
        self.unions.push(Union {
            query: Box::new(other),
            all: true,
        });
        self
    }

    // ── Parameters ───────────────────────────────────────────────────

    /// Binds a caller-named parameter used by raw fragments.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    // ── Sphinx extensions ────────────────────────────────────────────

    /// Sets the full-text `MATCH`.
    #[must_use]
    pub fn matching(mut self, text: impl Into<MatchExpr>) -> Self {
        self.match_text = Some(text.into());
        self
    }

    /// Appends a `WITHIN GROUP ORDER BY` entry.
    #[must_use]
    pub fn within(mut self, order: OrderBy) -> Self {
        self.within.push(order);
        self
    }

    /// Appends an `OPTION` entry.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }

    /// Returns `true` if any Sphinx-only clause is set.
    pub fn uses_sphinx_extensions(&self) -> bool {
        self.match_text.is_some() || !self.within.is_empty() || !self.options.is_empty()
    }
}
