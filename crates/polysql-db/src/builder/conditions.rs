//! Condition builders.
//!
//! Each operator family renders to one SQL fragment and appends its bound
//! values to the shared [`ParameterMap`]. Conjunctions only join child
//! fragments; they never bind anything themselves.

use polysql_core::{PolySqlError, PolySqlResult};

use super::QueryBuilder;
use crate::dialect::{Dialect, Feature};
use crate::params::ParameterMap;
use crate::query::condition::{
    ComparisonOp, Condition, Connective, InColumns, InValues, LikeEscape,
};
use crate::query::operand::{LikePattern, Operand};
use crate::query::select::Query;
use crate::value::Value;

/// Rendered for an `IN` over an empty list: matches nothing.
const ALWAYS_FALSE: &str = "0=1";

/// Rendered for a `NOT IN` over an empty list: matches everything.
const ALWAYS_TRUE: &str = "1=1";

impl QueryBuilder {
    pub(crate) fn condition_sql(
        &self,
        condition: &Condition,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        match condition {
            Condition::Comparison { column, op, value } => {
                self.comparison_sql(column, *op, value, params)
            }
            Condition::Hash(pairs) => Ok(self.hash_sql(pairs, params)),
            Condition::In {
                columns,
                negated,
                values,
            } => self.in_sql(columns, *negated, values, params),
            Condition::Like {
                column,
                patterns,
                negated,
                connective,
                escape,
                case_insensitive,
            } => self.like_sql(
                column,
                patterns,
                *negated,
                *connective,
                escape,
                *case_insensitive,
                params,
            ),
            Condition::Between {
                column,
                from,
                to,
                negated,
            } => {
                let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                let from = self.operand_sql(from, params)?;
                let to = self.operand_sql(to, params)?;
                Ok(format!(
                    "{} {keyword} {from} AND {to}",
                    self.rules.quote_column_name(column)
                ))
            }
            Condition::Conjunction {
                connective,
                conditions,
            } => {
                let mut parts = Vec::with_capacity(conditions.len());
                for child in conditions {
                    let sql = self.condition_sql(child, params)?;
                    if !sql.is_empty() {
                        parts.push(sql);
                    }
                }
                Ok(join_parts(&parts, connective.as_sql()))
            }
            Condition::Not(inner) => {
                let sql = self.condition_sql(inner, params)?;
                Ok(if sql.is_empty() {
                    sql
                } else {
                    format!("NOT ({sql})")
                })
            }
            Condition::Exists { negated, query } => {
                self.rules.require(Feature::Exists, "EXISTS")?;
                let keyword = if *negated { "NOT EXISTS" } else { "EXISTS" };
                Ok(format!("{keyword} {}", self.subquery_sql(query, params)?))
            }
            Condition::Raw(expr) => {
                params.merge(expr.params())?;
                Ok(expr.sql().to_string())
            }
        }
    }

    // ── Operands ─────────────────────────────────────────────────────

    /// Renders the right-hand side of a predicate or an assignment.
    pub(crate) fn operand_sql(
        &self,
        operand: &Operand,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        match operand {
            Operand::Value(Value::Null) => Ok("NULL".to_string()),
            Operand::Value(value) => Ok(self.bind(value.clone(), params)),
            Operand::Column(name) => Ok(self.rules.quote_column_name(name)),
            Operand::Expression(expr) => {
                params.merge(expr.params())?;
                Ok(expr.sql().to_string())
            }
            Operand::Subquery(query) => self.subquery_sql(query, params),
            Operand::Json(doc) => {
                let placeholder = self.bind(Value::String(doc.to_string()), params);
                Ok(match self.rules.dialect {
                    Dialect::MySql => format!("CAST({placeholder} AS JSON)"),
                    Dialect::PostgreSql => format!("{placeholder}::json"),
                    _ => placeholder,
                })
            }
            Operand::Array {
                values,
                element_type,
            } => {
                self.rules.require(Feature::Array, "Array expressions")?;
                let items: Vec<String> = values
                    .iter()
                    .map(|v| self.bind(v.clone(), params))
                    .collect();
                let mut sql = format!("ARRAY[{}]", items.join(", "));
                if let Some(ty) = element_type {
                    sql.push_str(&format!("::{ty}[]"));
                }
                Ok(sql)
            }
        }
    }

    // ── Comparison / hash ────────────────────────────────────────────

    fn comparison_sql(
        &self,
        column: &str,
        op: ComparisonOp,
        value: &Operand,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        let column = self.rules.quote_column_name(column);
        if value.is_null() {
            return Ok(match op {
                ComparisonOp::Eq => format!("{column} IS NULL"),
                ComparisonOp::NotEq => format!("{column} IS NOT NULL"),
                _ => format!("{column}{}NULL", op.as_sql()),
            });
        }
        Ok(format!(
            "{column}{}{}",
            op.as_sql(),
            self.operand_sql(value, params)?
        ))
    }

    fn hash_sql(&self, pairs: &[(String, Value)], params: &mut ParameterMap) -> String {
        let mut parts = Vec::with_capacity(pairs.len());
        for (column, value) in pairs {
            let sql = match value {
                Value::Null => format!("{} IS NULL", self.rules.quote_column_name(column)),
                Value::List(items) => self.in_list_sql(column, false, items, params),
                other => format!(
                    "{}={}",
                    self.rules.quote_column_name(column),
                    self.bind(other.clone(), params)
                ),
            };
            parts.push(sql);
        }
        join_parts(&parts, "AND")
    }

    // ── IN ───────────────────────────────────────────────────────────

    fn in_sql(
        &self,
        columns: &InColumns,
        negated: bool,
        values: &InValues,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        match (columns, values) {
            (_, InValues::Subquery(query)) => {
                self.subquery_in_sql(columns, negated, query, params)
            }
            (InColumns::Single(column), InValues::List(items)) => {
                Ok(self.in_list_sql(column, negated, items, params))
            }
            (InColumns::Multiple(cols), InValues::List(items)) if cols.len() == 1 => {
                Ok(self.in_list_sql(&cols[0], negated, items, params))
            }
            (InColumns::Multiple(cols), InValues::Rows(rows)) => {
                Ok(self.composite_in_sql(cols, negated, rows, params))
            }
            (InColumns::Multiple(cols), InValues::List(_)) => {
                Err(PolySqlError::InvalidArgument(format!(
                    "IN over {} columns needs row values, not a scalar list",
                    cols.len()
                )))
            }
            (InColumns::Single(column), InValues::Rows(_)) => {
                Err(PolySqlError::InvalidArgument(format!(
                    "IN over the single column '{column}' needs a scalar list, not row values"
                )))
            }
        }
    }

    fn in_list_sql(
        &self,
        column: &str,
        negated: bool,
        items: &[Value],
        params: &mut ParameterMap,
    ) -> String {
        let quoted = self.rules.quote_column_name(column);
        let has_null = items.iter().any(Value::is_null);
        let values: Vec<&Value> = items.iter().filter(|v| !v.is_null()).collect();

        let null_check = if negated {
            format!("{quoted} IS NOT NULL")
        } else {
            format!("{quoted} IS NULL")
        };

        if values.is_empty() {
            return if has_null {
                null_check
            } else if negated {
                ALWAYS_TRUE.to_string()
            } else {
                ALWAYS_FALSE.to_string()
            };
        }

        let sql = if values.len() == 1 {
            let placeholder = self.bind(values[0].clone(), params);
            let op = if negated { "<>" } else { "=" };
            format!("{quoted}{op}{placeholder}")
        } else {
            let keyword = if negated { "NOT IN" } else { "IN" };
            let chunk_size = self.rules.max_in_list.unwrap_or(values.len());
            let chunks: Vec<String> = values
                .chunks(chunk_size)
                .map(|chunk| {
                    let placeholders: Vec<String> = chunk
                        .iter()
                        .map(|v| self.bind((*v).clone(), params))
                        .collect();
                    format!("{quoted} {keyword} ({})", placeholders.join(", "))
                })
                .collect();
            match chunks.as_slice() {
                [only] => only.clone(),
                _ => {
                    let glue = if negated { " AND " } else { " OR " };
                    format!("({})", chunks.join(glue))
                }
            }
        };

        if !has_null {
            return sql;
        }
        if negated {
            format!("({sql} AND {null_check})")
        } else {
            format!("({sql} OR {null_check})")
        }
    }

    fn composite_in_sql(
        &self,
        columns: &[String],
        negated: bool,
        rows: &[Vec<Value>],
        params: &mut ParameterMap,
    ) -> String {
        if rows.is_empty() {
            return if negated { ALWAYS_TRUE } else { ALWAYS_FALSE }.to_string();
        }
        let quoted: Vec<String> = columns
            .iter()
            .map(|c| self.rules.quote_column_name(c))
            .collect();

        if self.rules.supports(Feature::RowValueIn) {
            let tuples: Vec<String> = rows
                .iter()
                .map(|row| {
                    let members: Vec<String> = (0..columns.len())
                        .map(|i| match row.get(i) {
                            Some(v) if !v.is_null() => self.bind(v.clone(), params),
                            _ => "NULL".to_string(),
                        })
                        .collect();
                    format!("({})", members.join(", "))
                })
                .collect();
            let keyword = if negated { "NOT IN" } else { "IN" };
            return format!("({}) {keyword} ({})", quoted.join(", "), tuples.join(", "));
        }

        // Expanded form for engines without row-value comparison
        let (eq, is_null, inner, outer) = if negated {
            ("<>", "IS NOT NULL", " OR ", " AND ")
        } else {
            ("=", "IS NULL", " AND ", " OR ")
        };
        let groups: Vec<String> = rows
            .iter()
            .map(|row| {
                let members: Vec<String> = quoted
                    .iter()
                    .enumerate()
                    .map(|(i, column)| match row.get(i) {
                        Some(v) if !v.is_null() => {
                            format!("{column}{eq}{}", self.bind(v.clone(), params))
                        }
                        _ => format!("{column} {is_null}"),
                    })
                    .collect();
                format!("({})", members.join(inner))
            })
            .collect();
        groups.join(outer)
    }

    fn subquery_in_sql(
        &self,
        columns: &InColumns,
        negated: bool,
        query: &Query,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::Subquery, "Subqueries")?;
        let left = match columns {
            InColumns::Single(column) => self.rules.quote_column_name(column),
            InColumns::Multiple(cols) => {
                self.rules
                    .require(Feature::MultiColumnSubqueryIn, "buildSubqueryInCondition")?;
                let quoted: Vec<String> = cols
                    .iter()
                    .map(|c| self.rules.quote_column_name(c))
                    .collect();
                format!("({})", quoted.join(", "))
            }
        };
        let keyword = if negated { "NOT IN" } else { "IN" };
        Ok(format!("{left} {keyword} {}", self.subquery_sql(query, params)?))
    }

    // ── LIKE ─────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn like_sql(
        &self,
        column: &str,
        patterns: &[LikePattern],
        negated: bool,
        connective: Connective,
        escape: &LikeEscape,
        case_insensitive: bool,
        params: &mut ParameterMap,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::Like, "LIKE")?;

        if patterns.is_empty() {
            return Ok(if negated {
                String::new()
            } else {
                ALWAYS_FALSE.to_string()
            });
        }

        let native_ilike = case_insensitive && self.rules.supports(Feature::ILike);
        let lower = case_insensitive && !native_ilike;
        let keyword = match (negated, native_ilike) {
            (false, false) => "LIKE",
            (true, false) => "NOT LIKE",
            (false, true) => "ILIKE",
            (true, true) => "NOT ILIKE",
        };

        let mut column_sql = self.rules.quote_column_name(column);
        if lower {
            column_sql = format!("LOWER({column_sql})");
        }

        let escape_clause = match (escape, self.rules.like_escape_char) {
            (LikeEscape::Dialect, Some(ch)) => format!(" ESCAPE '{ch}'"),
            _ => String::new(),
        };

        let mut parts = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let mut rhs = match pattern {
                LikePattern::Literal(text) => {
                    let value = match escape {
                        LikeEscape::Disabled => text.clone(),
                        _ => format!("%{}%", self.rules.escape_like(text, escape)),
                    };
                    self.bind(Value::String(value), params)
                }
                LikePattern::Expression(expr) => {
                    params.merge(expr.params())?;
                    expr.sql().to_string()
                }
            };
            if lower {
                rhs = format!("LOWER({rhs})");
            }
            parts.push(format!("{column_sql} {keyword} {rhs}{escape_clause}"));
        }
        Ok(parts.join(&format!(" {} ", connective.as_sql())))
    }
}

/// Joins rendered parts: nothing, a bare single part, or `(a) OP (b)`.
fn join_parts(parts: &[String], keyword: &str) -> String {
    match parts.len() {
        0 => String::new(),
        1 => parts[0].clone(),
        _ => format!("({})", parts.join(&format!(") {keyword} ("))),
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::QueryBuilder;
    use crate::dialect::Dialect;
    use crate::expression::Expression;
    use crate::params::ParameterMap;
    use crate::query::condition::{Condition, LikeEscape};
    use crate::query::operand::Operand;
    use crate::query::select::Query;
    use crate::value::Value;

    fn build(dialect: Dialect, condition: &Condition) -> (String, ParameterMap) {
        let mut params = ParameterMap::new();
        let sql = QueryBuilder::new(dialect)
            .build_condition(condition, &mut params)
            .unwrap();
        (sql, params)
    }

    // ── Comparison ──────────────────────────────────────────────────

    #[test]
    fn test_comparison_binds() {
        let (sql, params) = build(Dialect::MySql, &Condition::gte("age", 18));
        assert_eq!(sql, "`age`>=:qp0");
        assert_eq!(params.get(":qp0"), Some(&Value::Int(18)));
    }

    #[test]
    fn test_comparison_null() {
        let (sql, params) = build(Dialect::PostgreSql, &Condition::is_null("deleted_at"));
        assert_eq!(sql, "\"deleted_at\" IS NULL");
        assert!(params.is_empty());

        let (sql, _) = build(Dialect::PostgreSql, &Condition::ne("deleted_at", Value::Null));
        assert_eq!(sql, "\"deleted_at\" IS NOT NULL");

        let (sql, params) = build(Dialect::PostgreSql, &Condition::gt("x", Value::Null));
        assert_eq!(sql, "\"x\">NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_comparison_column_and_expression() {
        let (sql, _) = build(
            Dialect::MsSql,
            &Condition::eq("a.total", Operand::column("b.total")),
        );
        assert_eq!(sql, "[a].[total]=[b].[total]");

        let expr = Expression::new("NOW() - :d").bind(":d", 5);
        let (sql, params) = build(Dialect::MySql, &Condition::lt("created", expr));
        assert_eq!(sql, "`created`<NOW() - :d");
        assert_eq!(params.get(":d"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_comparison_subquery() {
        let sub = Query::table("orders").select([Expression::new("MAX(total)")]);
        let (sql, _) = build(Dialect::Sqlite, &Condition::eq("total", sub));
        assert_eq!(sql, "`total`=(SELECT MAX(total) FROM `orders`)");
    }

    #[test]
    fn test_comparison_json() {
        let doc = serde_json::json!({"a": 1});
        let c = Condition::eq("meta", Operand::json(doc));
        let (sql, params) = build(Dialect::MySql, &c);
        assert_eq!(sql, "`meta`=CAST(:qp0 AS JSON)");
        assert_eq!(params.get(":qp0"), Some(&Value::from("{\"a\":1}")));

        let (sql, _) = build(Dialect::PostgreSql, &c);
        assert_eq!(sql, "\"meta\"=:qp0::json");

        let (sql, _) = build(Dialect::Sqlite, &c);
        assert_eq!(sql, "`meta`=:qp0");
    }

    #[test]
    fn test_comparison_array() {
        let c = Condition::eq("tags", Operand::array([1, 2], Some("int")));
        let (sql, params) = build(Dialect::PostgreSql, &c);
        assert_eq!(sql, "\"tags\"=ARRAY[:qp0, :qp1]::int[]");
        assert_eq!(params.len(), 2);

        let mut params = ParameterMap::new();
        let err = QueryBuilder::new(Dialect::MySql)
            .build_condition(&c, &mut params)
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    // ── Hash ────────────────────────────────────────────────────────

    #[test]
    fn test_hash() {
        let c = Condition::hash([
            ("status", Value::Int(1)),
            ("deleted_at", Value::Null),
            ("type", Value::List(vec![Value::Int(1), Value::Int(2)])),
        ]);
        let (sql, params) = build(Dialect::MySql, &c);
        assert_eq!(
            sql,
            "(`status`=:qp0) AND (`deleted_at` IS NULL) AND (`type` IN (:qp1, :qp2))"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_hash_single_and_empty() {
        let (sql, _) = build(Dialect::MySql, &Condition::hash([("a", 1)]));
        assert_eq!(sql, "`a`=:qp0");
        let (sql, _) = build(Dialect::MySql, &Condition::hash(Vec::<(&str, i64)>::new()));
        assert_eq!(sql, "");
    }

    // ── IN ──────────────────────────────────────────────────────────

    #[test]
    fn test_in_empty() {
        let (sql, params) = build(Dialect::MySql, &Condition::in_list("id", Vec::<i64>::new()));
        assert_eq!(sql, "0=1");
        assert!(params.is_empty());
        let (sql, _) = build(Dialect::MySql, &Condition::not_in_list("id", Vec::<i64>::new()));
        assert_eq!(sql, "1=1");
    }

    #[test]
    fn test_in_single_value() {
        let (sql, _) = build(Dialect::MySql, &Condition::in_list("id", [5]));
        assert_eq!(sql, "`id`=:qp0");
        let (sql, _) = build(Dialect::MySql, &Condition::not_in_list("id", [5]));
        assert_eq!(sql, "`id`<>:qp0");
    }

    #[test]
    fn test_in_list() {
        let (sql, params) = build(Dialect::PostgreSql, &Condition::in_list("id", [1, 2, 3]));
        assert_eq!(sql, "\"id\" IN (:qp0, :qp1, :qp2)");
        assert_eq!(params.len(), 3);
        let (sql, _) = build(Dialect::PostgreSql, &Condition::not_in_list("id", [1, 2]));
        assert_eq!(sql, "\"id\" NOT IN (:qp0, :qp1)");
    }

    #[test]
    fn test_in_with_nulls() {
        let values = vec![Value::Int(1), Value::Null, Value::Int(2)];
        let (sql, params) = build(Dialect::MySql, &Condition::in_list("id", values.clone()));
        assert_eq!(sql, "(`id` IN (:qp0, :qp1) OR `id` IS NULL)");
        assert_eq!(params.len(), 2);

        let (sql, _) = build(Dialect::MySql, &Condition::not_in_list("id", values));
        assert_eq!(sql, "(`id` NOT IN (:qp0, :qp1) AND `id` IS NOT NULL)");

        let (sql, _) = build(Dialect::MySql, &Condition::in_list("id", vec![Value::Null]));
        assert_eq!(sql, "`id` IS NULL");

        let (sql, _) = build(
            Dialect::MySql,
            &Condition::in_list("id", vec![Value::Null, Value::Int(4)]),
        );
        assert_eq!(sql, "(`id`=:qp0 OR `id` IS NULL)");
    }

    #[test]
    fn test_oracle_chunks_in_list() {
        let values: Vec<i64> = (0..1001).collect();
        let (sql, params) = build(Dialect::Oracle, &Condition::in_list("id", values.clone()));
        assert!(sql.starts_with("(\"id\" IN (:qp0, "));
        assert!(sql.contains(":qp999) OR \"id\" IN (:qp1000))"));
        assert_eq!(params.len(), 1001);

        let (sql, _) = build(Dialect::Oracle, &Condition::not_in_list("id", values));
        assert!(sql.contains(") AND \"id\" NOT IN (:qp1000))"));
    }

    #[test]
    fn test_in_rows_row_value() {
        let rows = vec![
            vec![Value::Int(1), Value::from("a")],
            vec![Value::Int(2)],
        ];
        let (sql, params) = build(Dialect::PostgreSql, &Condition::in_rows(["id", "name"], rows));
        assert_eq!(
            sql,
            "(\"id\", \"name\") IN ((:qp0, :qp1), (:qp2, NULL))"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_in_rows_expanded() {
        let rows = vec![
            vec![Value::Int(1), Value::from("a")],
            vec![Value::Int(2), Value::Null],
        ];
        let (sql, _) = build(Dialect::Sqlite, &Condition::in_rows(["id", "name"], rows.clone()));
        assert_eq!(
            sql,
            "(`id`=:qp0 AND `name`=:qp1) OR (`id`=:qp2 AND `name` IS NULL)"
        );

        let (sql, _) = build(Dialect::MsSql, &Condition::not_in_rows(["id", "name"], rows));
        assert_eq!(
            sql,
            "([id]<>:qp0 OR [name]<>:qp1) AND ([id]<>:qp2 OR [name] IS NOT NULL)"
        );
    }

    #[test]
    fn test_in_rows_empty() {
        let (sql, _) = build(Dialect::MySql, &Condition::in_rows(["a", "b"], vec![]));
        assert_eq!(sql, "0=1");
    }

    #[test]
    fn test_in_mismatched_shapes() {
        let mut params = ParameterMap::new();
        let builder = QueryBuilder::new(Dialect::MySql);
        let c = Condition::In {
            columns: "id".into(),
            negated: false,
            values: crate::query::condition::InValues::Rows(vec![vec![Value::Int(1)]]),
        };
        let err = builder.build_condition(&c, &mut params).unwrap_err();
        assert!(matches!(err, polysql_core::PolySqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_in_subquery() {
        let sub = Query::table("orders").select(["user_id"]).filter(Condition::gt("total", 10));
        let (sql, params) = build(Dialect::MySql, &Condition::in_subquery("id", sub.clone()));
        assert_eq!(
            sql,
            "`id` IN (SELECT `user_id` FROM `orders` WHERE `total`>:qp0)"
        );
        assert_eq!(params.len(), 1);

        let (sql, _) = build(
            Dialect::PostgreSql,
            &Condition::not_in_subquery(["a", "b"], sub),
        );
        assert!(sql.starts_with("(\"a\", \"b\") NOT IN (SELECT"));
    }

    #[test]
    fn test_multi_column_subquery_in_unsupported() {
        for dialect in [Dialect::Sqlite, Dialect::MsSql] {
            let mut params = ParameterMap::new();
            let c = Condition::in_subquery(["id"], Query::table("t").select(["id"]));
            let err = QueryBuilder::new(dialect)
                .build_condition(&c, &mut params)
                .unwrap_err();
            assert!(err.is_unsupported());
            assert!(err.to_string().contains("buildSubqueryInCondition"));
        }
    }

    // ── LIKE ────────────────────────────────────────────────────────

    #[test]
    fn test_like_escaping_per_dialect() {
        let c = Condition::like("name", ["50%"]);
        let (sql, params) = build(Dialect::MySql, &c);
        assert_eq!(sql, "`name` LIKE :qp0");
        assert_eq!(params.get(":qp0"), Some(&Value::from("%50\\%%")));

        let (sql, params) = build(Dialect::MsSql, &c);
        assert_eq!(sql, "[name] LIKE :qp0");
        assert_eq!(params.get(":qp0"), Some(&Value::from("%50[%]%")));

        let (sql, _) = build(Dialect::Sqlite, &c);
        assert_eq!(sql, "`name` LIKE :qp0 ESCAPE '\\'");

        let (sql, params) = build(Dialect::Oracle, &c);
        assert_eq!(sql, "\"name\" LIKE :qp0 ESCAPE '!'");
        assert_eq!(params.get(":qp0"), Some(&Value::from("%50!%%")));
    }

    #[test]
    fn test_like_connectives() {
        let (sql, _) = build(Dialect::MySql, &Condition::like("n", ["a", "b"]));
        assert_eq!(sql, "`n` LIKE :qp0 AND `n` LIKE :qp1");
        let (sql, _) = build(Dialect::MySql, &Condition::or_like("n", ["a", "b"]));
        assert_eq!(sql, "`n` LIKE :qp0 OR `n` LIKE :qp1");
        let (sql, _) = build(Dialect::MySql, &Condition::not_like("n", ["a"]));
        assert_eq!(sql, "`n` NOT LIKE :qp0");
        let (sql, _) = build(Dialect::MySql, &Condition::or_not_like("n", ["a", "b"]));
        assert_eq!(sql, "`n` NOT LIKE :qp0 OR `n` NOT LIKE :qp1");
    }

    #[test]
    fn test_like_empty_patterns() {
        let (sql, _) = build(Dialect::MySql, &Condition::like("n", Vec::<&str>::new()));
        assert_eq!(sql, "0=1");
        let (sql, _) = build(Dialect::MySql, &Condition::not_like("n", Vec::<&str>::new()));
        assert_eq!(sql, "");
    }

    #[test]
    fn test_like_escape_modes() {
        let c = Condition::like("n", ["a%b"]).with_escape(LikeEscape::Disabled);
        let (sql, params) = build(Dialect::Sqlite, &c);
        assert_eq!(sql, "`n` LIKE :qp0");
        assert_eq!(params.get(":qp0"), Some(&Value::from("a%b")));

        let c = Condition::like("n", ["a%"]).with_escape(LikeEscape::Custom(vec![(
            '%',
            "\\%".to_string(),
        )]));
        let (_, params) = build(Dialect::MySql, &c);
        assert_eq!(params.get(":qp0"), Some(&Value::from("%a\\%%")));
    }

    #[test]
    fn test_like_expression_pattern() {
        let c = Condition::like("n", [Expression::new("CONCAT('%', :p, '%')").bind(":p", "x")]);
        let (sql, params) = build(Dialect::MySql, &c);
        assert_eq!(sql, "`n` LIKE CONCAT('%', :p, '%')");
        assert!(params.contains(":p"));
    }

    #[test]
    fn test_like_case_insensitive() {
        let c = Condition::like("name", ["Ann"]).case_insensitive();
        let (sql, _) = build(Dialect::PostgreSql, &c);
        assert_eq!(sql, "\"name\" ILIKE :qp0");
        let (sql, _) = build(Dialect::MySql, &c);
        assert_eq!(sql, "LOWER(`name`) LIKE LOWER(:qp0)");
    }

    #[test]
    fn test_sphinx_rejects_like() {
        let mut params = ParameterMap::new();
        let err = QueryBuilder::new(Dialect::Sphinx)
            .build_condition(&Condition::like("n", ["a"]), &mut params)
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(params.is_empty());
    }

    // ── Between / composition ───────────────────────────────────────

    #[test]
    fn test_between() {
        let (sql, params) = build(Dialect::MySql, &Condition::between("age", 18, 30));
        assert_eq!(sql, "`age` BETWEEN :qp0 AND :qp1");
        assert_eq!(params.len(), 2);
        let (sql, _) = build(Dialect::MySql, &Condition::not_between("age", 18, 30));
        assert_eq!(sql, "`age` NOT BETWEEN :qp0 AND :qp1");
    }

    #[test]
    fn test_conjunction_rendering() {
        let c = Condition::eq("a", 1) & (Condition::eq("b", 2) | Condition::eq("c", 3));
        let (sql, params) = build(Dialect::MySql, &c);
        assert_eq!(sql, "(`a`=:qp0) AND ((`b`=:qp1) OR (`c`=:qp2))");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_conjunction_skips_empty() {
        let c = Condition::and(vec![
            Condition::and(vec![]),
            Condition::eq("a", 1),
            Condition::raw(""),
        ]);
        let (sql, _) = build(Dialect::MySql, &c);
        assert_eq!(sql, "`a`=:qp0");
        let (sql, _) = build(Dialect::MySql, &Condition::or(vec![]));
        assert_eq!(sql, "");
    }

    #[test]
    fn test_not() {
        let (sql, _) = build(Dialect::MySql, &!Condition::eq("a", 1));
        assert_eq!(sql, "NOT (`a`=:qp0)");
        let (sql, _) = build(Dialect::MySql, &Condition::negate(Condition::and(vec![])));
        assert_eq!(sql, "");
    }

    #[test]
    fn test_exists() {
        let sub = Query::table("orders").filter(Condition::raw("orders.user_id = users.id"));
        let (sql, _) = build(Dialect::PostgreSql, &Condition::exists(sub.clone()));
        assert_eq!(
            sql,
            "EXISTS (SELECT * FROM \"orders\" WHERE orders.user_id = users.id)"
        );
        let (sql, _) = build(Dialect::PostgreSql, &Condition::not_exists(sub.clone()));
        assert!(sql.starts_with("NOT EXISTS ("));

        let mut params = ParameterMap::new();
        let err = QueryBuilder::new(Dialect::Sphinx)
            .build_condition(&Condition::exists(sub), &mut params)
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_raw_params_merged_unaltered() {
        let mut p = ParameterMap::new();
        p.insert(":custom", "v");
        let (sql, params) = build(Dialect::MySql, &Condition::raw_with_params("x = :custom", p));
        assert_eq!(sql, "x = :custom");
        assert_eq!(params.get(":custom"), Some(&Value::from("v")));
    }
}
