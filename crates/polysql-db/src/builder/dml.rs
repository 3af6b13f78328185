//! `INSERT`, `REPLACE`, `UPDATE`, and `DELETE` statements.

use polysql_core::{PolySqlError, PolySqlResult};
use tracing::debug;

use super::QueryBuilder;
use crate::dialect::{BatchInsertStyle, Dialect, Feature};
use crate::params::ParameterMap;
use crate::query::condition::Condition;
use crate::query::operand::Operand;
use crate::query::select::Query;
use crate::value::Value;

impl QueryBuilder {
    /// Builds `INSERT INTO table (cols) VALUES (...)`.
    ///
    /// With no columns the statement inserts a row of defaults.
    ///
    /// # Errors
    ///
    /// Fails if a value operand cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use polysql_db::builder::QueryBuilder;
    /// use polysql_db::dialect::Dialect;
    ///
    /// let builder = QueryBuilder::new(Dialect::MySql);
    /// let (sql, params) = builder.insert("users", [("name", "ann"), ("email", "a@x")]).unwrap();
    /// assert_eq!(sql, "INSERT INTO `users` (`name`, `email`) VALUES (:qp0, :qp1)");
    /// assert_eq!(params.len(), 2);
    /// ```
    pub fn insert<I, K, V>(&self, table: &str, columns: I) -> PolySqlResult<(String, ParameterMap)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Operand>,
    {
        self.insert_like("INSERT", table, columns)
    }

    /// Builds `REPLACE INTO table (cols) VALUES (...)`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without `REPLACE`.
    pub fn replace<I, K, V>(&self, table: &str, columns: I) -> PolySqlResult<(String, ParameterMap)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Operand>,
    {
        self.rules.require(Feature::Replace, "REPLACE")?;
        self.insert_like("REPLACE", table, columns)
    }

    fn insert_like<I, K, V>(
        &self,
        keyword: &str,
        table: &str,
        columns: I,
    ) -> PolySqlResult<(String, ParameterMap)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Operand>,
    {
        let mut params = ParameterMap::new();
        let mut names = Vec::new();
        let mut placeholders = Vec::new();
        for (name, value) in columns {
            names.push(self.rules.quote_column_name(name.as_ref()));
            placeholders.push(self.operand_sql(&value.into(), &mut params)?);
        }

        let table = self.rules.quote_table_name(table);
        let sql = if names.is_empty() {
            if matches!(self.rules.dialect, Dialect::MySql | Dialect::Cubrid) {
                format!("{keyword} INTO {table} () VALUES ()")
            } else {
                format!("{keyword} INTO {table} DEFAULT VALUES")
            }
        } else {
            format!(
                "{keyword} INTO {table} ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            )
        };
        debug!(
            dialect = self.rules.dialect.name(),
            params = params.len(),
            "Built {keyword} statement"
        );
        Ok((sql, params))
    }

    /// Builds `INSERT INTO table (cols) SELECT ...`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without subqueries, or
    /// fails if the query cannot be built.
    pub fn insert_from_query(
        &self,
        table: &str,
        columns: &[&str],
        query: &Query,
    ) -> PolySqlResult<(String, ParameterMap)> {
        self.rules.require(Feature::InsertFromQuery, "INSERT ... SELECT")?;
        let mut params = ParameterMap::new();
        let select = self.build_query(query, &mut params)?;

        let table = self.rules.quote_table_name(table);
        let sql = if columns.is_empty() {
            format!("INSERT INTO {table} {select}")
        } else {
            let names: Vec<String> = columns
                .iter()
                .map(|c| self.rules.quote_column_name(c))
                .collect();
            format!("INSERT INTO {table} ({}) {select}", names.join(", "))
        };
        Ok((sql, params))
    }

    /// Builds a multi-row insert with inline literals.
    ///
    /// Returns an empty string when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a row's width differs from the column count.
    pub fn batch_insert(
        &self,
        table: &str,
        columns: &[&str],
        rows: &[Vec<Value>],
    ) -> PolySqlResult<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let mut tuples = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if !columns.is_empty() && row.len() != columns.len() {
                return Err(PolySqlError::InvalidArgument(format!(
                    "Row {i} has {} values for {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            let values: Vec<String> = row.iter().map(|v| self.rules.quote_value(v)).collect();
            tuples.push(format!("({})", values.join(", ")));
        }

        let mut target = self.rules.quote_table_name(table);
        if !columns.is_empty() {
            let names: Vec<String> = columns
                .iter()
                .map(|c| self.rules.quote_column_name(c))
                .collect();
            target = format!("{target} ({})", names.join(", "));
        }

        let sql = match self.rules.batch_insert_style {
            BatchInsertStyle::MultiValues => {
                format!("INSERT INTO {target} VALUES {}", tuples.join(", "))
            }
            BatchInsertStyle::InsertAll => {
                let intos: Vec<String> = tuples
                    .iter()
                    .map(|t| format!("INTO {target} VALUES {t}"))
                    .collect();
                format!("INSERT ALL {} SELECT 1 FROM SYS.DUAL", intos.join(" "))
            }
        };
        debug!(
            dialect = self.rules.dialect.name(),
            rows = rows.len(),
            "Built batch INSERT statement"
        );
        Ok(sql)
    }

    /// Builds `UPDATE table SET col=... WHERE ...`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when no column is assigned, or fails if the
    /// condition cannot be built.
    pub fn update<I, K, V>(
        &self,
        table: &str,
        columns: I,
        condition: Option<&Condition>,
    ) -> PolySqlResult<(String, ParameterMap)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Operand>,
    {
        let mut params = ParameterMap::new();
        let mut sets = Vec::new();
        for (name, value) in columns {
            let rhs = self.operand_sql(&value.into(), &mut params)?;
            sets.push(format!("{}={rhs}", self.rules.quote_column_name(name.as_ref())));
        }
        if sets.is_empty() {
            return Err(PolySqlError::InvalidArgument(
                "UPDATE needs at least one column".to_string(),
            ));
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.rules.quote_table_name(table),
            sets.join(", ")
        );
        let where_sql = self.build_where(condition, None, &mut params)?;
        if !where_sql.is_empty() {
            sql.push_str(&self.separator);
            sql.push_str(&where_sql);
        }
        debug!(
            dialect = self.rules.dialect.name(),
            params = params.len(),
            "Built UPDATE statement"
        );
        Ok((sql, params))
    }

    /// Builds `DELETE FROM table WHERE ...`.
    ///
    /// # Errors
    ///
    /// Fails if the condition cannot be built.
    pub fn delete(
        &self,
        table: &str,
        condition: Option<&Condition>,
    ) -> PolySqlResult<(String, ParameterMap)> {
        let mut params = ParameterMap::new();
        let mut sql = format!("DELETE FROM {}", self.rules.quote_table_name(table));
        let where_sql = self.build_where(condition, None, &mut params)?;
        if !where_sql.is_empty() {
            sql.push_str(&self.separator);
            sql.push_str(&where_sql);
        }
        debug!(
            dialect = self.rules.dialect.name(),
            params = params.len(),
            "Built DELETE statement"
        );
        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::QueryBuilder;
    use crate::dialect::Dialect;
    use crate::expression::Expression;
    use crate::query::condition::Condition;
    use crate::query::operand::Operand;
    use crate::query::select::Query;
    use crate::value::Value;

    #[test]
    fn test_insert() {
        let builder = QueryBuilder::new(Dialect::PostgreSql);
        let (sql, params) = builder
            .insert(
                "users",
                [
                    ("name", Operand::from("ann")),
                    ("created_at", Operand::from(Expression::new("NOW()"))),
                    ("nickname", Operand::from(Value::Null)),
                ],
            )
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\", \"created_at\", \"nickname\") VALUES (:qp0, NOW(), NULL)"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_insert_defaults() {
        let empty: Vec<(&str, i64)> = Vec::new();
        let (sql, _) = QueryBuilder::new(Dialect::MySql).insert("t", empty.clone()).unwrap();
        assert_eq!(sql, "INSERT INTO `t` () VALUES ()");
        let (sql, _) = QueryBuilder::new(Dialect::Cubrid).insert("t", empty.clone()).unwrap();
        assert_eq!(sql, "INSERT INTO \"t\" () VALUES ()");
        let (sql, _) = QueryBuilder::new(Dialect::Sqlite).insert("t", empty.clone()).unwrap();
        assert_eq!(sql, "INSERT INTO `t` DEFAULT VALUES");
        let (sql, _) = QueryBuilder::new(Dialect::MsSql).insert("t", empty).unwrap();
        assert_eq!(sql, "INSERT INTO [t] DEFAULT VALUES");
    }

    #[test]
    fn test_insert_from_query() {
        let q = Query::table("staging")
            .select(["name", "email"])
            .filter(Condition::eq("ok", 1));
        let (sql, params) = QueryBuilder::new(Dialect::MySql)
            .insert_from_query("users", &["name", "email"], &q)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO `users` (`name`, `email`) SELECT `name`, `email` FROM `staging` WHERE `ok`=:qp0"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_batch_insert() {
        let rows = vec![
            vec![Value::Int(1), Value::from("a'b")],
            vec![Value::Int(2), Value::Null],
        ];
        let sql = QueryBuilder::new(Dialect::Sqlite)
            .batch_insert("t", &["id", "name"], &rows)
            .unwrap();
        assert_eq!(sql, "INSERT INTO `t` (`id`, `name`) VALUES (1, 'a''b'), (2, NULL)");
    }

    #[test]
    fn test_batch_insert_oracle() {
        let rows = vec![vec![Value::Int(1)], vec![Value::Int(2)]];
        let sql = QueryBuilder::new(Dialect::Oracle)
            .batch_insert("t", &["id"], &rows)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT ALL INTO \"t\" (\"id\") VALUES (1) INTO \"t\" (\"id\") VALUES (2) SELECT 1 FROM SYS.DUAL"
        );
    }

    #[test]
    fn test_batch_insert_empty_and_mismatch() {
        let builder = QueryBuilder::new(Dialect::MySql);
        assert_eq!(builder.batch_insert("t", &["id"], &[]).unwrap(), "");
        let err = builder
            .batch_insert("t", &["id", "name"], &[vec![Value::Int(1)]])
            .unwrap_err();
        assert!(matches!(err, polysql_core::PolySqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_replace() {
        let (sql, _) = QueryBuilder::new(Dialect::Sqlite)
            .replace("t", [("id", 1)])
            .unwrap();
        assert_eq!(sql, "REPLACE INTO `t` (`id`) VALUES (:qp0)");
        let (sql, _) = QueryBuilder::new(Dialect::Sphinx)
            .replace("idx", [("id", 1)])
            .unwrap();
        assert_eq!(sql, "REPLACE INTO idx (id) VALUES (:qp0)");

        let err = QueryBuilder::new(Dialect::PostgreSql)
            .replace("t", [("id", 1)])
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_update() {
        let cond = Condition::eq("id", 5);
        let (sql, params) = QueryBuilder::new(Dialect::MsSql)
            .update(
                "users",
                [
                    ("name", Operand::from("bob")),
                    ("visits", Operand::from(Expression::new("[visits] + 1"))),
                ],
                Some(&cond),
            )
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE [users] SET [name]=:qp0, [visits]=[visits] + 1 WHERE [id]=:qp1"
        );
        assert_eq!(params.get(":qp1"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_update_requires_columns() {
        let empty: Vec<(&str, i64)> = Vec::new();
        let err = QueryBuilder::new(Dialect::MySql)
            .update("t", empty, None)
            .unwrap_err();
        assert!(matches!(err, polysql_core::PolySqlError::InvalidArgument(_)));
    }

    #[test]
    fn test_delete() {
        let builder = QueryBuilder::new(Dialect::PostgreSql);
        let (sql, params) = builder.delete("users", None).unwrap();
        assert_eq!(sql, "DELETE FROM \"users\"");
        assert!(params.is_empty());

        let cond = Condition::in_list("id", [1, 2]);
        let (sql, params) = builder.delete("users", Some(&cond)).unwrap();
        assert_eq!(sql, "DELETE FROM \"users\" WHERE \"id\" IN (:qp0, :qp1)");
        assert_eq!(params.len(), 2);
    }
}
