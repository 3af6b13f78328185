//! Schema statements: `CREATE TABLE`, `DROP TABLE`, `TRUNCATE`, comments.

use polysql_core::PolySqlResult;
use tracing::debug;

use super::QueryBuilder;
use crate::dialect::types::ColumnDefinition;
use crate::dialect::{Dialect, Feature};

impl QueryBuilder {
    /// Builds `CREATE TABLE`, one column per line.
    ///
    /// `options` is appended after the closing parenthesis
    /// (`ENGINE=InnoDB`, ...).
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without DDL.
    ///
    /// # Examples
    ///
    /// ```
    /// use polysql_db::builder::QueryBuilder;
    /// use polysql_db::dialect::Dialect;
    /// use polysql_db::dialect::types::{ColumnDefinition, ColumnType};
    ///
    /// let sql = QueryBuilder::new(Dialect::PostgreSql)
    ///     .create_table(
    ///         "users",
    ///         &[
    ///             ("id", ColumnType::Pk.into()),
    ///             ("name", ColumnDefinition::new(ColumnType::String).not_null()),
    ///         ],
    ///         None,
    ///     )
    ///     .unwrap();
    /// assert_eq!(
    ///     sql,
    ///     "CREATE TABLE \"users\" (\n\t\"id\" serial NOT NULL PRIMARY KEY,\n\t\"name\" varchar(255) NOT NULL\n)"
    /// );
    /// ```
    pub fn create_table(
        &self,
        table: &str,
        columns: &[(&str, ColumnDefinition)],
        options: Option<&str>,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::Ddl, "CREATE TABLE")?;

        let mut lines = Vec::with_capacity(columns.len());
        for (name, definition) in columns {
            lines.push(format!(
                "\t{} {}",
                self.rules.quote_column_name(name),
                self.rules.column_type(definition)?
            ));
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n{}\n)",
            self.rules.quote_table_name(table),
            lines.join(",\n")
        );
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            sql.push(' ');
            sql.push_str(options);
        }
        debug!(
            dialect = self.rules.dialect.name(),
            table,
            columns = columns.len(),
            "Built CREATE TABLE statement"
        );
        Ok(sql)
    }

    /// Builds `DROP TABLE`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without DDL.
    pub fn drop_table(&self, table: &str) -> PolySqlResult<String> {
        self.rules.require(Feature::Ddl, "DROP TABLE")?;
        Ok(format!("DROP TABLE {}", self.rules.quote_table_name(table)))
    }

    /// Builds a statement removing every row of `table`.
    pub fn truncate_table(&self, table: &str) -> String {
        let table = self.rules.quote_table_name(table);
        match self.rules.dialect {
            Dialect::Sqlite => format!("DELETE FROM {table}"),
            Dialect::Sphinx => format!("TRUNCATE RTINDEX {table}"),
            _ => format!("TRUNCATE TABLE {table}"),
        }
    }

    /// Builds a statement setting the comment of `table`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without table comments.
    pub fn add_comment_on_table(&self, table: &str, comment: &str) -> PolySqlResult<String> {
        self.rules.require(Feature::TableComment, "Table comments")?;
        let table = self.rules.quote_table_name(table);
        let comment = self.rules.quote_string(comment);
        Ok(if self.rules.supports(Feature::InlineColumnComment) {
            format!("ALTER TABLE {table} COMMENT {comment}")
        } else {
            format!("COMMENT ON TABLE {table} IS {comment}")
        })
    }

    /// Builds a statement clearing the comment of `table`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without table comments.
    pub fn drop_comment_from_table(&self, table: &str) -> PolySqlResult<String> {
        self.rules.require(Feature::TableComment, "Table comments")?;
        let table = self.rules.quote_table_name(table);
        Ok(if self.rules.supports(Feature::InlineColumnComment) {
            format!("ALTER TABLE {table} COMMENT ''")
        } else {
            format!("COMMENT ON TABLE {table} IS NULL")
        })
    }

    /// Builds `COMMENT ON COLUMN table.column IS '...'`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` where a column comment needs the live
    /// column definition (MySQL, CUBRID) or is not available at all.
    pub fn add_comment_on_column(
        &self,
        table: &str,
        column: &str,
        comment: &str,
    ) -> PolySqlResult<String> {
        self.rules.require(Feature::ColumnComment, "Column comments")?;
        Ok(format!(
            "COMMENT ON COLUMN {}.{} IS {}",
            self.rules.quote_table_name(table),
            self.rules.quote_column_name(column),
            self.rules.quote_string(comment)
        ))
    }

    /// Builds `COMMENT ON COLUMN table.column IS NULL`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::add_comment_on_column`].
    pub fn drop_comment_from_column(&self, table: &str, column: &str) -> PolySqlResult<String> {
        self.rules.require(Feature::ColumnComment, "Column comments")?;
        Ok(format!(
            "COMMENT ON COLUMN {}.{} IS NULL",
            self.rules.quote_table_name(table),
            self.rules.quote_column_name(column)
        ))
    }

    /// The physical column type for `definition`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperation` on dialects without DDL.
    pub fn column_type(&self, definition: &ColumnDefinition) -> PolySqlResult<String> {
        self.rules.column_type(definition)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::QueryBuilder;
    use crate::dialect::types::{ColumnDefinition, ColumnType};
    use crate::dialect::Dialect;

    fn columns() -> Vec<(&'static str, ColumnDefinition)> {
        vec![
            ("id", ColumnType::Pk.into()),
            ("title", ColumnDefinition::new(ColumnType::String).size(64).not_null()),
        ]
    }

    #[test]
    fn test_create_table_mysql_with_options() {
        let sql = QueryBuilder::new(Dialect::MySql)
            .create_table("posts", &columns(), Some("ENGINE=InnoDB"))
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE `posts` (\n\t`id` int(11) NOT NULL AUTO_INCREMENT PRIMARY KEY,\n\t`title` varchar(64) NOT NULL\n) ENGINE=InnoDB"
        );
    }

    #[test]
    fn test_create_table_mssql() {
        let sql = QueryBuilder::new(Dialect::MsSql)
            .create_table("posts", &columns(), None)
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE [posts] (\n\t[id] int IDENTITY PRIMARY KEY,\n\t[title] nvarchar(64) NOT NULL\n)"
        );
    }

    #[test]
    fn test_sphinx_rejects_ddl_but_truncates() {
        let sphinx = QueryBuilder::new(Dialect::Sphinx);
        assert!(sphinx
            .create_table("idx", &columns(), None)
            .unwrap_err()
            .is_unsupported());
        assert!(sphinx.drop_table("idx").unwrap_err().is_unsupported());
        assert_eq!(sphinx.truncate_table("idx"), "TRUNCATE RTINDEX idx");
    }

    #[test]
    fn test_drop_and_truncate() {
        let pg = QueryBuilder::new(Dialect::PostgreSql);
        assert_eq!(pg.drop_table("t").unwrap(), "DROP TABLE \"t\"");
        assert_eq!(pg.truncate_table("t"), "TRUNCATE TABLE \"t\"");
        assert_eq!(
            QueryBuilder::new(Dialect::Sqlite).truncate_table("t"),
            "DELETE FROM `t`"
        );
    }

    #[test]
    fn test_table_comments() {
        assert_eq!(
            QueryBuilder::new(Dialect::MySql)
                .add_comment_on_table("t", "it's")
                .unwrap(),
            "ALTER TABLE `t` COMMENT 'it''s'"
        );
        assert_eq!(
            QueryBuilder::new(Dialect::PostgreSql)
                .add_comment_on_table("t", "users")
                .unwrap(),
            "COMMENT ON TABLE \"t\" IS 'users'"
        );
        assert_eq!(
            QueryBuilder::new(Dialect::Oracle)
                .drop_comment_from_table("t")
                .unwrap(),
            "COMMENT ON TABLE \"t\" IS NULL"
        );
        for dialect in [Dialect::Sqlite, Dialect::MsSql, Dialect::Sphinx] {
            let err = QueryBuilder::new(dialect)
                .add_comment_on_table("t", "x")
                .unwrap_err();
            assert!(err.is_unsupported(), "{dialect}");
        }
    }

    #[test]
    fn test_column_comments() {
        assert_eq!(
            QueryBuilder::new(Dialect::PostgreSql)
                .add_comment_on_column("t", "c", "note")
                .unwrap(),
            "COMMENT ON COLUMN \"t\".\"c\" IS 'note'"
        );
        assert_eq!(
            QueryBuilder::new(Dialect::Oracle)
                .drop_comment_from_column("t", "c")
                .unwrap(),
            "COMMENT ON COLUMN \"t\".\"c\" IS NULL"
        );
        for dialect in [Dialect::MySql, Dialect::Cubrid, Dialect::Sqlite] {
            assert!(QueryBuilder::new(dialect)
                .add_comment_on_column("t", "c", "x")
                .unwrap_err()
                .is_unsupported());
        }
    }

    #[test]
    fn test_column_type_delegates() {
        let def = ColumnDefinition::new(ColumnType::Integer).comment("count");
        assert_eq!(
            QueryBuilder::new(Dialect::MySql).column_type(&def).unwrap(),
            "int(11) COMMENT 'count'"
        );
        assert_eq!(
            QueryBuilder::new(Dialect::PostgreSql).column_type(&def).unwrap(),
            "integer"
        );
    }
}
