//! Integration tests running generated SQL on a real SQLite database.
//!
//! Every statement is produced by the SQLite builder and executed through
//! `rusqlite` with its named parameters, so these tests check that the
//! rendered syntax is accepted and that escaping behaves as intended.

use polysql_db::{
    ColumnDefinition, ColumnType, Condition, Expression, Operand, OrderBy, ParameterMap, Query,
    QueryBuilder, Value,
};
use polysql_db_backends::{Connection, DatabaseConfig};
use rusqlite::types::ValueRef;
use serde_json::json;

// ── Fixtures ──────────────────────────────────────────────────────────

/// An in-memory SQLite database paired with the handle that builds for it.
struct TestDb {
    connection: Connection,
    conn: rusqlite::Connection,
}

impl TestDb {
    fn memory() -> Self {
        Self {
            connection: Connection::open(DatabaseConfig::sqlite_memory()),
            conn: rusqlite::Connection::open_in_memory().unwrap(),
        }
    }

    fn query_builder(&self) -> QueryBuilder {
        self.connection.query_builder()
    }

    fn execute_batch(&self, sql: &str) {
        self.conn.execute_batch(sql).unwrap();
    }

    fn execute(&self, sql: &str, params: &ParameterMap) -> usize {
        self.prepare(sql, params).raw_execute().unwrap()
    }

    fn query(&self, sql: &str, params: &ParameterMap) -> Vec<Vec<Value>> {
        let mut stmt = self.prepare(sql, params);
        let width = stmt.column_count();
        let mut rows = stmt.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows.next().unwrap() {
            out.push(
                (0..width)
                    .map(|i| from_sqlite(row.get_ref(i).unwrap()))
                    .collect(),
            );
        }
        out
    }

    fn prepare(&self, sql: &str, params: &ParameterMap) -> rusqlite::Statement<'_> {
        let mut stmt = self.conn.prepare(sql).unwrap();
        for (name, value) in params.iter() {
            let Some(index) = stmt.parameter_index(name).unwrap() else {
                continue;
            };
            match value {
                Value::Null => stmt.raw_bind_parameter(index, rusqlite::types::Null),
                Value::Bool(b) => stmt.raw_bind_parameter(index, b),
                Value::Int(v) => stmt.raw_bind_parameter(index, v),
                Value::Float(v) => stmt.raw_bind_parameter(index, v),
                Value::Bytes(b) => stmt.raw_bind_parameter(index, b.as_slice()),
                other => stmt.raw_bind_parameter(index, other.to_string()),
            }
            .unwrap();
        }
        stmt
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}

fn setup() -> TestDb {
    let db = TestDb::memory();
    let builder = db.query_builder();

    let create = builder
        .create_table(
            "users",
            &[
                ("id", ColumnType::Pk.into()),
                ("name", ColumnDefinition::new(ColumnType::String).not_null()),
                ("email", ColumnType::String.into()),
                ("score", ColumnDefinition::new(ColumnType::Integer).default_value(0)),
                ("meta", ColumnType::Text.into()),
            ],
            None,
        )
        .unwrap();
    db.execute_batch(&create);

    for (name, email, score) in [
        ("ann", Value::from("ann@x"), 10),
        ("bob", Value::from("bob@y"), 20),
        ("50% off", Value::Null, 30),
        ("500 off", Value::from("z"), 40),
    ] {
        let (sql, params) = builder
            .insert(
                "users",
                [
                    ("name", Operand::from(name)),
                    ("email", Operand::from(email)),
                    ("score", Operand::from(score)),
                ],
            )
            .unwrap();
        db.execute(&sql, &params);
    }
    db
}

fn fetch(db: &TestDb, builder: &QueryBuilder, query: &Query) -> Vec<Vec<Value>> {
    let (sql, params) = builder.build(query).unwrap();
    db.query(&sql, &params)
}

fn names(rows: Vec<Vec<Value>>) -> Vec<String> {
    rows.into_iter()
        .map(|row| match row.into_iter().next() {
            Some(Value::String(s)) => s,
            other => panic!("expected a name, got {other:?}"),
        })
        .collect()
}

fn count(db: &TestDb, builder: &QueryBuilder, condition: Option<Condition>) -> i64 {
    let mut query = Query::table("users").select([Expression::new("COUNT(*)")]);
    query.where_clause = condition;
    match fetch(db, builder, &query).as_slice() {
        [row] => match row.as_slice() {
            [Value::Int(n)] => *n,
            other => panic!("unexpected count row {other:?}"),
        },
        other => panic!("unexpected count result {other:?}"),
    }
}

// ── SELECT ────────────────────────────────────────────────────────────

#[test]
fn test_like_matches_wildcards_literally() {
    let db = setup();
    let b = db.query_builder();

    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::like("name", ["50%"]));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["50% off"]);

    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::like("name", ["0 o"]))
        .order_by(OrderBy::asc("id"));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["500 off"]);
}

#[test]
fn test_in_between_and_nulls() {
    let db = setup();
    let b = db.query_builder();

    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::in_list("score", [10, 30, 99]))
        .order_by(OrderBy::asc("score"));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["ann", "50% off"]);

    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::between("score", 15, 35) & Condition::is_not_null("email"));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["bob"]);

    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::hash([("email", Value::Null)]));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["50% off"]);

    assert_eq!(count(&db, &b, Some(Condition::in_list("score", Vec::<i64>::new()))), 0);
    assert_eq!(count(&db, &b, Some(Condition::not_in_list("score", Vec::<i64>::new()))), 4);
}

#[test]
fn test_composite_in_expanded_form_runs() {
    let db = setup();
    let b = db.query_builder();
    let q = Query::table("users").select(["name"]).filter(Condition::in_rows(
        ["name", "score"],
        vec![
            vec![Value::from("ann"), Value::Int(10)],
            vec![Value::from("bob"), Value::Int(99)],
        ],
    ));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["ann"]);
}

#[test]
fn test_paging_and_ordering() {
    let db = setup();
    let b = db.query_builder();
    let q = Query::table("users")
        .select(["name"])
        .order_by(OrderBy::desc("score"))
        .limit(2)
        .offset(1);
    assert_eq!(names(fetch(&db, &b, &q)), vec!["50% off", "bob"]);

    let q = Query::table("users")
        .select(["name"])
        .order_by(OrderBy::asc("score"))
        .offset(3);
    assert_eq!(names(fetch(&db, &b, &q)), vec!["500 off"]);
}

#[test]
fn test_correlated_exists() {
    let db = setup();
    let b = db.query_builder();
    let inner = Query::table("users v")
        .select([Expression::new("1")])
        .filter(Condition::raw("v.score > u.score"));
    let q = Query::table("users u")
        .select(["u.name"])
        .filter(!Condition::exists(inner));
    assert_eq!(names(fetch(&db, &b, &q)), vec!["500 off"]);
}

#[test]
fn test_bare_union_runs() {
    let db = setup();
    let b = db.query_builder();
    let q = Query::table("users")
        .select(["name"])
        .filter(Condition::eq("score", 10))
        .union_all(
            Query::table("users")
                .select(["name"])
                .filter(Condition::eq("score", 20)),
        );
    let mut got = names(fetch(&db, &b, &q));
    got.sort();
    assert_eq!(got, vec!["ann", "bob"]);
}

#[test]
fn test_json_operand_is_stored_as_text() {
    let db = setup();
    let b = db.query_builder();
    let (sql, params) = b
        .update(
            "users",
            [("meta", Operand::json(json!({"level": 3})))],
            Some(&Condition::eq("name", "ann")),
        )
        .unwrap();
    assert_eq!(db.execute(&sql, &params), 1);

    let q = Query::table("users")
        .select([Expression::new("json_extract(meta, '$.level')")])
        .filter(Condition::eq("name", "ann"));
    assert_eq!(fetch(&db, &b, &q), vec![vec![Value::Int(3)]]);
}

// ── DML ───────────────────────────────────────────────────────────────

#[test]
fn test_update_and_delete() {
    let db = setup();
    let b = db.query_builder();

    let (sql, params) = b
        .update(
            "users",
            [("score", Operand::from(Expression::new("`score` + 1")))],
            Some(&Condition::lt("score", 25)),
        )
        .unwrap();
    assert_eq!(db.execute(&sql, &params), 2);
    assert_eq!(count(&db, &b, Some(Condition::in_list("score", [11, 21]))), 2);

    let (sql, params) = b
        .delete("users", Some(&Condition::not_in_list("name", ["ann", "bob"])))
        .unwrap();
    assert_eq!(db.execute(&sql, &params), 2);
    assert_eq!(count(&db, &b, None), 2);
}

#[test]
fn test_batch_insert_and_truncate() {
    let db = setup();
    let b = db.query_builder();

    let sql = b
        .batch_insert(
            "users",
            &["name", "email", "score"],
            &[
                vec![Value::from("o'neil"), Value::Null, Value::Int(5)],
                vec![Value::from("dee"), Value::from("d@z"), Value::Int(6)],
            ],
        )
        .unwrap();
    db.execute_batch(&sql);
    assert_eq!(count(&db, &b, None), 6);
    assert_eq!(count(&db, &b, Some(Condition::eq("name", "o'neil"))), 1);

    db.execute(&b.truncate_table("users"), &ParameterMap::new());
    assert_eq!(count(&db, &b, None), 0);
}

#[test]
fn test_replace_and_default_values() {
    let db = setup();
    let b = db.query_builder();

    let (sql, params) = b
        .replace("users", [("id", Operand::from(1)), ("name", Operand::from("ann2"))])
        .unwrap();
    db.execute(&sql, &params);
    let q = Query::table("users")
        .select(["name", "score"])
        .filter(Condition::eq("id", 1));
    assert_eq!(fetch(&db, &b, &q), vec![vec![Value::from("ann2"), Value::Int(0)]]);

    let create = b
        .create_table(
            "counters",
            &[
                ("id", ColumnType::Pk.into()),
                ("n", ColumnDefinition::new(ColumnType::Integer).default_value(7)),
            ],
            None,
        )
        .unwrap();
    db.execute_batch(&create);
    let empty: Vec<(&str, Value)> = Vec::new();
    let (sql, params) = b.insert("counters", empty).unwrap();
    assert_eq!(sql, "INSERT INTO `counters` DEFAULT VALUES");
    db.execute(&sql, &params);
    let q = Query::table("counters").select(["n"]);
    assert_eq!(fetch(&db, &b, &q), vec![vec![Value::Int(7)]]);
}

#[test]
fn test_insert_from_query() {
    let db = setup();
    let b = db.query_builder();
    db.execute_batch("CREATE TABLE archive (name TEXT, score INTEGER)");

    let source = Query::table("users")
        .select(["name", "score"])
        .filter(Condition::gte("score", 30));
    let (sql, params) = b.insert_from_query("archive", &["name", "score"], &source).unwrap();
    assert_eq!(db.execute(&sql, &params), 2);
}
