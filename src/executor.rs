use std::fmt;

use tracing::debug;

use crate::ast::{Statement, StatementKind};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::parser::Parser;
use crate::row_store::Row;
use crate::tokenizer::Tokenizer;

/// Statement prefixes, in the order they are tried.
const PREFIXES: [(&str, StatementKind); 5] = [
    ("CREATE TABLE", StatementKind::CreateTable),
    ("INSERT INTO", StatementKind::Insert),
    ("SELECT", StatementKind::Select),
    ("DELETE FROM", StatementKind::Delete),
    ("SHOW TABLES", StatementKind::ShowTables),
];

/// Represents the result of a successful `SELECT` query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The actual data, returned as a vector of rows, where each row is a vector of [crate::Value].
    pub rows: Vec<Row>,
}

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Created(String),
    Inserted,
    Rows(QueryResult),
    Deleted(usize),
    Tables(Vec<String>),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(name) => write!(f, "Table '{name}' created successfully"),
            Self::Inserted => f.write_str("Row inserted successfully"),
            Self::Rows(result) => {
                writeln!(f, "{}", result.columns.join("\t"))?;
                for row in &result.rows {
                    let fields: Vec<String> = row.iter().map(ToString::to_string).collect();
                    writeln!(f, "{}", fields.join("\t"))?;
                }
                write!(f, "\n{} rows returned", result.rows.len())
            }
            Self::Deleted(0) => f.write_str("No rows matched the condition"),
            Self::Deleted(_) => f.write_str("Rows deleted successfully"),
            Self::Tables(names) if names.is_empty() => f.write_str("No tables"),
            Self::Tables(names) => f.write_str(&names.join("\n")),
        }
    }
}

/// Picks the statement kind from the start of `sql`, ignoring case.
///
/// ```
/// # use tabula::executor::classify;
/// # use tabula::ast::StatementKind;
/// assert_eq!(classify("select * from t"), Some(StatementKind::Select));
/// assert_eq!(classify("UPDATE t SET x = 1"), None);
/// ```
pub fn classify(sql: &str) -> Option<StatementKind> {
    let upper = sql.trim_start().to_uppercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

/// Runs one statement against `db` and renders the outcome as text.
///
/// Failures never escape: they come back as a single `Error: ...` line.
///
/// # Example
/// ```
/// use tabula::{Database, executor::execute};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut db = Database::new("demo", dir.path()).unwrap();
///
/// execute(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)");
/// execute(&mut db, "INSERT INTO t VALUES (1, 'Ann')");
///
/// let out = execute(&mut db, "SELECT * FROM t WHERE id = 1");
/// assert_eq!(out, "id\tname\n1\tAnn\n\n1 rows returned");
/// ```
pub fn execute(db: &mut Database, sql: &str) -> String {
    match try_execute(db, sql) {
        Ok(output) => output.to_string(),
        Err(Error::Constraint(violation)) => format!("Error: Failed to insert row: {violation}"),
        Err(err) => format!("Error: {err}"),
    }
}

/// Runs one statement against `db`.
///
/// # Errors
/// - [Error::Unsupported] if the statement is none of the supported kinds;
///   nothing is parsed or changed then.
/// - [Error::Syntax] if the statement does not follow its grammar.
/// - any error of the [Database] or [crate::Table] operation it runs.
pub fn try_execute(db: &mut Database, sql: &str) -> Result<Output> {
    let kind = classify(sql).ok_or(Error::Unsupported)?;
    debug!(?kind, sql, "executing statement");

    let tokens = Tokenizer::new(sql)
        .tokenize()
        .map_err(|reason| Error::Syntax {
            statement: kind.label(),
            reason,
        })?;
    let statement = Parser::new(tokens).parse_as(kind)?;
    run(db, statement)
}

/// Applies an already parsed statement to `db`.
pub fn run(db: &mut Database, statement: Statement) -> Result<Output> {
    match statement {
        Statement::CreateTable(create) => {
            db.create_table(create.name.clone(), create.columns)?;
            Ok(Output::Created(create.name))
        }
        Statement::InsertInto(insert) => {
            let table = db
                .get_table_mut(&insert.table)
                .ok_or_else(|| Error::TableNotFound(insert.table.clone()))?;
            table.insert_row(insert.values)?;
            Ok(Output::Inserted)
        }
        Statement::Select(select) => {
            let table = db
                .get_table(&select.table)
                .ok_or_else(|| Error::TableNotFound(select.table.clone()))?;
            let rows = match &select.where_clause {
                Some(filter) => table.select_where(&filter.column, &filter.value)?,
                None => table.select_all(),
            };
            Ok(Output::Rows(QueryResult {
                columns: table.columns().iter().map(|col| col.name.clone()).collect(),
                rows,
            }))
        }
        Statement::Delete(delete) => {
            let table = db
                .get_table_mut(&delete.table)
                .ok_or_else(|| Error::TableNotFound(delete.table.clone()))?;
            let filter = &delete.where_clause;
            Ok(Output::Deleted(table.delete_where(&filter.column, &filter.value)?))
        }
        Statement::ShowTables => {
            let mut names: Vec<String> = db.list_tables().into_iter().map(String::from).collect();
            names.sort();
            Ok(Output::Tables(names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn temp_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new("test", dir.path()).unwrap();
        (dir, db)
    }

    fn users_db() -> (tempfile::TempDir, Database) {
        let (dir, mut db) = temp_db();
        assert_eq!(
            execute(&mut db, "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT NOT NULL)"),
            "Table 't' created successfully"
        );
        (dir, db)
    }

    #[test]
    fn test_end_to_end() {
        let (_dir, mut db) = users_db();

        assert_eq!(
            execute(&mut db, "INSERT INTO t VALUES (1, 'Ann')"),
            "Row inserted successfully"
        );
        let out = execute(&mut db, "SELECT * FROM t WHERE id = 1");

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id\tname");
        assert_eq!(lines[1], "1\tAnn");
        assert_eq!(lines.last(), Some(&"1 rows returned"));
    }

    #[test]
    fn test_unsupported_statement_changes_nothing() {
        let (_dir, mut db) = users_db();
        execute(&mut db, "INSERT INTO t VALUES (1, 'Ann')");

        assert_eq!(
            execute(&mut db, "UPDATE t SET x=1"),
            "Error: Unsupported query type"
        );
        assert!(matches!(try_execute(&mut db, "DROP TABLE t"), Err(Error::Unsupported)));
        assert_eq!(
            db.get_table("t").unwrap().select_all(),
            vec![vec![Value::Integer(1), Value::from("Ann")]]
        );
    }

    #[test]
    fn test_classify_priority_and_case() {
        assert_eq!(classify("create table x (a int)"), Some(StatementKind::CreateTable));
        assert_eq!(classify("  Insert Into x values (1)"), Some(StatementKind::Insert));
        assert_eq!(classify("DELETE FROM x WHERE a = 1"), Some(StatementKind::Delete));
        assert_eq!(classify("show tables"), Some(StatementKind::ShowTables));
        assert_eq!(classify("CREATE INDEX i ON x (a)"), None);
        assert_eq!(classify("DELETE x"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_syntax_errors_are_labelled() {
        let (_dir, mut db) = users_db();

        assert!(execute(&mut db, "CREATE TABLE broken (").starts_with("Error: Invalid CREATE TABLE syntax"));
        assert!(execute(&mut db, "INSERT INTO t (1, 'a')").starts_with("Error: Invalid INSERT syntax"));
        assert!(execute(&mut db, "SELECT * FROM t WHERE id > 1").starts_with("Error: Invalid SELECT syntax"));
        assert!(execute(&mut db, "DELETE FROM t").starts_with("Error: Invalid DELETE syntax"));
        assert!(execute(&mut db, "SHOW TABLES now").starts_with("Error: Invalid SHOW TABLES syntax"));
        assert!(execute(&mut db, "INSERT INTO t VALUES ('oops)").starts_with("Error: Invalid INSERT syntax"));
    }

    #[test]
    fn test_missing_table() {
        let (_dir, mut db) = temp_db();

        assert_eq!(
            execute(&mut db, "INSERT INTO ghost VALUES (1)"),
            "Error: Table 'ghost' not found"
        );
        assert_eq!(
            execute(&mut db, "SELECT * FROM ghost"),
            "Error: Table 'ghost' not found"
        );
        assert_eq!(
            execute(&mut db, "DELETE FROM ghost WHERE id = 1"),
            "Error: Table 'ghost' not found"
        );
    }

    #[test]
    fn test_duplicate_create() {
        let (_dir, mut db) = users_db();

        assert_eq!(
            execute(&mut db, "CREATE TABLE t (x INTEGER)"),
            "Error: Table 't' already exists"
        );
    }

    #[test]
    fn test_insert_failures_name_their_reason() {
        let (_dir, mut db) = users_db();

        assert_eq!(
            execute(&mut db, "INSERT INTO t VALUES (1)"),
            "Error: Failed to insert row: expected 2 values, got 1"
        );
        assert_eq!(
            execute(&mut db, "INSERT INTO t VALUES (1, '')"),
            "Error: Failed to insert row: column 'name' cannot be null"
        );
        assert_eq!(
            execute(&mut db, "INSERT INTO t VALUES (1, NULL)"),
            "Error: Failed to insert row: column 'name' cannot be null"
        );
        assert_eq!(db.get_table("t").unwrap().row_count(), 0);
    }

    #[test]
    fn test_select_all_rendering() {
        let (_dir, mut db) = temp_db();
        execute(&mut db, "CREATE TABLE m (id INTEGER AUTO_INCREMENT, score REAL, ok BOOLEAN, note TEXT)");
        execute(&mut db, "INSERT INTO m VALUES (0, 2, true, NULL)");
        execute(&mut db, "INSERT INTO m VALUES (0, 1.5, FALSE, \"hi there\")");

        assert_eq!(
            execute(&mut db, "SELECT id, score FROM m"),
            "id\tscore\tok\tnote\n1\t2\ttrue\tNULL\n2\t1.5\tfalse\thi there\n\n2 rows returned"
        );
    }

    #[test]
    fn test_select_empty_result() {
        let (_dir, mut db) = users_db();

        assert_eq!(
            execute(&mut db, "SELECT * FROM t WHERE name = 'nobody'"),
            "id\tname\n\n0 rows returned"
        );
        assert_eq!(
            execute(&mut db, "SELECT * FROM t WHERE email = 'x'"),
            "Error: Column 'email' not found"
        );
    }

    #[test]
    fn test_delete_flow() {
        let (_dir, mut db) = users_db();
        for (id, name) in [(1, "Ann"), (2, "Bob"), (3, "Ann"), (4, "Cid")] {
            execute(&mut db, &format!("INSERT INTO t VALUES ({id}, '{name}')"));
        }

        assert_eq!(
            execute(&mut db, "DELETE FROM t WHERE name = 'Ann'"),
            "Rows deleted successfully"
        );
        assert_eq!(
            execute(&mut db, "DELETE FROM t WHERE name = 'Ann'"),
            "No rows matched the condition"
        );
        assert!(matches!(
            try_execute(&mut db, "DELETE FROM t WHERE id = 2"),
            Ok(Output::Deleted(1))
        ));

        // the primary-key index still finds the row that moved
        assert_eq!(
            execute(&mut db, "SELECT * FROM t WHERE id = 4"),
            "id\tname\n4\tCid\n\n1 rows returned"
        );
        assert_eq!(
            execute(&mut db, "SELECT * FROM t"),
            "id\tname\n4\tCid\n\n1 rows returned"
        );
    }

    #[test]
    fn test_show_tables() {
        let (_dir, mut db) = temp_db();
        assert_eq!(execute(&mut db, "SHOW TABLES"), "No tables");

        execute(&mut db, "CREATE TABLE zeta (a INTEGER)");
        execute(&mut db, "CREATE TABLE alpha (a INTEGER)");

        assert_eq!(execute(&mut db, "show tables;"), "alpha\nzeta");
        assert!(matches!(
            try_execute(&mut db, "SHOW TABLES"),
            Ok(Output::Tables(names)) if names == ["alpha", "zeta"]
        ));
    }

    #[test]
    fn test_typed_where_literals() {
        let (_dir, mut db) = temp_db();
        execute(&mut db, "CREATE TABLE p (price REAL, label TEXT)");
        execute(&mut db, "INSERT INTO p VALUES (10.0, '10')");

        // 10 is an integer literal and does not match the real 10.0
        assert!(execute(&mut db, "SELECT * FROM p WHERE price = 10").ends_with("0 rows returned"));
        assert!(execute(&mut db, "SELECT * FROM p WHERE price = 10.0").ends_with("1 rows returned"));
        assert!(execute(&mut db, "SELECT * FROM p WHERE label = '10'").ends_with("1 rows returned"));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let (_dir, mut db) = temp_db();
        execute(&mut db, "CREATE TABLE z (x REAL PRIMARY KEY)");
        execute(&mut db, "INSERT INTO z VALUES (-0.0)");

        assert!(execute(&mut db, "SELECT * FROM z WHERE x = 0.0").ends_with("1 rows returned"));
        assert_eq!(
            execute(&mut db, "DELETE FROM z WHERE x = 0.0"),
            "Rows deleted successfully"
        );
    }

    #[test]
    fn test_wide_integer_literal_still_saves() {
        let (dir, mut db) = temp_db();
        execute(&mut db, "CREATE TABLE t (id INTEGER, name TEXT)");

        assert_eq!(
            execute(&mut db, "INSERT INTO t VALUES (3000000000, 'x')"),
            "Row inserted successfully"
        );
        execute(&mut db, "INSERT INTO t VALUES (-2147483648, 'y')");
        db.save_to_file().unwrap();

        let db = Database::open("test", dir.path()).unwrap();
        assert_eq!(
            db.get_table("t").unwrap().select_all(),
            vec![
                vec![Value::from("3000000000"), Value::from("x")],
                vec![Value::Integer(-2147483648), Value::from("y")],
            ]
        );
    }
}
