use anyhow::Result;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use rowscan::common::{BoxError, DataValue, Destination, ScanErrorKind};
use rowscan::cursor::Rows;
use rowscan::executor::{all, each, limit, one, Context, ContextError};

#[path = "../common/mod.rs"]
mod common;
use common::{author, post_columns, Post};

// Cursor over a live SQLite query. Column names are read from the statement
// before it starts executing.
struct SqliteRows<'stmt> {
    rows: Option<rusqlite::Rows<'stmt>>,
    names: Vec<String>,
    current: Vec<DataValue>,
    err: Option<rusqlite::Error>,
}

impl<'stmt> SqliteRows<'stmt> {
    fn new(names: Vec<String>, rows: rusqlite::Rows<'stmt>) -> Self {
        SqliteRows { rows: Some(rows), names, current: Vec::new(), err: None }
    }
}

fn to_data_value(value: ValueRef<'_>) -> DataValue {
    match value {
        ValueRef::Null => DataValue::Null,
        ValueRef::Integer(i) => DataValue::Integer(i),
        ValueRef::Real(f) => DataValue::Float(f),
        ValueRef::Text(t) => DataValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => DataValue::Blob(b.to_vec()),
    }
}

impl Rows for SqliteRows<'_> {
    fn columns(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.names.clone())
    }

    fn next(&mut self) -> bool {
        let Some(rows) = self.rows.as_mut() else {
            return false;
        };
        let width = self.names.len();
        match rows.next() {
            Ok(Some(row)) => {
                let values: rusqlite::Result<Vec<DataValue>> =
                    (0..width).map(|i| row.get_ref(i).map(to_data_value)).collect();
                match values {
                    Ok(values) => {
                        self.current = values;
                        true
                    }
                    Err(err) => {
                        self.err = Some(err);
                        false
                    }
                }
            }
            Ok(None) => false,
            Err(err) => {
                self.err = Some(err);
                false
            }
        }
    }

    fn scan(&mut self, dest: &mut [&mut dyn Destination]) -> Result<(), BoxError> {
        if dest.len() != self.current.len() {
            return Err(format!("expected {} destination arguments in scan, not {}", self.current.len(), dest.len()).into());
        }
        for (slot, value) in dest.iter_mut().zip(self.current.iter()) {
            slot.assign(value.clone())?;
        }
        Ok(())
    }

    fn err(&mut self) -> Option<BoxError> {
        self.err.take().map(Into::into)
    }

    fn close(&mut self) -> Result<(), BoxError> {
        self.rows = None;
        Ok(())
    }
}

fn create_posts(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT, authors TEXT NOT NULL);
         INSERT INTO posts (id, title, authors) VALUES
             (1, NULL, '[{\"id\": 1, \"name\": \"Jim\"}]'),
             (2, 'Post Two', '[{\"id\": 2, \"name\": \"Tim\"}]'),
             (3, 'Post Three', '[{\"id\": 1, \"name\": \"Jim\"}, {\"id\": 2, \"name\": \"Tim\"}]');",
    )?;
    Ok(())
}

// Run `sql` and hand the cursor to `f`
fn query<T>(conn: &Connection, sql: &str, f: impl FnOnce(SqliteRows<'_>) -> T) -> Result<T> {
    let mut stmt = conn.prepare(sql)?;
    let names = stmt.column_names().into_iter().map(String::from).collect();
    let rows = stmt.query([])?;
    Ok(f(SqliteRows::new(names, rows)))
}

#[test]
fn test_all_over_sqlite() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    create_posts(&conn)?;

    let posts: Vec<Post> = query(&conn, "SELECT * FROM posts ORDER BY id", |rows| all(rows, &post_columns()))??;

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0], Post { id: 1, title: "No Title".to_string(), authors: vec![author(1, "Jim")] });
    assert_eq!(posts[1].title, "Post Two");
    assert_eq!(posts[2].authors, vec![author(1, "Jim"), author(2, "Tim")]);
    Ok(())
}

#[test]
fn test_one_and_limit_over_sqlite() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    create_posts(&conn)?;

    let post: Post = query(&conn, "SELECT id, title, authors FROM posts WHERE id = 2", |rows| {
        one(rows, &post_columns())
    })??;
    assert_eq!(post.authors, vec![author(2, "Tim")]);

    let err = query(&conn, "SELECT * FROM posts", |rows| one::<Post, _, _>(rows, &post_columns()))?.unwrap_err();
    assert!(err.is_too_many_rows());

    let err = query(&conn, "SELECT * FROM posts", |rows| limit::<Post, _, _>(2, rows, &post_columns()))?.unwrap_err();
    assert!(err.is_too_many_rows());

    let err = query(&conn, "SELECT * FROM posts WHERE id > 10", |rows| one::<Post, _, _>(rows, &post_columns()))?.unwrap_err();
    assert!(err.is_no_rows());
    Ok(())
}

#[test]
fn test_aliased_and_computed_columns() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    create_posts(&conn)?;

    // `extra` has no mapping and is discarded
    let posts: Vec<Post> = query(
        &conn,
        "SELECT id * 10 AS id, upper(title) AS title, length(authors) AS extra, authors FROM posts ORDER BY id",
        |rows| all(rows, &post_columns()),
    )??;

    assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![10, 20, 30]);
    assert_eq!(posts[0].title, "No Title");
    assert_eq!(posts[1].title, "POST TWO");
    Ok(())
}

#[test]
fn test_sqlite_type_mismatch_is_scan_error() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    create_posts(&conn)?;

    let err = query(&conn, "SELECT title AS id FROM posts WHERE id = 2", |rows| {
        one::<Post, _, _>(rows, &post_columns())
    })?
    .unwrap_err();

    assert_eq!(err.kind(), Some(ScanErrorKind::Scan));
    Ok(())
}

#[test]
fn test_each_over_sqlite() -> Result<()> {
    let conn = Connection::open_in_memory()?;
    create_posts(&conn)?;

    let mut ids = Vec::new();
    query(&conn, "SELECT * FROM posts ORDER BY id DESC", |rows| {
        each(
            &Context::background(),
            |_, post: Post| -> Result<(), ContextError> {
                ids.push(post.id);
                Ok(())
            },
            rows,
            &post_columns(),
        )
    })??;

    assert_eq!(ids, vec![3, 2, 1]);
    Ok(())
}
