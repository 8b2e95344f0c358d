//! Read-only access to the dictionary database.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::{Map, Value};

use crate::entry::Kind;
use crate::schema::table_for;

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("Failed to open {:?}", path))?;
    Ok(conn)
}

/// First row of a kind's table as column → value, for eyeballing the schema.
pub fn describe_table(conn: &Connection, kind: Kind) -> Result<Option<Map<String, Value>>> {
    let sql = format!("SELECT * FROM {} LIMIT 1", table_for(kind));
    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let mut rows = stmt.query([])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };

    let mut out = Map::new();
    for (i, name) in names.into_iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(n) => Value::from(n),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::from(format!("<{} bytes>", b.len())),
        };
        out.insert(name, value);
    }
    Ok(Some(out))
}
