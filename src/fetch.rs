//! Unified, ordered entry stream across every enabled row kind.

use rusqlite::Connection;
use tracing::debug;

use crate::entry::{Entry, Kind};
use crate::error::Result;
use crate::schema::{kind_query, PageWindow};

/// Union of the enabled kinds' projections, ordered by `order_id`.
///
/// Each call to [`EntryQuery::for_each`] or [`EntryQuery::fetch`] runs the
/// query afresh.
#[derive(Debug, Clone)]
pub struct EntryQuery {
    kinds: Vec<Kind>,
    window: PageWindow,
}

impl Default for EntryQuery {
    fn default() -> Self {
        EntryQuery::new(&Kind::ALL, PageWindow::ALL)
    }
}

impl EntryQuery {
    pub fn new(kinds: &[Kind], window: PageWindow) -> Self {
        let mut kinds = kinds.to_vec();
        kinds.sort();
        kinds.dedup();
        EntryQuery { kinds, window }
    }

    /// Section and word entries only, the leaves under an article.
    pub fn leaves(window: PageWindow) -> Self {
        EntryQuery::new(&[Kind::Section, Kind::Word], window)
    }

    /// `None` when no kind is enabled.
    pub fn sql(&self) -> Option<String> {
        if self.kinds.is_empty() {
            return None;
        }
        let union = self
            .kinds
            .iter()
            .map(|&kind| kind_query(kind, self.window))
            .collect::<Vec<_>>()
            .join(" UNION ");
        Some(format!("{} ORDER BY order_id", union))
    }

    /// Pull rows one at a time and hand each entry to `f`.
    pub fn for_each<F>(&self, conn: &Connection, mut f: F) -> Result<usize>
    where
        F: FnMut(Entry) -> Result<()>,
    {
        let Some(sql) = self.sql() else {
            return Ok(0);
        };
        debug!(kinds = ?self.kinds, window = ?self.window, "fetching entries");

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut seen = 0;
        while let Some(row) = rows.next()? {
            f(Entry::from_row(row)?)?;
            seen += 1;
        }
        Ok(seen)
    }

    pub fn fetch(&self, conn: &Connection) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        self.for_each(conn, |entry| {
            entries.push(entry);
            Ok(())
        })?;
        Ok(entries)
    }
}
