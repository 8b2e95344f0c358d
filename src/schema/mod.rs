//! Row-kind adapters: one table per kind, each mapped onto [`Entry`].

pub mod article;
pub mod chapter;
pub mod section;
pub mod word;

pub use article::Article;
pub use chapter::Chapter;
pub use section::Section;
pub use word::Word;

use rusqlite::{Connection, Row};

use crate::entry::{Entry, Kind};
use crate::error::Result;

/// Inclusive page filter; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PageWindow {
    pub const ALL: PageWindow = PageWindow { min: None, max: None };

    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        PageWindow { min, max }
    }

    pub fn between(min: i64, max: i64) -> Self {
        PageWindow {
            min: Some(min),
            max: Some(max),
        }
    }

    /// SQL predicate over `column`, or `None` when neither bound is set.
    pub fn clause(&self, column: &str) -> Option<String> {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => Some(format!("{} BETWEEN {} AND {}", column, lo, hi)),
            (Some(lo), None) => Some(format!("{} >= {}", column, lo)),
            (None, Some(hi)) => Some(format!("{} <= {}", column, hi)),
            (None, None) => None,
        }
    }
}

/// A source table whose rows convert one-to-one into entries.
///
/// Columns follow the `<prefix><field>` convention except for the ordering
/// column, whose name and casing differ between tables.
pub trait RowKind: Sized {
    const KIND: Kind;
    const TABLE: &'static str;
    const PREFIX: &'static str;
    const ORDER_COLUMN: &'static str;
    /// Every native column, in the order `from_row` reads them.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn to_entry(&self) -> Entry;

    fn page_column() -> String {
        format!("{}pagenumber", Self::PREFIX)
    }

    /// Normalized projection `(order_id, row_type, front, back, audio, page_number)`.
    fn entry_query() -> String {
        let p = Self::PREFIX;
        format!(
            "SELECT {order} AS order_id, '{kind}' AS row_type, {p}name AS front, \
             {p}trans AS back, {p}audioref AS audio, {p}pagenumber AS page_number \
             FROM {table}",
            order = Self::ORDER_COLUMN,
            kind = Self::KIND,
            p = p,
            table = Self::TABLE,
        )
    }

    fn page_clause(window: PageWindow) -> Option<String> {
        window.clause(&Self::page_column())
    }

    fn select_all() -> String {
        format!("SELECT {} FROM {}", Self::COLUMNS.join(", "), Self::TABLE)
    }

    /// Full-fidelity rows in storage order.
    fn fetch_all(conn: &Connection) -> Result<Vec<Self>> {
        fetch_rows(conn, &Self::select_all(), [])
    }
}

pub(crate) fn fetch_rows<T: RowKind, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| T::from_row(row))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Projection for a kind with the page filter applied.
pub fn kind_query(kind: Kind, window: PageWindow) -> String {
    let (base, clause) = match kind {
        Kind::Chapter => (Chapter::entry_query(), Chapter::page_clause(window)),
        Kind::Article => (Article::entry_query(), Article::page_clause(window)),
        Kind::Section => (Section::entry_query(), Section::page_clause(window)),
        Kind::Word => (Word::entry_query(), Word::page_clause(window)),
    };
    match clause {
        Some(c) => format!("{} WHERE {}", base, c),
        None => base,
    }
}

/// Table backing a kind, for ad-hoc inspection.
pub fn table_for(kind: Kind) -> &'static str {
    match kind {
        Kind::Chapter => Chapter::TABLE,
        Kind::Article => Article::TABLE,
        Kind::Section => Section::TABLE,
        Kind::Word => Word::TABLE,
    }
}
