use rusqlite::{params, Connection, Row};

use super::{fetch_rows, RowKind};
use crate::entry::{present, Entry, Kind, NULL_STRING};
use crate::error::Result;

/// A topic within a chapter, e.g. "тіло" / "body". Each article becomes a deck.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub article_id: i64,
    pub name: String,
    pub trans: Option<String>,
    pub image_ref: Option<String>,
    pub audio_ref: Option<String>,
    pub ref_id: String,
    pub chapter_id: i64,
    pub page_number: i64,
    pub order_id: i64,
    pub audio_trans_ref: Option<String>,
    pub is_fav: bool,
    pub pron: String,
}

impl RowKind for Article {
    const KIND: Kind = Kind::Article;
    const TABLE: &'static str = "Article";
    const PREFIX: &'static str = "article";
    const ORDER_COLUMN: &'static str = "orderid";
    const COLUMNS: &'static [&'static str] = &[
        "articleid",
        "articlename",
        "articletrans",
        "articleimageref",
        "articleaudioref",
        "articlerefid",
        "chapterid",
        "articlepagenumber",
        "orderid",
        "articleaudiotranref",
        "isfav",
        "articlepron",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Article {
            article_id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            trans: present(row.get(2)?),
            image_ref: present(row.get(3)?),
            audio_ref: present(row.get(4)?),
            ref_id: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            chapter_id: row.get(6)?,
            page_number: row.get(7)?,
            order_id: row.get(8)?,
            audio_trans_ref: present(row.get(9)?),
            is_fav: row.get::<_, Option<i64>>(10)?.unwrap_or(0) != 0,
            pron: row.get::<_, Option<String>>(11)?.unwrap_or_default(),
        })
    }

    fn to_entry(&self) -> Entry {
        Entry {
            order_id: self.order_id,
            kind: Kind::Article,
            front: self.name.clone(),
            back: self.trans.clone(),
            audio: self.audio_ref.clone(),
            page_number: self.page_number,
        }
    }
}

impl Article {
    /// Articles of one chapter in storage order, minus untranslated rows.
    pub fn fetch_for_chapter(conn: &Connection, chapter_id: i64) -> Result<Vec<Article>> {
        let sql = format!(
            "{} WHERE chapterid = ?1 AND articletrans IS NOT NULL AND articletrans != ?2",
            Self::select_all()
        );
        fetch_rows(conn, &sql, params![chapter_id, NULL_STRING])
    }

    pub fn label(&self) -> &str {
        self.trans.as_deref().unwrap_or(&self.name)
    }
}
