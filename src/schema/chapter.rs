use rusqlite::Row;

use super::RowKind;
use crate::entry::{present, Entry, Kind};

/// A top-level chapter of the book, e.g. "люди" / "people".
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub chapter_id: i64,
    pub name: String,
    pub trans: Option<String>,
    pub image_ref: Option<String>,
    pub audio_ref: Option<String>,
    pub ref_id: String,
    pub page_number: i64,
    pub pron: String,
    pub audio_trans_ref: Option<String>,
    pub is_fav: bool,
    pub order_id: i64,
}

impl RowKind for Chapter {
    const KIND: Kind = Kind::Chapter;
    const TABLE: &'static str = "Chapter";
    const PREFIX: &'static str = "chapter";
    const ORDER_COLUMN: &'static str = "orderID";
    const COLUMNS: &'static [&'static str] = &[
        "chapterid",
        "chaptername",
        "chaptertrans",
        "chapterimageref",
        "chapteraudioref",
        "chapterrefid",
        "chapterpagenumber",
        "chapterpron",
        "chapteraudiotranref",
        "isfav",
        "orderID",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Chapter {
            chapter_id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            trans: present(row.get(2)?),
            image_ref: present(row.get(3)?),
            audio_ref: present(row.get(4)?),
            ref_id: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            page_number: row.get(6)?,
            pron: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            audio_trans_ref: present(row.get(8)?),
            is_fav: row.get::<_, Option<i64>>(9)?.unwrap_or(0) != 0,
            order_id: row.get(10)?,
        })
    }

    fn to_entry(&self) -> Entry {
        Entry {
            order_id: self.order_id,
            kind: Kind::Chapter,
            front: self.name.clone(),
            back: self.trans.clone(),
            audio: self.audio_ref.clone(),
            page_number: self.page_number,
        }
    }
}

impl Chapter {
    /// Name used for deck paths; falls back to the source name when the
    /// translation is missing.
    pub fn label(&self) -> &str {
        self.trans.as_deref().unwrap_or(&self.name)
    }
}
