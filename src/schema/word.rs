use rusqlite::Row;

use super::RowKind;
use crate::entry::{present, Entry, Kind};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub word_id: i64,
    pub annotation_id: i64,
    pub name: String,
    pub trans: Option<String>,
    pub image_ref: Option<String>,
    pub audio_ref: Option<String>,
    pub ref_id: String,
    pub page_number: i64,
    pub pron: String,
    pub audio_trans_ref: Option<String>,
    pub is_article: bool,
    pub is_fav: bool,
    pub order_id: i64,
    /// Parent row this word is listed under.
    pub parent_ref: i64,
}

impl RowKind for Word {
    const KIND: Kind = Kind::Word;
    const TABLE: &'static str = "Word";
    const PREFIX: &'static str = "word";
    const ORDER_COLUMN: &'static str = "orderid";
    const COLUMNS: &'static [&'static str] = &[
        "wordid",
        "annotationid",
        "wordname",
        "wordtrans",
        "wordimageref",
        "wordaudioref",
        "wordrefid",
        "wordpagenumber",
        "wordpron",
        "wordaudiotransref",
        "isarticle",
        "isfav",
        "orderid",
        "refid",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Word {
            word_id: row.get(0)?,
            annotation_id: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
            name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            trans: present(row.get(3)?),
            image_ref: present(row.get(4)?),
            audio_ref: present(row.get(5)?),
            ref_id: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            page_number: row.get(7)?,
            pron: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            audio_trans_ref: present(row.get(9)?),
            is_article: row.get::<_, Option<i64>>(10)?.unwrap_or(0) != 0,
            is_fav: row.get::<_, Option<i64>>(11)?.unwrap_or(0) != 0,
            order_id: row.get(12)?,
            parent_ref: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
        })
    }

    fn to_entry(&self) -> Entry {
        Entry {
            order_id: self.order_id,
            kind: Kind::Word,
            front: self.name.clone(),
            back: self.trans.clone(),
            audio: self.audio_ref.clone(),
            page_number: self.page_number,
        }
    }
}
