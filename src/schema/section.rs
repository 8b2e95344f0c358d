use rusqlite::Row;

use super::RowKind;
use crate::entry::{present, Entry, Kind};

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub section_id: i64,
    pub name: String,
    pub trans: Option<String>,
    pub image_ref: Option<String>,
    pub audio_ref: Option<String>,
    pub ref_id: String,
    pub page_number: i64,
    pub pron: String,
    pub audio_trans_ref: Option<String>,
    pub article_id: i64,
    pub is_fav: bool,
    pub order_id: i64,
}

impl RowKind for Section {
    const KIND: Kind = Kind::Section;
    const TABLE: &'static str = "Section";
    const PREFIX: &'static str = "section";
    const ORDER_COLUMN: &'static str = "orderid";
    const COLUMNS: &'static [&'static str] = &[
        "sectionid",
        "sectionname",
        "sectiontrans",
        "sectionimageref",
        "sectionaudioref",
        "sectionrefid",
        "sectionpagenumber",
        "sectionpron",
        "sectionaudiotransref",
        "articleid",
        "isfav",
        "orderid",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Section {
            section_id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            trans: present(row.get(2)?),
            image_ref: present(row.get(3)?),
            audio_ref: present(row.get(4)?),
            ref_id: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            page_number: row.get(6)?,
            pron: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            audio_trans_ref: present(row.get(8)?),
            article_id: row.get(9)?,
            is_fav: row.get::<_, Option<i64>>(10)?.unwrap_or(0) != 0,
            order_id: row.get(11)?,
        })
    }

    fn to_entry(&self) -> Entry {
        Entry {
            order_id: self.order_id,
            kind: Kind::Section,
            front: self.name.clone(),
            back: self.trans.clone(),
            audio: self.audio_ref.clone(),
            page_number: self.page_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn loads_section_with_parent_article() {
        let conn = testutil::memory_db();
        testutil::insert_section(&conn, 1, 2, 55, "кисть", "hand", "(null)", 14);
        let sections = Section::fetch_all(&conn).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].article_id, 2);
        assert_eq!(sections[0].audio_ref, None);
        assert_eq!(sections[0].to_entry().back.as_deref(), Some("hand"));
    }
}
