//! Normalized vocabulary record shared by every row kind.

use std::fmt;
use std::str::FromStr;

use rusqlite::Row;

use crate::error::{Error, Result};

/// Literal the source database stores in place of an absent text field.
pub const NULL_STRING: &str = "(null)";

/// Map SQL NULL and the `(null)` literal to `None`.
pub fn present(raw: Option<String>) -> Option<String> {
    raw.filter(|s| s != NULL_STRING)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum Kind {
    Chapter,
    Article,
    Section,
    Word,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Chapter, Kind::Article, Kind::Section, Kind::Word];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Chapter => "chapter",
            Kind::Article => "article",
            Kind::Section => "section",
            Kind::Word => "word",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "chapter" => Ok(Kind::Chapter),
            "article" => Ok(Kind::Article),
            "section" => Ok(Kind::Section),
            "word" => Ok(Kind::Word),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub order_id: i64,
    pub kind: Kind,
    pub front: String,
    pub back: Option<String>,
    pub audio: Option<String>,
    pub page_number: i64,
}

impl Entry {
    /// Read a row of the normalized projection
    /// `(order_id, row_type, front, back, audio, page_number)`.
    pub fn from_row(row: &Row<'_>) -> Result<Self> {
        let row_type: String = row.get(1)?;
        Ok(Entry {
            order_id: row.get(0)?,
            kind: row_type.parse()?,
            front: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            back: present(row.get(3)?),
            audio: present(row.get(4)?),
            page_number: row.get(5)?,
        })
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}
