//! Error types for deck building.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A projection produced a `row_type` literal outside the four known kinds.
    #[error("unknown row kind {0:?}")]
    UnknownKind(String),

    #[error("deck id overflow: base {base_id} + article order {order_id}")]
    DeckIdOverflow { base_id: i64, order_id: i64 },

    #[error("deck id {id} already used by {existing:?}, cannot reuse for {name:?}")]
    DuplicateDeck {
        id: i64,
        existing: String,
        name: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
