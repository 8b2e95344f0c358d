//! In-memory package: decks of notes plus the media they reference.

pub mod apkg;
pub mod note;

pub use note::Note;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::entry::Entry;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub notes: Vec<Note>,
}

impl Deck {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Deck {
            id,
            name: name.into(),
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }
}

/// Deduplicated media paths in first-registration order.
#[derive(Debug, Default, Clone)]
pub struct MediaLedger {
    paths: Vec<String>,
    seen: HashSet<String>,
}

impl MediaLedger {
    /// Returns `false` if the path was already registered.
    pub fn register(&mut self, path: String) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug)]
pub struct Package {
    audio_dir: String,
    decks: Vec<Deck>,
    deck_ids: HashMap<i64, usize>,
    media: MediaLedger,
}

impl Package {
    pub fn new(audio_dir: impl Into<String>) -> Self {
        Package {
            audio_dir: audio_dir.into(),
            decks: Vec::new(),
            deck_ids: HashMap::new(),
            media: MediaLedger::default(),
        }
    }

    /// Build the note for `entry`, registering its audio file when present.
    ///
    /// Callers decide beforehand whether a silent entry gets a card at all.
    pub fn make_note(&mut self, entry: &Entry) -> Note {
        if let Some(audio) = &entry.audio {
            let path = format!("{}/{}", self.audio_dir, audio);
            if !self.media.register(path) {
                debug!(audio = %audio, "media already registered");
            }
        }
        Note::from_entry(entry)
    }

    pub fn add_deck(&mut self, deck: Deck) -> Result<()> {
        if let Some(&idx) = self.deck_ids.get(&deck.id) {
            return Err(Error::DuplicateDeck {
                id: deck.id,
                existing: self.decks[idx].name.clone(),
                name: deck.name,
            });
        }
        self.deck_ids.insert(deck.id, self.decks.len());
        self.decks.push(deck);
        Ok(())
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn media(&self) -> &MediaLedger {
        &self.media
    }

    pub fn note_count(&self) -> usize {
        self.decks.iter().map(|d| d.notes.len()).sum()
    }
}
