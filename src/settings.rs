use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::hierarchy::DeckLayout;

const ENV_PREFIX: &str = "VOCAB";
const DEFAULT_FILE: &str = "vocab_deck";

/// Run settings: `vocab_deck.toml` (optional) overlaid by `VOCAB_*` variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    pub audio_dir: String,
    pub deck_id: i64,
    pub deck_name: String,
    pub output_file: PathBuf,
    pub skip_silent_articles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("db.sqlite3"),
            audio_dir: "audio".to_string(),
            deck_id: 1_892_930_485,
            deck_name: "Ukrainian Visual Dictionary".to_string(),
            output_file: PathBuf::from("output.apkg"),
            skip_silent_articles: true,
        }
    }
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Settings> {
        let builder = Config::builder();
        let builder = match file {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
        };
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn layout(&self) -> DeckLayout {
        DeckLayout {
            root: self.deck_name.clone(),
            base_id: self.deck_id,
            skip_silent_articles: self.skip_silent_articles,
        }
    }
}
