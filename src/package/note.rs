use crate::entry::Entry;

/// One two-sided card as it will be stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
}

impl Note {
    pub fn from_entry(entry: &Entry) -> Self {
        let front = match &entry.audio {
            Some(audio) => format!("{}{}", entry.front, sound_marker(audio)),
            None => entry.front.clone(),
        };
        Note {
            front,
            back: entry.back.clone().unwrap_or_default(),
            tags: vec![page_tag(entry.page_number)],
        }
    }

    pub fn fields(&self) -> [&str; 2] {
        [&self.front, &self.back]
    }
}

/// Marker the study app replaces with a play button.
pub fn sound_marker(audio: &str) -> String {
    format!("<br>[sound:{}]", audio)
}

pub fn page_tag(page: i64) -> String {
    format!("page:{}", page)
}
