//! `.apkg` writer: a zip holding an Anki `collection.anki2` database, a
//! `media` index and the numbered media files.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{Deck, Note, Package};
use crate::error::Result;

/// Note type with a front→back and a back→front card.
pub const MODEL_ID: i64 = 1_485_830_179;
const MODEL_NAME: &str = "Basic (and reversed card)";
const DEFAULT_DECK_ID: i64 = 1;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static SOUND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[sound:[^\]]*\]").unwrap());

const SCHEMA: &str = "
    CREATE TABLE col (
        id     INTEGER PRIMARY KEY,
        crt    INTEGER NOT NULL,
        mod    INTEGER NOT NULL,
        scm    INTEGER NOT NULL,
        ver    INTEGER NOT NULL,
        dty    INTEGER NOT NULL,
        usn    INTEGER NOT NULL,
        ls     INTEGER NOT NULL,
        conf   TEXT NOT NULL,
        models TEXT NOT NULL,
        decks  TEXT NOT NULL,
        dconf  TEXT NOT NULL,
        tags   TEXT NOT NULL
    );
    CREATE TABLE notes (
        id    INTEGER PRIMARY KEY,
        guid  TEXT NOT NULL,
        mid   INTEGER NOT NULL,
        mod   INTEGER NOT NULL,
        usn   INTEGER NOT NULL,
        tags  TEXT NOT NULL,
        flds  TEXT NOT NULL,
        sfld  INTEGER NOT NULL,
        csum  INTEGER NOT NULL,
        flags INTEGER NOT NULL,
        data  TEXT NOT NULL
    );
    CREATE TABLE cards (
        id     INTEGER PRIMARY KEY,
        nid    INTEGER NOT NULL,
        did    INTEGER NOT NULL,
        ord    INTEGER NOT NULL,
        mod    INTEGER NOT NULL,
        usn    INTEGER NOT NULL,
        type   INTEGER NOT NULL,
        queue  INTEGER NOT NULL,
        due    INTEGER NOT NULL,
        ivl    INTEGER NOT NULL,
        factor INTEGER NOT NULL,
        reps   INTEGER NOT NULL,
        lapses INTEGER NOT NULL,
        left   INTEGER NOT NULL,
        odue   INTEGER NOT NULL,
        odid   INTEGER NOT NULL,
        flags  INTEGER NOT NULL,
        data   TEXT NOT NULL
    );
    CREATE TABLE revlog (
        id      INTEGER PRIMARY KEY,
        cid     INTEGER NOT NULL,
        usn     INTEGER NOT NULL,
        ease    INTEGER NOT NULL,
        ivl     INTEGER NOT NULL,
        lastIvl INTEGER NOT NULL,
        factor  INTEGER NOT NULL,
        time    INTEGER NOT NULL,
        type    INTEGER NOT NULL
    );
    CREATE TABLE graves (
        usn  INTEGER NOT NULL,
        oid  INTEGER NOT NULL,
        type INTEGER NOT NULL
    );
    CREATE INDEX ix_notes_usn ON notes (usn);
    CREATE INDEX ix_cards_usn ON cards (usn);
    CREATE INDEX ix_revlog_usn ON revlog (usn);
    CREATE INDEX ix_cards_nid ON cards (nid);
    CREATE INDEX ix_cards_sched ON cards (did, queue, due);
    CREATE INDEX ix_revlog_cid ON revlog (cid);
    CREATE INDEX ix_notes_csum ON notes (csum);
";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub decks: usize,
    pub notes: usize,
    pub media_bundled: usize,
    pub media_missing: usize,
}

impl ArchiveSummary {
    pub fn print(&self, path: &Path) {
        println!(
            "Wrote {:?}: {} decks, {} notes, {} media files ({} missing on disk).",
            path, self.decks, self.notes, self.media_bundled, self.media_missing
        );
    }
}

/// Serialize `package` to `path`.
///
/// The archive is assembled in a temporary file beside `path` and renamed
/// into place once complete.
pub fn write_to_file(package: &Package, path: &Path) -> Result<ArchiveSummary> {
    let now = chrono::Utc::now();
    let workdir = tempfile::tempdir()?;
    let col_path = workdir.path().join("collection.anki2");

    let conn = Connection::open(&col_path)?;
    write_collection(&conn, package, now.timestamp(), now.timestamp_millis())?;
    drop(conn);
    let collection = fs::read(&col_path)?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::NamedTempFile::new_in(dir)?;

    let mut zip = ZipWriter::new(tmp);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("collection.anki2", options)?;
    zip.write_all(&collection)?;

    let mut summary = ArchiveSummary {
        decks: package.decks().len(),
        notes: package.note_count(),
        ..Default::default()
    };
    let mut index: BTreeMap<String, String> = BTreeMap::new();
    for media_path in package.media().paths() {
        let source = Path::new(media_path);
        let data = match fs::read(source) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %media_path, error = %err, "media file not found, leaving it out");
                summary.media_missing += 1;
                continue;
            }
        };
        let slot = index.len().to_string();
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| media_path.clone());
        // audio is already compressed
        zip.start_file(slot.as_str(), stored)?;
        zip.write_all(&data)?;
        index.insert(slot, file_name);
    }
    summary.media_bundled = index.len();

    zip.start_file("media", options)?;
    zip.write_all(serde_json::to_string(&index)?.as_bytes())?;

    let tmp = zip.finish()?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!(path = ?path, notes = summary.notes, media = summary.media_bundled, "archive written");
    Ok(summary)
}

fn write_collection(conn: &Connection, package: &Package, now_secs: i64, now_ms: i64) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let mut decks = serde_json::Map::new();
    decks.insert(
        DEFAULT_DECK_ID.to_string(),
        deck_json(DEFAULT_DECK_ID, "Default", now_secs),
    );
    for deck in package.decks() {
        decks.insert(deck.id.to_string(), deck_json(deck.id, &deck.name, now_secs));
    }
    let mut models = serde_json::Map::new();
    models.insert(MODEL_ID.to_string(), model_json(now_secs));

    conn.execute(
        "INSERT INTO col VALUES (1, ?1, ?2, ?3, 11, 0, 0, 0, ?4, ?5, ?6, ?7, '{}')",
        params![
            now_secs,
            now_ms,
            now_ms,
            conf_json().to_string(),
            Value::Object(models).to_string(),
            Value::Object(decks).to_string(),
            dconf_json().to_string(),
        ],
    )?;

    let tx = conn.unchecked_transaction()?;
    {
        let mut n_stmt = tx.prepare(
            "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
             VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')",
        )?;
        let mut c_stmt = tx.prepare(
            "INSERT INTO cards
             (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
        )?;

        let mut position: i64 = 0;
        let mut card_id = now_ms;
        for deck in package.decks() {
            for note in &deck.notes {
                let note_id = now_ms + position;
                let sort_field = strip_html_media(&note.front);
                n_stmt.execute(params![
                    note_id,
                    guid_for(deck, note),
                    MODEL_ID,
                    now_secs,
                    format!(" {} ", note.tags.join(" ")),
                    note.fields().join("\x1f"),
                    sort_field,
                    field_checksum(&sort_field),
                ])?;
                // a card only exists when its question side has content
                for (ord, question) in [&note.front, &note.back].into_iter().enumerate() {
                    if strip_html_media(question).is_empty() {
                        continue;
                    }
                    c_stmt.execute(params![
                        card_id,
                        note_id,
                        deck.id,
                        ord as i64,
                        now_secs,
                        position,
                    ])?;
                    card_id += 1;
                }
                position += 1;
            }
        }
        debug!(notes = position, "collection rows written");
    }
    tx.commit()?;
    Ok(())
}

/// Stable across runs so re-imports update rather than duplicate.
fn guid_for(deck: &Deck, note: &Note) -> String {
    let key = format!("{}\x1f{}\x1f{}", deck.id, note.front, note.back);
    let digest = sha1_smol::Sha1::from(key).hexdigest();
    digest[..16].to_string()
}

fn strip_html_media(field: &str) -> String {
    let without_sound = SOUND_RE.replace_all(field, "");
    TAG_RE.replace_all(&without_sound, "").trim().to_string()
}

/// First 32 bits of the SHA-1 of the sort field, as Anki computes `csum`.
fn field_checksum(field: &str) -> i64 {
    let digest = sha1_smol::Sha1::from(field).hexdigest();
    i64::from_str_radix(&digest[..8], 16).unwrap_or(0)
}

fn conf_json() -> Value {
    json!({
        "activeDecks": [DEFAULT_DECK_ID],
        "curDeck": DEFAULT_DECK_ID,
        "newSpread": 0,
        "collapseTime": 1200,
        "timeLim": 0,
        "estTimes": true,
        "dueCounts": true,
        "curModel": null,
        "nextPos": 1,
        "sortType": "noteFld",
        "sortBackwards": false,
        "addToCur": true
    })
}

fn deck_json(id: i64, name: &str, now_secs: i64) -> Value {
    json!({
        "collapsed": false,
        "conf": 1,
        "desc": "",
        "dyn": 0,
        "extendNew": 0,
        "extendRev": 50,
        "id": id,
        "lrnToday": [0, 0],
        "mod": now_secs,
        "name": name,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "timeToday": [0, 0],
        "usn": -1
    })
}

fn model_json(now_secs: i64) -> Value {
    let field = |name: &str, ord: i64| {
        json!({
            "name": name,
            "ord": ord,
            "font": "Liberation Sans",
            "media": [],
            "rtl": false,
            "size": 20,
            "sticky": false
        })
    };
    let template = |name: &str, ord: i64, question: &str, answer: &str| {
        json!({
            "name": name,
            "ord": ord,
            "qfmt": format!("{{{{{}}}}}", question),
            "afmt": format!("{{{{FrontSide}}}}\n\n<hr id=answer>\n\n{{{{{}}}}}", answer),
            "bqfmt": "",
            "bafmt": "",
            "did": null
        })
    };
    json!({
        "id": MODEL_ID,
        "name": MODEL_NAME,
        "type": 0,
        "mod": now_secs,
        "usn": -1,
        "sortf": 0,
        "did": DEFAULT_DECK_ID,
        "tags": [],
        "vers": [],
        "flds": [field("Front", 0), field("Back", 1)],
        "tmpls": [
            template("Card 1", 0, "Front", "Back"),
            template("Card 2", 1, "Back", "Front")
        ],
        "req": [[0, "any", [0]], [1, "any", [1]]],
        "css": ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n",
        "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
        "latexPost": "\\end{document}"
    })
}

fn dconf_json() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, Kind};
    use std::io::Read;

    fn entry(front: &str, back: &str, audio: &str, page: i64) -> Entry {
        Entry {
            order_id: page,
            kind: Kind::Word,
            front: front.into(),
            back: Some(back.into()),
            audio: Some(audio.into()),
            page_number: page,
        }
    }

    #[test]
    fn strip_removes_markup_and_sound() {
        assert_eq!(strip_html_media("тіло<br>[sound:a.m4a]"), "тіло");
    }

    #[test]
    fn checksum_is_first_sha1_word() {
        // sha1("") = da39a3ee...
        assert_eq!(field_checksum(""), 0xda39a3ee);
    }

    #[test]
    fn guid_is_stable_and_deck_scoped() {
        let note = Note {
            front: "a".into(),
            back: "b".into(),
            tags: vec![],
        };
        let one = Deck::new(1, "x");
        let two = Deck::new(2, "x");
        assert_eq!(guid_for(&one, &note), guid_for(&one, &note));
        assert_ne!(guid_for(&one, &note), guid_for(&two, &note));
    }

    #[test]
    fn archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let audio_dir = dir.path().join("audio");
        fs::create_dir(&audio_dir).unwrap();
        fs::write(audio_dir.join("a.m4a"), b"fake audio").unwrap();

        let mut package = Package::new(audio_dir.to_string_lossy().into_owned());
        let mut deck = Deck::new(1_001, "Root::people::body");
        deck.add_note(package.make_note(&entry("тіло", "body", "a.m4a", 12)));
        deck.add_note(package.make_note(&entry("рука", "arm", "missing.m4a", 13)));
        package.add_deck(deck).unwrap();

        let out = dir.path().join("out.apkg");
        let summary = write_to_file(&package, &out).unwrap();
        assert_eq!(summary.notes, 2);
        assert_eq!(summary.media_bundled, 1);
        assert_eq!(summary.media_missing, 1);

        let mut archive = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
        let mut media = String::new();
        archive.by_name("media").unwrap().read_to_string(&mut media).unwrap();
        let index: BTreeMap<String, String> = serde_json::from_str(&media).unwrap();
        assert_eq!(index.get("0").map(String::as_str), Some("a.m4a"));

        let mut bundled = Vec::new();
        archive.by_name("0").unwrap().read_to_end(&mut bundled).unwrap();
        assert_eq!(bundled, b"fake audio");

        let mut collection = Vec::new();
        archive
            .by_name("collection.anki2")
            .unwrap()
            .read_to_end(&mut collection)
            .unwrap();
        let col_path = dir.path().join("check.anki2");
        fs::write(&col_path, collection).unwrap();
        let conn = Connection::open(&col_path).unwrap();

        let notes: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get(0)).unwrap();
        let cards: i64 = conn
            .query_row("SELECT COUNT(*) FROM cards WHERE did = 1001", [], |r| r.get(0))
            .unwrap();
        assert_eq!(notes, 2);
        assert_eq!(cards, 4);

        let (flds, tags): (String, String) = conn
            .query_row("SELECT flds, tags FROM notes ORDER BY id LIMIT 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(flds, "тіло<br>[sound:a.m4a]\x1fbody");
        assert_eq!(tags, " page:12 ");

        let decks: String = conn.query_row("SELECT decks FROM col", [], |r| r.get(0)).unwrap();
        let decks: Value = serde_json::from_str(&decks).unwrap();
        assert_eq!(decks["1001"]["name"], "Root::people::body");
    }

    #[test]
    fn untranslated_note_gets_no_reverse_card() {
        let dir = tempfile::tempdir().unwrap();
        let mut package = Package::new("audio");
        let mut deck = Deck::new(7, "Root");
        let untranslated = Entry {
            back: None,
            ..entry("слово", "", "w.m4a", 3)
        };
        deck.add_note(package.make_note(&untranslated));
        package.add_deck(deck).unwrap();

        let out = dir.path().join("one.apkg");
        write_to_file(&package, &out).unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
        let mut collection = Vec::new();
        archive
            .by_name("collection.anki2")
            .unwrap()
            .read_to_end(&mut collection)
            .unwrap();
        let col_path = dir.path().join("one.anki2");
        fs::write(&col_path, collection).unwrap();
        let conn = Connection::open(&col_path).unwrap();

        let mut stmt = conn.prepare("SELECT ord FROM cards").unwrap();
        let ords: Vec<i64> = stmt
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(ords, vec![0]);
    }

    #[test]
    fn empty_package_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.apkg");
        let summary = write_to_file(&Package::new("audio"), &out).unwrap();
        assert_eq!(summary, ArchiveSummary::default());
        assert!(out.exists());
    }
}
