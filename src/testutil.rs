//! In-memory dictionary database for tests.

use rusqlite::{params, Connection};

pub fn memory_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        CREATE TABLE Chapter (
            chapterid           INTEGER PRIMARY KEY,
            chaptername         TEXT,
            chaptertrans        TEXT,
            chapterimageref     TEXT,
            chapteraudioref     TEXT,
            chapterrefid        TEXT,
            chapterpagenumber   INTEGER,
            chapterpron         TEXT,
            chapteraudiotranref TEXT,
            isfav               INTEGER,
            orderID             INTEGER
        );
        CREATE TABLE Article (
            articleid           INTEGER PRIMARY KEY,
            articlename         TEXT,
            articletrans        TEXT,
            articleimageref     TEXT,
            articleaudioref     TEXT,
            articlerefid        TEXT,
            chapterid           INTEGER,
            articlepagenumber   INTEGER,
            orderid             INTEGER,
            articleaudiotranref TEXT,
            isfav               INTEGER,
            articlepron         TEXT
        );
        CREATE TABLE section (
            sectionid            INTEGER PRIMARY KEY,
            sectionname          TEXT,
            sectiontrans         TEXT,
            sectionimageref      TEXT,
            sectionaudioref      TEXT,
            sectionrefid         TEXT,
            sectionpagenumber    INTEGER,
            sectionpron          TEXT,
            sectionaudiotransref TEXT,
            articleid            INTEGER,
            isfav                INTEGER,
            orderid              INTEGER
        );
        CREATE TABLE Word (
            wordid            INTEGER PRIMARY KEY,
            annotationid      INTEGER,
            wordname          TEXT,
            wordtrans         TEXT,
            wordimageref      TEXT,
            wordaudioref      TEXT,
            wordrefid         TEXT,
            wordpagenumber    INTEGER,
            wordpron          TEXT,
            wordaudiotransref TEXT,
            isarticle         INTEGER,
            isfav             INTEGER,
            orderid           INTEGER,
            refid             INTEGER
        );
        ",
    )
    .unwrap();
    conn
}

pub struct ChapterSeed<'a> {
    pub chapter_id: i64,
    pub order_id: i64,
    pub name: &'a str,
    pub trans: &'a str,
    pub audio: &'a str,
    pub page: i64,
    pub image_ref: &'a str,
}

impl<'a> ChapterSeed<'a> {
    pub fn new(
        chapter_id: i64,
        order_id: i64,
        name: &'a str,
        trans: &'a str,
        audio: &'a str,
        page: i64,
    ) -> Self {
        ChapterSeed {
            chapter_id,
            order_id,
            name,
            trans,
            audio,
            page,
            image_ref: "(null)",
        }
    }
}

pub fn insert_chapter(conn: &Connection, c: &ChapterSeed<'_>) {
    conn.execute(
        "INSERT INTO Chapter VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '', ?8, 0, ?9)",
        params![
            c.chapter_id,
            c.name,
            c.trans,
            c.image_ref,
            c.audio,
            format!("REF_CH_{}", c.chapter_id),
            c.page,
            format!("{}.en", c.audio),
            c.order_id,
        ],
    )
    .unwrap();
}

pub struct ArticleSeed<'a> {
    pub article_id: i64,
    pub chapter_id: i64,
    pub order_id: i64,
    pub name: &'a str,
    pub trans: &'a str,
    pub audio: &'a str,
    pub page: i64,
}

impl<'a> ArticleSeed<'a> {
    pub fn new(
        article_id: i64,
        chapter_id: i64,
        order_id: i64,
        name: &'a str,
        trans: &'a str,
        audio: &'a str,
        page: i64,
    ) -> Self {
        ArticleSeed {
            article_id,
            chapter_id,
            order_id,
            name,
            trans,
            audio,
            page,
        }
    }
}

pub fn insert_article(conn: &Connection, a: &ArticleSeed<'_>) {
    conn.execute(
        "INSERT INTO Article VALUES (?1, ?2, ?3, '(null)', ?4, ?5, ?6, ?7, ?8, ?9, 0, '')",
        params![
            a.article_id,
            a.name,
            a.trans,
            a.audio,
            format!("REF_AR_{}", a.article_id),
            a.chapter_id,
            a.page,
            a.order_id,
            format!("{}.en", a.audio),
        ],
    )
    .unwrap();
}

#[allow(clippy::too_many_arguments)]
pub fn insert_section(
    conn: &Connection,
    section_id: i64,
    article_id: i64,
    order_id: i64,
    name: &str,
    trans: &str,
    audio: &str,
    page: i64,
) {
    conn.execute(
        "INSERT INTO section VALUES (?1, ?2, ?3, '(null)', ?4, ?5, ?6, '', ?7, ?8, 0, ?9)",
        params![
            section_id,
            name,
            trans,
            audio,
            format!("REF_SE_{}", section_id),
            page,
            format!("{}.en", audio),
            article_id,
            order_id,
        ],
    )
    .unwrap();
}

pub fn insert_word(
    conn: &Connection,
    word_id: i64,
    order_id: i64,
    name: &str,
    trans: &str,
    audio: &str,
    page: i64,
) {
    conn.execute(
        "INSERT INTO Word VALUES (?1, 0, ?2, ?3, '', ?4, ?5, ?6, '', ?7, 1, 0, ?8, 1)",
        params![
            word_id,
            name,
            trans,
            audio,
            format!("REF_WO_{}", word_id),
            page,
            format!("{}.en", audio),
            order_id,
        ],
    )
    .unwrap();
}
