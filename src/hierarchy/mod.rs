//! Chapter → article deck tree, one deck per article.
//!
//! Chapters and articles carry only their first page; each one's range ends
//! where the next sibling starts. Leaf entries (sections and words) are then
//! assigned to articles by page.

pub mod range;

pub use range::{split_ranges, PageRange, UpperBound};

use indicatif::ProgressBar;
use itertools::Itertools;
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::fetch::EntryQuery;
use crate::package::{Deck, Package};
use crate::schema::{Article, Chapter, RowKind};

/// Naming and id rules for generated decks.
#[derive(Debug, Clone)]
pub struct DeckLayout {
    pub root: String,
    /// Deck ids are `base_id + article order id`.
    pub base_id: i64,
    /// Leave out the article card when the article has no recording.
    pub skip_silent_articles: bool,
}

impl DeckLayout {
    pub fn deck_id(&self, article: &Article) -> Result<i64> {
        self.base_id
            .checked_add(article.order_id)
            .ok_or(Error::DeckIdOverflow {
                base_id: self.base_id,
                order_id: article.order_id,
            })
    }

    pub fn deck_name(&self, chapter: &Chapter, article: &Article) -> String {
        format!("{}::{}::{}", self.root, chapter.label(), article.label())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub chapters: usize,
    pub duplicate_chapters: usize,
    pub empty_chapters: usize,
    pub decks: usize,
    pub notes: usize,
    pub skipped_silent: usize,
}

impl BuildStats {
    pub fn print(&self) {
        println!(
            "Built {} decks, {} notes from {} chapters ({} duplicate, {} without articles); skipped {} entries without audio.",
            self.decks,
            self.notes,
            self.chapters,
            self.duplicate_chapters,
            self.empty_chapters,
            self.skipped_silent,
        );
    }
}

/// Keep the first chapter for each translated name, in storage order.
///
/// Chapters without a translation share one key, so only the first survives.
pub fn dedup_chapters(chapters: Vec<Chapter>) -> Vec<Chapter> {
    chapters
        .into_iter()
        .unique_by(|c| c.trans.clone())
        .collect()
}

/// Walk every chapter and article, adding one deck per article to `package`.
pub fn build_decks(
    conn: &Connection,
    package: &mut Package,
    layout: &DeckLayout,
    progress: &ProgressBar,
) -> Result<BuildStats> {
    let mut stats = BuildStats::default();

    let all = Chapter::fetch_all(conn)?;
    let loaded = all.len();
    let chapters = dedup_chapters(all);
    stats.chapters = chapters.len();
    stats.duplicate_chapters = loaded - chapters.len();
    if stats.duplicate_chapters > 0 {
        info!(dropped = stats.duplicate_chapters, "dropped chapters with repeated names");
    }

    let starts: Vec<i64> = chapters.iter().map(|c| c.page_number).collect();
    let ranges = split_ranges(&starts, UpperBound::Unbounded);

    progress.set_length(chapters.len() as u64);
    for (chapter, range) in chapters.iter().zip(ranges) {
        if range.is_empty() {
            warn!(chapter = chapter.label(), %range, "chapter pages out of order, range is empty");
        }
        progress.set_message(chapter.label().to_owned());
        build_chapter(conn, package, layout, chapter, range, &mut stats)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(stats)
}

fn build_chapter(
    conn: &Connection,
    package: &mut Package,
    layout: &DeckLayout,
    chapter: &Chapter,
    range: PageRange,
    stats: &mut BuildStats,
) -> Result<()> {
    let articles = Article::fetch_for_chapter(conn, chapter.chapter_id)?;
    if articles.is_empty() {
        debug!(chapter = chapter.label(), "no articles");
        stats.empty_chapters += 1;
        return Ok(());
    }

    let starts: Vec<i64> = articles.iter().map(|a| a.page_number).collect();
    let article_ranges = split_ranges(&starts, range.last);

    for (j, (article, article_range)) in articles.iter().zip(article_ranges).enumerate() {
        let mut deck = Deck::new(layout.deck_id(article)?, layout.deck_name(chapter, article));
        debug!(deck = %deck.name, range = %article_range, "building deck");

        if j == 0 {
            add_card(package, &mut deck, &chapter.to_entry(), stats);
        }

        let article_entry = article.to_entry();
        if article_entry.has_audio() || !layout.skip_silent_articles {
            deck.add_note(package.make_note(&article_entry));
        } else {
            stats.skipped_silent += 1;
        }

        EntryQuery::leaves(article_range.window()).for_each(conn, |entry| {
            add_card(package, &mut deck, &entry, stats);
            Ok(())
        })?;

        stats.decks += 1;
        stats.notes += deck.notes.len();
        package.add_deck(deck)?;
    }
    Ok(())
}

fn add_card(package: &mut Package, deck: &mut Deck, entry: &Entry, stats: &mut BuildStats) {
    if entry.has_audio() {
        deck.add_note(package.make_note(entry));
    } else {
        stats.skipped_silent += 1;
    }
}

/// Every entry of every kind in one deck named after the root, in book order.
pub fn build_flat(conn: &Connection, package: &mut Package, layout: &DeckLayout) -> Result<BuildStats> {
    let mut stats = BuildStats::default();
    let mut deck = Deck::new(layout.base_id, layout.root.clone());

    EntryQuery::default().for_each(conn, |entry| {
        add_card(package, &mut deck, &entry, &mut stats);
        Ok(())
    })?;

    stats.decks = 1;
    stats.notes = deck.notes.len();
    package.add_deck(deck)?;
    Ok(stats)
}
