use std::fmt;

use crate::schema::PageWindow;

/// Upper end of a page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    Page(i64),
    /// Runs to the end of the book.
    Unbounded,
}

/// Contiguous, inclusive run of pages owned by a chapter or an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub first: i64,
    pub last: UpperBound,
}

impl PageRange {
    pub fn new(first: i64, last: UpperBound) -> Self {
        PageRange { first, last }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.last, UpperBound::Page(last) if last < self.first)
    }

    pub fn window(&self) -> PageWindow {
        let max = match self.last {
            UpperBound::Page(last) => Some(last),
            UpperBound::Unbounded => None,
        };
        PageWindow::new(Some(self.first), max)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            UpperBound::Page(last) => write!(f, "[{}, {}]", self.first, last),
            UpperBound::Unbounded => write!(f, "[{}, ∞)", self.first),
        }
    }
}

/// Split consecutive start pages into ranges: each runs up to the page before
/// its successor, and the final one ends at `last`.
pub fn split_ranges(starts: &[i64], last: UpperBound) -> Vec<PageRange> {
    starts
        .iter()
        .enumerate()
        .map(|(i, &first)| {
            let upper = match starts.get(i + 1) {
                Some(&next) => UpperBound::Page(next - 1),
                None => last,
            };
            PageRange::new(first, upper)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_ranges_end_unbounded() {
        let ranges = split_ranges(&[10, 20, 35], UpperBound::Unbounded);
        assert_eq!(
            ranges,
            vec![
                PageRange::new(10, UpperBound::Page(19)),
                PageRange::new(20, UpperBound::Page(34)),
                PageRange::new(35, UpperBound::Unbounded),
            ]
        );
        assert_eq!(ranges[2].window(), PageWindow::new(Some(35), None));
    }

    #[test]
    fn last_article_inherits_chapter_bound() {
        let chapter = PageRange::new(20, UpperBound::Page(34));
        let ranges = split_ranges(&[20, 28], chapter.last);
        assert_eq!(
            ranges,
            vec![
                PageRange::new(20, UpperBound::Page(27)),
                PageRange::new(28, UpperBound::Page(34)),
            ]
        );
    }

    #[test]
    fn no_starts_no_ranges() {
        assert!(split_ranges(&[], UpperBound::Unbounded).is_empty());
    }

    #[test]
    fn shared_start_page_gives_empty_range() {
        // two articles opening on the same page: the first owns nothing
        let ranges = split_ranges(&[12, 12], UpperBound::Page(19));
        assert!(ranges[0].is_empty());
        assert!(!ranges[1].is_empty());
        assert_eq!(ranges[0].to_string(), "[12, 11]");
        assert_eq!(ranges[1].to_string(), "[12, 19]");
    }

    #[test]
    fn unbounded_display() {
        assert_eq!(PageRange::new(35, UpperBound::Unbounded).to_string(), "[35, ∞)");
    }
}
