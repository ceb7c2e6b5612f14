//! Combined mode: samples several wordlists onto a single page.
//!
//! Each source contributes at most its first 32 words, relabelled
//! `"<word> (<list name>)"`, with images looked up by the word's index
//! *within its own list*. Only one page is ever produced: entries past the
//! 32nd are dropped and the drop is reported, never silently paginated.

use tracing::warn;

use crate::layout::candidates::CandidatePolicy;
use crate::layout::paginator::{find_cell_image, GridCell, Page, CELLS_PER_PAGE};
use crate::wordlist::source::WordlistSource;

/// Words taken from each source list.
pub const WORDS_PER_SOURCE: usize = 32;

#[derive(Debug, Clone)]
pub struct CombinedPage {
    pub page: Page,
    /// Combined entries that did not fit on the page.
    pub dropped: usize,
}

/// Builds the single combined page from `sources`, in order.
pub fn combine_wordlists(sources: &[WordlistSource]) -> CombinedPage {
    let policy = CandidatePolicy::index_only();

    let entries: Vec<(&WordlistSource, usize, &String)> = sources
        .iter()
        .flat_map(|source| {
            source
                .words
                .iter()
                .take(WORDS_PER_SOURCE)
                .enumerate()
                .map(move |(i, word)| (source, i + 1, word))
        })
        .collect();

    let dropped = entries.len().saturating_sub(CELLS_PER_PAGE);
    if dropped > 0 {
        warn!(
            "Combined page holds {CELLS_PER_PAGE} cells; dropping {dropped} of {} words",
            entries.len()
        );
    }

    let cells = entries
        .into_iter()
        .take(CELLS_PER_PAGE)
        .enumerate()
        .map(|(offset, (source, local_index, word))| GridCell {
            word: format!("{word} ({})", source.name),
            image: source
                .image_dir
                .as_deref()
                .and_then(|dir| find_cell_image(dir, local_index, word, &policy)),
            position: offset + 1,
        })
        .collect();

    CombinedPage {
        page: Page::from_cells(1, cells),
        dropped,
    }
}
