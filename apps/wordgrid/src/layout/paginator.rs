//! Grid Paginator: partitions a word list into fixed 4×8 pages and attaches
//! each word's image.
//!
//! # Rules
//! - Page *k* covers `words[k·32 .. k·32+32]`; the last page is padded with
//!   empty cells to exactly 32.
//! - Images are resolved by *global* 1-based word index through a
//!   `CandidatePolicy`; padding cells never get an image.
//! - Cell positions are 1-based within their page.

use std::path::Path;

use base64::Engine;
use tracing::warn;

use crate::layout::candidates::CandidatePolicy;

/// Columns × rows of one printed page.
pub const GRID_COLUMNS: usize = 4;
pub const GRID_ROWS: usize = 8;
pub const CELLS_PER_PAGE: usize = GRID_COLUMNS * GRID_ROWS;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// An image embedded into a cell as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellImage {
    /// Base64-encoded file contents.
    pub data: String,
    /// MIME subtype: `png` or `jpeg` (`.jpg` files are reported as `jpeg`).
    pub media_type: String,
}

/// One grid position: a word plus its optional image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub word: String,
    pub image: Option<CellImage>,
    /// 1-based position within the page (1..=32).
    pub position: usize,
}

impl GridCell {
    pub fn padding(position: usize) -> Self {
        Self {
            word: String::new(),
            image: None,
            position,
        }
    }

    pub fn is_padding(&self) -> bool {
        self.word.is_empty()
    }
}

/// Exactly `CELLS_PER_PAGE` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number within the document.
    pub number: usize,
    pub cells: Vec<GridCell>,
}

impl Page {
    /// Builds a page from up to 32 cells, padding the rest.
    pub fn from_cells(number: usize, mut cells: Vec<GridCell>) -> Self {
        cells.truncate(CELLS_PER_PAGE);
        for position in cells.len() + 1..=CELLS_PER_PAGE {
            cells.push(GridCell::padding(position));
        }
        Self { number, cells }
    }

    /// Number of non-padding cells.
    pub fn word_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_padding()).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Number of pages needed for `word_count` words (never less than one).
pub fn page_count(word_count: usize) -> usize {
    word_count.div_ceil(CELLS_PER_PAGE).max(1)
}

/// Splits `words` into padded pages, resolving images from `image_dir`.
pub fn paginate(words: &[String], image_dir: Option<&Path>, policy: &CandidatePolicy) -> Vec<Page> {
    let word_count = words.len();

    (0..page_count(word_count))
        .map(|page_idx| {
            let start = page_idx * CELLS_PER_PAGE;
            let end = (start + CELLS_PER_PAGE).min(word_count);

            let cells = words[start..end]
                .iter()
                .enumerate()
                .map(|(offset, word)| {
                    let global_index = start + offset + 1;
                    let image = match image_dir {
                        Some(dir) if !word.is_empty() => {
                            find_cell_image(dir, global_index, word, policy)
                        }
                        _ => None,
                    };
                    GridCell {
                        word: word.clone(),
                        image,
                        position: offset + 1,
                    }
                })
                .collect();

            Page::from_cells(page_idx + 1, cells)
        })
        .collect()
}

/// Resolves and loads the image for one word. An existing but unreadable
/// file is reported and treated as missing.
pub fn find_cell_image(
    dir: &Path,
    index: usize,
    word: &str,
    policy: &CandidatePolicy,
) -> Option<CellImage> {
    let path = policy.resolve(dir, index, word)?;
    load_cell_image(&path)
}

/// Reads an image file and base64-encodes it for embedding.
pub fn load_cell_image(path: &Path) -> Option<CellImage> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read image {}: {e}", path.display());
            return None;
        }
    };

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "png".to_string());
    let media_type = if ext == "jpg" { "jpeg".to_string() } else { ext };

    Some(CellImage {
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        media_type,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn make_words(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Word{i}")).collect()
    }

    // ── page shape ──────────────────────────────────────────────────────────

    #[test]
    fn test_page_count_and_padding() {
        for n in [1, 31, 32, 33, 64, 65, 100] {
            let pages = paginate(&make_words(n), None, &CandidatePolicy::default());
            assert_eq!(pages.len(), n.div_ceil(32), "n = {n}");
            assert!(pages.iter().all(|p| p.cells.len() == CELLS_PER_PAGE));

            let last = pages.last().unwrap();
            let expected_real = if n % 32 == 0 { 32 } else { n % 32 };
            assert_eq!(last.word_count(), expected_real, "n = {n}");
        }
    }

    #[test]
    fn test_empty_list_renders_one_padding_page() {
        let pages = paginate(&[], None, &CandidatePolicy::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].word_count(), 0);
        assert_eq!(pages[0].cells.len(), 32);
    }

    #[test]
    fn test_exactly_32_words_without_images() {
        let pages = paginate(&make_words(32), None, &CandidatePolicy::default());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].cells.iter().all(|c| c.image.is_none()));
        assert!(pages[0].cells.iter().all(|c| !c.is_padding()));
    }

    #[test]
    fn test_positions_restart_on_each_page() {
        let pages = paginate(&make_words(40), None, &CandidatePolicy::default());
        let positions: Vec<usize> = pages[1].cells.iter().map(|c| c.position).collect();
        assert_eq!(positions, (1..=32).collect::<Vec<_>>());
        assert_eq!(pages[1].cells[0].word, "Word33");
        assert_eq!(pages[1].number, 2);
        assert!(pages[1].cells[8].is_padding());
    }

    #[test]
    fn test_words_keep_order_across_pages() {
        let words = make_words(70);
        let pages = paginate(&words, None, &CandidatePolicy::default());
        let flattened: Vec<String> = pages
            .iter()
            .flat_map(|p| p.cells.iter())
            .filter(|c| !c.is_padding())
            .map(|c| c.word.clone())
            .collect();
        assert_eq!(flattened, words);
    }

    // ── image resolution ────────────────────────────────────────────────────

    #[test]
    fn test_images_resolved_by_global_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("033.png"), b"page two").unwrap();
        fs::write(dir.path().join("1.jpg"), b"first").unwrap();

        let pages = paginate(&make_words(40), Some(dir.path()), &CandidatePolicy::default());

        let first = pages[0].cells[0].image.as_ref().unwrap();
        assert_eq!(first.media_type, "jpeg");
        assert_eq!(first.data, "Zmlyc3Q=");

        let page_two = pages[1].cells[0].image.as_ref().unwrap();
        assert_eq!(page_two.media_type, "png");
        assert!(pages[0].cells[1].image.is_none());
    }

    #[test]
    fn test_padding_cells_never_get_images() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=32 {
            fs::write(dir.path().join(format!("{i:03}.png")), b"x").unwrap();
        }

        let pages = paginate(&make_words(3), Some(dir.path()), &CandidatePolicy::default());
        assert!(pages[0].cells[..3].iter().all(|c| c.image.is_some()));
        assert!(pages[0].cells[3..].iter().all(|c| c.image.is_none()));
    }

    #[test]
    fn test_empty_word_gets_no_image() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("001.png"), b"x").unwrap();
        let words = vec![String::new(), "b".to_string()];
        let pages = paginate(&words, Some(dir.path()), &CandidatePolicy::default());
        assert!(pages[0].cells[0].image.is_none());
    }

    #[test]
    fn test_load_cell_image_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cell_image(&dir.path().join("001.png")).is_none());
    }

    #[test]
    fn test_from_cells_truncates_overflow() {
        let cells: Vec<GridCell> = (1..=40)
            .map(|i| GridCell {
                word: format!("w{i}"),
                image: None,
                position: i,
            })
            .collect();
        let page = Page::from_cells(1, cells);
        assert_eq!(page.cells.len(), 32);
        assert_eq!(page.word_count(), 32);
    }
}
