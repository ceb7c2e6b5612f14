//! Reading word files and discovering the `wordlists/<NNN>.txt` tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::errors::AppError;

/// Extensions recognised as images inside a wordlist's image directory.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A discovered wordlist file together with its sibling image directory.
#[derive(Debug, Clone)]
pub struct WordlistSource {
    /// File stem, e.g. `001` for `wordlists/001.txt`.
    pub name: String,
    pub txt_path: PathBuf,
    /// `wordlists/<name>/`, if it exists.
    pub image_dir: Option<PathBuf>,
    pub words: Vec<String>,
}

/// Loads a word file: one entry per line, trimmed, empty lines dropped.
pub fn load_lines(path: &Path) -> Result<Vec<String>, AppError> {
    if !path.is_file() {
        return Err(AppError::MissingInput(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Lists files in `dir` with the given extension, sorted by file name.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::MissingInput(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        let matches = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Finds every `*.txt` wordlist in `dir` and pairs it with its image directory.
///
/// An unreadable wordlist is reported and returned with no words so the caller
/// can skip it; a missing `dir` is an error.
pub fn discover_wordlists(dir: &Path) -> Result<Vec<WordlistSource>, AppError> {
    let mut sources = Vec::new();

    for txt_path in list_files_with_extension(dir, "txt")? {
        let name = txt_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let words = match load_lines(&txt_path) {
            Ok(words) => words,
            Err(e) => {
                warn!("Error loading {}: {e}", txt_path.display());
                Vec::new()
            }
        };

        let candidate_dir = dir.join(&name);
        let image_dir = candidate_dir.is_dir().then_some(candidate_dir);

        info!("Found wordlist: {name} ({} words)", words.len());
        match &image_dir {
            Some(img_dir) => info!("  images directory: {} images", count_images(img_dir)),
            None => info!("  no images directory found"),
        }

        sources.push(WordlistSource {
            name,
            txt_path,
            image_dir,
            words,
        });
    }

    Ok(sources)
}

fn count_images(dir: &Path) -> usize {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| {
            list_files_with_extension(dir, ext)
                .map(|files| files.len())
                .unwrap_or(0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_lines_trims_and_drops_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("001.txt");
        fs::write(&path, "  的 abandon abaisser \n\n\t\nability 能 abandon\n").unwrap();

        let lines = load_lines(&path).unwrap();
        assert_eq!(
            lines,
            vec![
                "的 abandon abaisser".to_string(),
                "ability 能 abandon".to_string()
            ]
        );
    }

    #[test]
    fn test_load_lines_missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_lines(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
    }

    #[test]
    fn test_discover_pairs_image_dirs_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("002.txt"), "b\n").unwrap();
        fs::write(dir.path().join("001.txt"), "a\nb\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        fs::create_dir(dir.path().join("001")).unwrap();
        fs::write(dir.path().join("001").join("001.png"), b"png").unwrap();

        let sources = discover_wordlists(dir.path()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["001", "002"]);
        assert_eq!(sources[0].words.len(), 2);
        assert_eq!(sources[0].image_dir, Some(dir.path().join("001")));
        assert_eq!(sources[1].image_dir, None);
        assert_eq!(count_images(&dir.path().join("001")), 1);
    }

    #[test]
    fn test_discover_missing_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_wordlists(&dir.path().join("wordlists")).unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
    }
}
