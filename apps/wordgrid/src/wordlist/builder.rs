//! Wordlist Builder: merges same-length language lists line by line into
//! numbered chunk files (`001.txt`, `002.txt`, ...).
//!
//! Every output line holds the words found at the same line index in each
//! source, joined by single spaces. The trailing partial chunk is dropped
//! unless explicitly requested.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::wordlist::source::{list_files_with_extension, load_lines};

/// Lines per chunk file; matches the 32 cells of a grid page.
pub const CHUNK_SIZE: usize = 32;

/// Default BIP39 sources, in output column order.
pub const DEFAULT_SOURCES: [(&str, &str); 3] = [
    ("chinese_simplified", "chinese_simplified.txt"),
    ("english", "english.txt"),
    ("french", "french.txt"),
];

/// A loaded source word list.
#[derive(Debug, Clone)]
pub struct SourceList {
    pub name: String,
    pub words: Vec<String>,
}

/// One chunk of merged lines, numbered from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WordChunk {
    pub index: usize,
    /// 1-based source line of the chunk's first entry.
    pub first_line: usize,
    pub lines: Vec<String>,
}

impl WordChunk {
    pub fn file_name(&self) -> String {
        format!("{:03}.txt", self.index)
    }

    pub fn last_line(&self) -> usize {
        self.first_line + self.lines.len() - 1
    }

    /// File contents: one merged line per row, newline-terminated.
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Parameters for a builder run.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// `(name, path)` pairs, in output column order.
    pub sources: Vec<(String, PathBuf)>,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub include_partial: bool,
    pub clear: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub total_words: usize,
    pub chunks_written: usize,
    pub cleared: usize,
}

/// Returns the default `(name, path)` sources under `bip39_dir`.
pub fn default_sources(bip39_dir: &Path) -> Vec<(String, PathBuf)> {
    DEFAULT_SOURCES
        .iter()
        .map(|(name, file)| (name.to_string(), bip39_dir.join(file)))
        .collect()
}

/// Loads every source, validates them and writes the chunk files.
pub fn build_wordlists(request: &BuildRequest) -> Result<BuildSummary, AppError> {
    // All sources must exist before anything is loaded or written.
    for (_, path) in &request.sources {
        if !path.is_file() {
            return Err(AppError::MissingInput(path.clone()));
        }
    }

    let mut sources = Vec::with_capacity(request.sources.len());
    for (name, path) in &request.sources {
        let words = load_lines(path)?;
        if words.is_empty() {
            return Err(AppError::Validation(format!(
                "Could not load any words from {}",
                path.display()
            )));
        }
        info!("Loaded {} words from {name}", words.len());
        sources.push(SourceList {
            name: name.clone(),
            words,
        });
    }

    let chunks = build_chunks(&sources, request.chunk_size, request.include_partial)?;
    let total_words = sources.first().map(|s| s.words.len()).unwrap_or(0);
    info!("All sources contain {total_words} words");

    let cleared = if request.clear && !request.dry_run {
        clear_existing(&request.output_dir)
    } else {
        0
    };

    let chunks_written = write_chunks(&chunks, &request.output_dir, request.dry_run)?;

    Ok(BuildSummary {
        total_words,
        chunks_written,
        cleared,
    })
}

/// Groups equal-length sources into chunks of `chunk_size` merged lines.
///
/// Lengths must match exactly; the trailing partial chunk is only produced
/// when `include_partial` is set.
pub fn build_chunks(
    sources: &[SourceList],
    chunk_size: usize,
    include_partial: bool,
) -> Result<Vec<WordChunk>, AppError> {
    if chunk_size == 0 {
        return Err(AppError::Validation(
            "chunk size must be at least 1".to_string(),
        ));
    }
    let Some(first) = sources.first() else {
        return Err(AppError::Validation(
            "at least one source word list is required".to_string(),
        ));
    };

    let total = first.words.len();
    if sources.iter().any(|s| s.words.len() != total) {
        return Err(AppError::LengthMismatch {
            counts: sources
                .iter()
                .map(|s| (s.name.clone(), s.words.len()))
                .collect(),
        });
    }

    let full_chunks = total / chunk_size;
    let chunk_count = if include_partial && total % chunk_size != 0 {
        full_chunks + 1
    } else {
        full_chunks
    };

    let chunks = (0..chunk_count)
        .map(|chunk_idx| {
            let start = chunk_idx * chunk_size;
            let end = (start + chunk_size).min(total);
            let lines = (start..end)
                .map(|line_idx| {
                    sources
                        .iter()
                        .map(|s| s.words[line_idx].as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            WordChunk {
                index: chunk_idx + 1,
                first_line: start + 1,
                lines,
            }
        })
        .collect();

    Ok(chunks)
}

/// Writes each chunk to `<out_dir>/<NNN>.txt`. Returns the number written
/// (or that would be written, in a dry run).
pub fn write_chunks(chunks: &[WordChunk], out_dir: &Path, dry_run: bool) -> Result<usize, AppError> {
    if dry_run {
        for chunk in chunks {
            info!(
                "Would write {}: {} lines (source lines {}-{})",
                chunk.file_name(),
                chunk.lines.len(),
                chunk.first_line,
                chunk.last_line()
            );
        }
        return Ok(chunks.len());
    }

    fs::create_dir_all(out_dir).map_err(|e| AppError::partial_write(out_dir, e))?;

    for chunk in chunks {
        let path = out_dir.join(chunk.file_name());
        fs::write(&path, chunk.contents()).map_err(|e| AppError::partial_write(&path, e))?;
        info!(
            "Generated {}: {} lines (source lines {}-{})",
            chunk.file_name(),
            chunk.lines.len(),
            chunk.first_line,
            chunk.last_line()
        );
    }

    Ok(chunks.len())
}

/// Removes existing `*.txt` files from `out_dir`. Failures are reported and skipped.
pub fn clear_existing(out_dir: &Path) -> usize {
    let files = match list_files_with_extension(out_dir, "txt") {
        Ok(files) => files,
        Err(_) => return 0,
    };

    info!("Clearing {} existing wordlist files...", files.len());
    let mut removed = 0;
    for file in files {
        match fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Error removing {}: {e}", file.display()),
        }
    }
    removed
}
