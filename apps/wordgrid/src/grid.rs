//! Grid command: turns wordlists into printable PDF grids.
//!
//! Modes: every wordlist in a directory (one PDF each), a single wordlist,
//! or one combined page sampling all wordlists.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::layout::{
    combine_wordlists, paginate, render_document, CandidatePolicy, GridTemplate, Page, PageSpec,
};
use crate::render::{emit_pdf, PdfRenderer};
use crate::wordlist::{discover_wordlists, load_lines};

pub const COMBINED_FILE_NAME: &str = "combined_wordlists.pdf";
pub const COMBINED_TITLE: &str = "Combined Wordlists";

/// Settings shared by all grid modes.
#[derive(Debug, Clone)]
pub struct GridOptions {
    pub title: String,
    pub output_dir: PathBuf,
    pub template: GridTemplate,
    pub page_spec: PageSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// `output/wordlist_<name>.pdf`
pub fn wordlist_output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("wordlist_{name}.pdf"))
}

/// Renders a set of pages to `output` and writes the HTML alongside for debugging.
/// The renderer must already have been probed.
async fn emit_pages(
    renderer: &dyn PdfRenderer,
    pages: &[Page],
    title: &str,
    options: &GridOptions,
    output: &Path,
) -> Result<(), AppError> {
    let html = render_document(&options.template, &options.page_spec, pages, title);
    emit_pdf(renderer, &html, output).await?;

    // The PDF is already in place; a missing debug copy does not fail the item.
    let html_path = output.with_extension("html");
    match tokio::fs::write(&html_path, &html).await {
        Ok(()) => info!("Debug HTML: {}", html_path.display()),
        Err(e) => warn!("Could not write debug HTML {}: {e}", html_path.display()),
    }
    Ok(())
}

/// Paginates one word list and renders it to `output`. Returns the page count.
pub async fn generate_wordlist_pdf(
    renderer: &dyn PdfRenderer,
    words: &[String],
    image_dir: Option<&Path>,
    title: &str,
    options: &GridOptions,
    output: &Path,
) -> Result<usize, AppError> {
    let pages = paginate(words, image_dir, &CandidatePolicy::default());
    emit_pages(renderer, &pages, title, options, output).await?;

    let count = pages.len();
    info!(
        "Generated: {} ({count} page{})",
        output.display(),
        if count > 1 { "s" } else { "" }
    );
    Ok(count)
}

/// One PDF per wordlist in `wordlists_dir`.
///
/// Empty wordlists are skipped; a failed wordlist is logged and the run
/// continues, except when the renderer itself is unavailable.
pub async fn generate_all(
    renderer: &dyn PdfRenderer,
    wordlists_dir: &Path,
    options: &GridOptions,
) -> Result<GridSummary, AppError> {
    let sources = discover_wordlists(wordlists_dir)?;
    if sources.is_empty() {
        return Err(AppError::Validation(format!(
            "no wordlists found in {}",
            wordlists_dir.display()
        )));
    }

    renderer.check_available().await?;

    let mut summary = GridSummary::default();
    for source in &sources {
        if source.words.is_empty() {
            warn!("Skipping {}: no words found", source.name);
            summary.skipped += 1;
            continue;
        }

        info!("Processing wordlist: {}", source.txt_path.display());
        let output = wordlist_output_path(&options.output_dir, &source.name);
        let title = format!("{} - {}", options.title, source.name);

        match generate_wordlist_pdf(
            renderer,
            &source.words,
            source.image_dir.as_deref(),
            &title,
            options,
            &output,
        )
        .await
        {
            Ok(_) => summary.succeeded += 1,
            Err(e @ AppError::BackendUnavailable { .. }) => return Err(e),
            Err(e) => {
                error!("Failed to generate {}: {e}", output.display());
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// A single wordlist file. Without `image_dir`, the sibling `<stem>/`
/// directory is used when it exists.
pub async fn generate_single(
    renderer: &dyn PdfRenderer,
    wordlist: &Path,
    image_dir: Option<&Path>,
    options: &GridOptions,
) -> Result<PathBuf, AppError> {
    let words = load_lines(wordlist)?;
    renderer.check_available().await?;
    if words.is_empty() {
        return Err(AppError::Validation(format!(
            "no words found in {}",
            wordlist.display()
        )));
    }

    let name = wordlist
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "wordlist".to_string());

    let image_dir = match image_dir {
        Some(dir) => {
            if !dir.is_dir() {
                warn!("Images directory {} not found; rendering without images", dir.display());
            }
            Some(dir.to_path_buf())
        }
        None => wordlist
            .parent()
            .map(|p| p.join(&name))
            .filter(|dir| dir.is_dir()),
    };

    let output = wordlist_output_path(&options.output_dir, &name);
    let title = format!("{} - {name}", options.title);
    generate_wordlist_pdf(
        renderer,
        &words,
        image_dir.as_deref(),
        &title,
        options,
        &output,
    )
    .await?;

    Ok(output)
}

/// One page sampling every wordlist in `wordlists_dir`.
pub async fn generate_combined(
    renderer: &dyn PdfRenderer,
    wordlists_dir: &Path,
    options: &GridOptions,
) -> Result<PathBuf, AppError> {
    let sources = discover_wordlists(wordlists_dir)?;
    if sources.is_empty() {
        return Err(AppError::Validation(format!(
            "no wordlists found in {}",
            wordlists_dir.display()
        )));
    }

    renderer.check_available().await?;

    let combined = combine_wordlists(&sources);
    info!(
        "Generating combined PDF with {} words from {} wordlists ({} dropped)",
        combined.page.word_count(),
        sources.len(),
        combined.dropped
    );

    let output = options.output_dir.join(COMBINED_FILE_NAME);
    emit_pages(
        renderer,
        std::slice::from_ref(&combined.page),
        COMBINED_TITLE,
        options,
        &output,
    )
    .await?;

    Ok(output)
}
