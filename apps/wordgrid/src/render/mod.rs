//! PDF Emitter: hands assembled HTML to an external renderer.
//!
//! The renderer writes into a temporary file next to the destination, which
//! is only moved into place once rendering succeeded. A missing or failing
//! renderer therefore never leaves a partial PDF behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::{Config, PdfBackend};
use crate::errors::AppError;

pub mod chrome;
pub mod weasyprint;

pub use chrome::ChromeRenderer;
pub use weasyprint::WeasyPrintRenderer;

/// An HTML-to-PDF backend. Implement this to add a renderer without
/// touching the grid command.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// Fails with `BackendUnavailable` when the renderer cannot be executed.
    async fn check_available(&self) -> Result<(), AppError>;

    /// Renders the HTML file at `html_path` into `pdf_path`.
    async fn render_file(&self, html_path: &Path, pdf_path: &Path) -> Result<(), AppError>;
}

/// Builds the renderer selected in the configuration.
pub fn renderer_for(config: &Config) -> Box<dyn PdfRenderer> {
    match config.pdf_backend {
        PdfBackend::Chrome => Box::new(ChromeRenderer::new(config.chrome_bin.clone())),
        PdfBackend::WeasyPrint => Box::new(WeasyPrintRenderer::new(config.weasyprint_bin.clone())),
    }
}

/// Renders `html` into a PDF at `output`.
///
/// Does not probe the renderer; callers run `check_available` once per
/// command before the first document.
pub async fn emit_pdf(
    renderer: &dyn PdfRenderer,
    html: &str,
    output: &Path,
) -> Result<(), AppError> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| AppError::partial_write(&parent, e))?;
    let parent = tokio::fs::canonicalize(&parent)
        .await
        .map_err(|e| AppError::partial_write(&parent, e))?;

    let html_file = tempfile::Builder::new()
        .prefix("wordgrid-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temporary HTML file: {e}")))?;
    tokio::fs::write(html_file.path(), html)
        .await
        .map_err(|e| AppError::partial_write(html_file.path(), e))?;

    let pdf_file = tempfile::Builder::new()
        .prefix(".wordgrid-")
        .suffix(".pdf")
        .tempfile_in(&parent)
        .map_err(|e| AppError::partial_write(&parent, e))?;

    debug!(
        "Rendering {} with {} into {}",
        html_file.path().display(),
        renderer.name(),
        pdf_file.path().display()
    );
    renderer.render_file(html_file.path(), pdf_file.path()).await?;

    let rendered_len = tokio::fs::metadata(pdf_file.path())
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if rendered_len == 0 {
        return Err(AppError::Render(format!(
            "{} produced no output",
            renderer.name()
        )));
    }

    pdf_file
        .persist(output)
        .map_err(|e| AppError::partial_write(output, e.error))?;

    debug!("Wrote {}", output.display());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Subprocess helpers shared by the backends
// ────────────────────────────────────────────────────────────────────────────

/// Runs `<program> --version`; any failure means the backend is unavailable.
pub(crate) async fn probe_program(program: &str, hint: &str) -> Result<(), AppError> {
    let unavailable = |reason: String| AppError::BackendUnavailable {
        backend: program.to_string(),
        reason,
        hint: hint.to_string(),
    };

    let output = Command::new(program)
        .arg("--version")
        .output()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if !output.status.success() {
        return Err(unavailable(format!(
            "`{program} --version` exited with {}",
            output.status
        )));
    }

    debug!(
        "Found {program}: {}",
        String::from_utf8_lossy(&output.stdout).trim()
    );
    Ok(())
}

/// Runs a renderer to completion, mapping a non-zero exit to `AppError::Render`.
pub(crate) async fn run_program(program: &str, args: &[OsString]) -> Result<(), AppError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| AppError::Render(format!("Failed to run {program}: {e}")))?;

    if !output.status.success() {
        return Err(AppError::Render(format!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
