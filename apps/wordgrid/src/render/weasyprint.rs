use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::render::{probe_program, run_program, PdfRenderer};

const INSTALL_HINT: &str = "Install WeasyPrint (pip install weasyprint) or set WEASYPRINT_BIN";

/// The WeasyPrint command-line renderer: `weasyprint <html> <pdf>`.
pub struct WeasyPrintRenderer {
    program: String,
}

impl WeasyPrintRenderer {
    pub fn new(program: String) -> Self {
        Self { program }
    }

    fn args(html_path: &Path, pdf_path: &Path) -> Vec<OsString> {
        vec![html_path.into(), pdf_path.into()]
    }
}

#[async_trait]
impl PdfRenderer for WeasyPrintRenderer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn check_available(&self) -> Result<(), AppError> {
        probe_program(&self.program, INSTALL_HINT).await
    }

    async fn render_file(&self, html_path: &Path, pdf_path: &Path) -> Result<(), AppError> {
        run_program(&self.program, &Self::args(html_path, pdf_path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_are_input_then_output() {
        let args = WeasyPrintRenderer::args(Path::new("/tmp/page.html"), Path::new("/out/a.pdf"));
        assert_eq!(
            args,
            vec![OsString::from("/tmp/page.html"), OsString::from("/out/a.pdf")]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let renderer = WeasyPrintRenderer::new("/nonexistent/wordgrid-weasyprint".to_string());
        let err = renderer.check_available().await.unwrap_err();
        assert!(matches!(err, AppError::BackendUnavailable { .. }));
        assert_eq!(err.hint(), Some(INSTALL_HINT));
    }
}
