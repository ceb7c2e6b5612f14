use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::render::{probe_program, run_program, PdfRenderer};

const INSTALL_HINT: &str =
    "Install Google Chrome or Chromium, or point CHROME_BIN at an installed browser";

/// Headless Chrome `--print-to-pdf`. Page size and margins come from the
/// document's `@page` rule.
pub struct ChromeRenderer {
    program: String,
}

impl ChromeRenderer {
    pub fn new(program: String) -> Self {
        Self { program }
    }

    fn args(html_path: &Path, pdf_path: &Path) -> Vec<OsString> {
        let mut print_to_pdf = OsString::from("--print-to-pdf=");
        print_to_pdf.push(pdf_path);

        let mut url = OsString::from("file://");
        url.push(html_path);

        vec![
            "--headless".into(),
            "--disable-gpu".into(),
            "--no-sandbox".into(),
            "--disable-dev-shm-usage".into(),
            "--no-pdf-header-footer".into(),
            print_to_pdf,
            url,
        ]
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
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
