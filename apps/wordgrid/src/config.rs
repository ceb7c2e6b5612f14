use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which external program turns the assembled HTML into a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfBackend {
    Chrome,
    WeasyPrint,
}

impl FromStr for PdfBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(PdfBackend::Chrome),
            "weasyprint" => Ok(PdfBackend::WeasyPrint),
            other => bail!("unknown PDF backend '{other}' (expected 'chrome' or 'weasyprint')"),
        }
    }
}

/// Tool configuration loaded from environment variables.
/// Every value has a default; CLI flags override what is read here.
#[derive(Debug, Clone)]
pub struct Config {
    pub wordlists_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sd_host: String,
    pub sd_port: u16,
    pub image_request_delay_ms: u64,
    pub pdf_backend: PdfBackend,
    pub chrome_bin: String,
    pub weasyprint_bin: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            wordlists_dir: PathBuf::from(env_or("WORDGRID_WORDLISTS_DIR", "wordlists")),
            output_dir: PathBuf::from(env_or("WORDGRID_OUTPUT_DIR", "output")),
            sd_host: env_or("SD_HOST", "127.0.0.1"),
            sd_port: env_or("SD_PORT", "7860")
                .parse::<u16>()
                .context("SD_PORT must be a valid port number")?,
            image_request_delay_ms: env_or("IMAGE_REQUEST_DELAY_MS", "500")
                .parse::<u64>()
                .context("IMAGE_REQUEST_DELAY_MS must be a whole number of milliseconds")?,
            pdf_backend: env_or("PDF_BACKEND", "chrome")
                .parse()
                .context("PDF_BACKEND is invalid")?,
            chrome_bin: env_or("CHROME_BIN", "google-chrome"),
            weasyprint_bin: env_or("WEASYPRINT_BIN", "weasyprint"),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Base URL of the Stable Diffusion WebUI.
    pub fn sd_base_url(&self) -> String {
        format!("http://{}:{}", self.sd_host, self.sd_port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_backend_parses_case_insensitively() {
        assert_eq!("Chrome".parse::<PdfBackend>().unwrap(), PdfBackend::Chrome);
        assert_eq!(
            " weasyprint ".parse::<PdfBackend>().unwrap(),
            PdfBackend::WeasyPrint
        );
    }

    #[test]
    fn test_pdf_backend_rejects_unknown() {
        let err = "wkhtmltopdf".parse::<PdfBackend>().unwrap_err();
        assert!(err.to_string().contains("wkhtmltopdf"));
    }

    #[test]
    fn test_sd_base_url() {
        let config = Config {
            wordlists_dir: PathBuf::from("wordlists"),
            output_dir: PathBuf::from("output"),
            sd_host: "10.0.0.5".to_string(),
            sd_port: 7861,
            image_request_delay_ms: 0,
            pdf_backend: PdfBackend::Chrome,
            chrome_bin: "google-chrome".to_string(),
            weasyprint_bin: "weasyprint".to_string(),
            rust_log: "info".to_string(),
        };
        assert_eq!(config.sd_base_url(), "http://10.0.0.5:7861");
    }
}
