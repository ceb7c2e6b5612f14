//! Image Generator: one illustrative image per wordlist line.
//!
//! Flow per line: extract distinct words → fill the prompt template →
//! derive a reproducible seed → txt2img → save `<line:03>.png` into the
//! wordlist's sibling directory.
//!
//! Existing images are kept unless forced. A failed line is logged and
//! skipped; there is no retry.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::imagegen::prompts::WORDS_PLACEHOLDER;
use crate::imagegen::{ImageBackend, Txt2ImgRequest};
use crate::wordlist::source::{list_files_with_extension, load_lines};

/// Options shared by every wordlist in a run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub prompt_template: String,
    pub dry_run: bool,
    pub force: bool,
    /// Pause after each backend request.
    pub delay: Duration,
}

/// Counts accumulated over one or more wordlist files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRunStats {
    pub files: usize,
    pub lines: usize,
    pub successful: usize,
    pub failed: usize,
}

impl ImageRunStats {
    fn absorb(&mut self, other: &ImageRunStats) {
        self.files += other.files;
        self.lines += other.lines;
        self.successful += other.successful;
        self.failed += other.failed;
    }

    pub fn success_rate(&self) -> f64 {
        if self.lines == 0 {
            return 0.0;
        }
        self.successful as f64 / self.lines as f64 * 100.0
    }

    /// End-of-run summary. A dry run contacts no backend, so it has no success rate.
    pub fn summary(&self, dry_run: bool) -> String {
        let counts = format!(
            "Processed {} files, {} lines: {} successful, {} failed",
            self.files, self.lines, self.successful, self.failed
        );
        if dry_run {
            counts
        } else {
            format!("{counts} ({:.1}% success)", self.success_rate())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// Splits a line on whitespace and drops repeated tokens, keeping first occurrences.
pub fn extract_words(line: &str) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for word in line.split_whitespace() {
        if !unique.iter().any(|w| w == word) {
            unique.push(word.to_string());
        }
    }
    unique
}

/// Fills `{words}` with the comma-joined words.
pub fn create_prompt(template: &str, words: &[String]) -> String {
    template.replace(WORDS_PLACEHOLDER, &words.join(", "))
}

pub fn validate_template(template: &str) -> Result<(), AppError> {
    if template.contains(WORDS_PLACEHOLDER) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "prompt template must contain the {WORDS_PLACEHOLDER} placeholder"
        )))
    }
}

/// Seed for line `line_idx` of wordlist `wordlist_name`.
///
/// First 8 bytes of SHA-256 over `"<name>_<line>"`, reduced mod 2^32, so the
/// same line always gets the same seed on every platform.
pub fn derive_seed(wordlist_name: &str, line_idx: usize) -> u32 {
    let digest = Sha256::digest(format!("{wordlist_name}_{line_idx}").as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % (1u64 << 32)) as u32
}

/// Output path for a line's image: `<dir>/<line:03>.png`.
pub fn image_path_for(output_dir: &Path, line_idx: usize) -> PathBuf {
    output_dir.join(format!("{line_idx:03}.png"))
}

// ────────────────────────────────────────────────────────────────────────────
// Runs
// ────────────────────────────────────────────────────────────────────────────

/// Generates images for every line of one wordlist file.
///
/// `backend` may be `None` only in a dry run.
pub async fn process_wordlist_file(
    backend: Option<&dyn ImageBackend>,
    wordlist_path: &Path,
    options: &GenerateOptions,
) -> Result<ImageRunStats, AppError> {
    let wordlist_name = wordlist_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Validation(format!("{} has no file name", wordlist_path.display())))?;
    let output_dir = wordlist_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&wordlist_name);

    let lines = load_lines(wordlist_path)?;

    info!(
        "Processing {} ({} lines)",
        wordlist_path.display(),
        lines.len()
    );
    if options.dry_run {
        info!("Dry run: no images will be generated");
    }

    let mut stats = ImageRunStats {
        files: 1,
        lines: lines.len(),
        ..Default::default()
    };

    for (offset, line) in lines.iter().enumerate() {
        let line_idx = offset + 1;
        let image_path = image_path_for(&output_dir, line_idx);

        if image_path.exists() && !options.force {
            info!("Skipping {} (already exists)", image_path.display());
            stats.successful += 1;
            continue;
        }

        let words = extract_words(line);
        if words.is_empty() {
            warn!("Skipping line {line_idx}: no words found");
            continue;
        }

        let prompt = create_prompt(&options.prompt_template, &words);

        if options.dry_run {
            info!("Line {line_idx}: {line}");
            info!("  words: {words:?}");
            info!("  prompt: {prompt}");
            info!("  would save to: {}", image_path.display());
            stats.successful += 1;
            continue;
        }

        let Some(backend) = backend else {
            return Err(AppError::Validation(
                "an image backend is required outside dry-run mode".to_string(),
            ));
        };

        info!("Generating {}: {}", image_path.display(), words.join(" "));
        let seed = derive_seed(&wordlist_name, line_idx);
        let request = Txt2ImgRequest::new(prompt, Some(seed));

        match backend.txt2img(&request).await {
            Ok(image) => match save_image(&image_path, &image).await {
                Ok(()) => {
                    info!("Saved {}", image_path.display());
                    stats.successful += 1;
                }
                Err(e) => {
                    error!("{e}");
                    stats.failed += 1;
                }
            },
            Err(e) => {
                error!("Failed to generate {}: {e}", image_path.display());
                stats.failed += 1;
            }
        }

        tokio::time::sleep(options.delay).await;
    }

    Ok(stats)
}

/// Processes every `*.txt` wordlist in `wordlists_dir`, sorted by name.
///
/// A wordlist that cannot be read is reported and skipped.
pub async fn process_all_wordlists(
    backend: Option<&dyn ImageBackend>,
    wordlists_dir: &Path,
    options: &GenerateOptions,
) -> Result<ImageRunStats, AppError> {
    let files = list_files_with_extension(wordlists_dir, "txt")?;
    if files.is_empty() {
        return Err(AppError::Validation(format!(
            "no wordlist files found in {}",
            wordlists_dir.display()
        )));
    }

    info!("Found {} wordlist files", files.len());

    let mut total = ImageRunStats::default();
    for (i, file) in files.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, files.len(), file.display());
        match process_wordlist_file(backend, file, options).await {
            Ok(stats) => total.absorb(&stats),
            Err(e) => {
                error!("Error processing {}: {e}", file.display());
                total.files += 1;
                total.failed += 1;
            }
        }
    }

    Ok(total)
}

async fn save_image(path: &Path, image: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::partial_write(parent, e))?;
    }
    tokio::fs::write(path, image)
        .await
        .map_err(|e| AppError::partial_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagegen::prompts::DEFAULT_PROMPT_TEMPLATE;
    use crate::imagegen::ImageGenError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records every request; fails the lines whose prompt contains `fail_on`.
    struct FakeBackend {
        requests: Mutex<Vec<Txt2ImgRequest>>,
        fail_on: Option<String>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl ImageBackend for FakeBackend {
        async fn txt2img(&self, request: &Txt2ImgRequest) -> Result<Bytes, ImageGenError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.fail_on {
                Some(word) if request.prompt.contains(word.as_str()) => Err(ImageGenError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
                _ => Ok(Bytes::from_static(b"\x89PNG fake")),
            }
        }
    }

    fn options(dry_run: bool, force: bool) -> GenerateOptions {
        GenerateOptions {
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            dry_run,
            force,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_extract_words_dedups_in_order() {
        assert_eq!(
            extract_words("  的 abandon abandon  的 abaisser "),
            vec!["的", "abandon", "abaisser"]
        );
        assert!(extract_words("   ").is_empty());
    }

    #[test]
    fn test_create_prompt_joins_with_commas() {
        let words = vec!["的".to_string(), "abandon".to_string()];
        assert_eq!(create_prompt("draw {words}!", &words), "draw 的, abandon!");
        assert!(create_prompt(DEFAULT_PROMPT_TEMPLATE, &words)
            .starts_with("A symbolic illustration representing the concepts of '的, abandon', minimalist"));
    }

    #[test]
    fn test_validate_template_requires_placeholder() {
        assert!(validate_template("a {words} b").is_ok());
        assert!(matches!(
            validate_template("no placeholder"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_derive_seed_is_deterministic_and_keyed() {
        assert_eq!(derive_seed("001", 1), derive_seed("001", 1));
        assert_ne!(derive_seed("001", 1), derive_seed("001", 2));
        assert_ne!(derive_seed("001", 1), derive_seed("002", 1));
    }

    #[test]
    fn test_derive_seed_matches_sha256_prefix() {
        let digest = Sha256::digest(b"001_1");
        let expected = u32::from_be_bytes([digest[4], digest[5], digest[6], digest[7]]);
        assert_eq!(derive_seed("001", 1), expected);
    }

    #[tokio::test]
    async fn test_generates_one_image_per_line_with_seeds() {
        let dir = tempfile::tempdir().unwrap();
        let wordlist = dir.path().join("001.txt");
        std::fs::write(&wordlist, "的 abandon abaisser\n\n一 ability abdiquer\n").unwrap();
        let backend = FakeBackend::new();

        let stats = process_wordlist_file(Some(&backend), &wordlist, &options(false, false))
            .await
            .unwrap();

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.successful, 2);
        assert!(dir.path().join("001").join("001.png").exists());
        assert!(dir.path().join("001").join("002.png").exists());

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].seed, Some(derive_seed("001", 1)));
        assert!(requests[1].prompt.contains("一, ability, abdiquer"));
    }

    #[tokio::test]
    async fn test_existing_images_are_skipped_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let wordlist = dir.path().join("001.txt");
        std::fs::write(&wordlist, "a b c\nd e f\n").unwrap();
        std::fs::create_dir(dir.path().join("001")).unwrap();
        std::fs::write(dir.path().join("001").join("001.png"), b"old").unwrap();

        let backend = FakeBackend::new();
        let stats = process_wordlist_file(Some(&backend), &wordlist, &options(false, false))
            .await
            .unwrap();
        assert_eq!(stats.successful, 2);
        assert_eq!(backend.requests.lock().unwrap().len(), 1);

        let forced = FakeBackend::new();
        process_wordlist_file(Some(&forced), &wordlist, &options(false, true))
            .await
            .unwrap();
        assert_eq!(forced.requests.lock().unwrap().len(), 2);
        assert_ne!(
            std::fs::read(dir.path().join("001").join("001.png")).unwrap(),
            b"old".to_vec()
        );
    }

    #[tokio::test]
    async fn test_failed_line_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let wordlist = dir.path().join("002.txt");
        std::fs::write(&wordlist, "good\nbad\nfine\n").unwrap();
        let backend = FakeBackend {
            requests: Mutex::new(Vec::new()),
            fail_on: Some("bad".to_string()),
        };

        let stats = process_wordlist_file(Some(&backend), &wordlist, &options(false, false))
            .await
            .unwrap();

        assert_eq!(stats.successful, 2);
        assert_eq!(stats.failed, 1);
        assert!(!dir.path().join("002").join("002.png").exists());
        assert!(dir.path().join("002").join("003.png").exists());
    }

    #[tokio::test]
    async fn test_dry_run_needs_no_backend_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let wordlist = dir.path().join("001.txt");
        std::fs::write(&wordlist, "a\nb\n").unwrap();

        let stats = process_wordlist_file(None, &wordlist, &options(true, false))
            .await
            .unwrap();
        assert_eq!(stats.successful, 2);
        assert!(!dir.path().join("001").exists());
    }

    #[tokio::test]
    async fn test_missing_backend_outside_dry_run_errors() {
        let dir = tempfile::tempdir().unwrap();
        let wordlist = dir.path().join("001.txt");
        std::fs::write(&wordlist, "a\n").unwrap();

        let err = process_wordlist_file(None, &wordlist, &options(false, false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_process_all_aggregates_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("002.txt"), "c\n").unwrap();
        std::fs::write(dir.path().join("001.txt"), "a\nb\n").unwrap();
        let backend = FakeBackend::new();

        let stats = process_all_wordlists(Some(&backend), dir.path(), &options(false, false))
            .await
            .unwrap();

        assert_eq!(
            stats,
            ImageRunStats {
                files: 2,
                lines: 3,
                successful: 3,
                failed: 0
            }
        );
        let seeds: Vec<Option<u32>> = backend
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.seed)
            .collect();
        assert_eq!(
            seeds,
            vec![
                Some(derive_seed("001", 1)),
                Some(derive_seed("001", 2)),
                Some(derive_seed("002", 1))
            ]
        );
        assert!((stats.success_rate() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_reports_rate_only_for_real_runs() {
        let stats = ImageRunStats {
            files: 1,
            lines: 4,
            successful: 3,
            failed: 1,
        };
        assert_eq!(
            stats.summary(false),
            "Processed 1 files, 4 lines: 3 successful, 1 failed (75.0% success)"
        );
        assert_eq!(
            stats.summary(true),
            "Processed 1 files, 4 lines: 3 successful, 1 failed"
        );
    }

    #[tokio::test]
    async fn test_process_all_empty_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_all_wordlists(None, dir.path(), &options(true, false))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
