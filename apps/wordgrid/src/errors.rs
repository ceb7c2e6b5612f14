use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// `main` reports these through `anyhow`; `hint()` supplies the remediation line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing input: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Source word lists differ in length: {}", format_counts(.counts))]
    LengthMismatch { counts: Vec<(String, usize)> },

    #[error("{backend} is unavailable: {reason}")]
    BackendUnavailable {
        backend: String,
        reason: String,
        hint: String,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    PartialWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn partial_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::PartialWrite {
            path: path.into(),
            source,
        }
    }

    /// Remediation hint shown to the user alongside the error, if one applies.
    pub fn hint(&self) -> Option<&str> {
        match self {
            AppError::BackendUnavailable { hint, .. } => Some(hint.as_str()),
            AppError::MissingInput(_) => {
                Some("Check the path, or run `wordgrid samples` to create a sample tree")
            }
            _ => None,
        }
    }
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{name}={count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_lists_every_source() {
        let err = AppError::LengthMismatch {
            counts: vec![
                ("english".to_string(), 2048),
                ("french".to_string(), 2047),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("english=2048"));
        assert!(msg.contains("french=2047"));
    }

    #[test]
    fn test_backend_unavailable_carries_hint() {
        let err = AppError::BackendUnavailable {
            backend: "google-chrome".to_string(),
            reason: "not found".to_string(),
            hint: "Install Google Chrome".to_string(),
        };
        assert_eq!(err.hint(), Some("Install Google Chrome"));
        assert!(err.to_string().starts_with("google-chrome is unavailable"));
    }

    #[test]
    fn test_validation_has_no_hint() {
        assert!(AppError::Validation("bad".to_string()).hint().is_none());
    }
}
