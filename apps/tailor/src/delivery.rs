//! Delivery: turns a finished document into a named, saved artifact.
//!
//! The document is serialized, wrapped in a `data:` URL for clients that save
//! it themselves, and handed to a `SaveTarget` under a filename derived from
//! the job posting.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::layout::{RenderedDocument, SinkError};

const FILENAME_PREFIX: &str = "Tailored_Resume";
const COMPANY_FALLBACK: &str = "c";
const TITLE_FALLBACK: &str = "j";
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not serialize document: {0}")]
    Serialize(#[from] SinkError),

    #[error("save rejected: {0}")]
    Rejected(String),

    #[error("save failed: {0}")]
    Io(#[from] std::io::Error),
}

impl DeliveryError {
    pub fn user_message(&self) -> String {
        match self {
            DeliveryError::Serialize(_) => "PDF generation failed.".to_string(),
            DeliveryError::Rejected(msg) => format!("Download failed: {msg}"),
            DeliveryError::Io(e) => format!("Download failed: {}", e.kind()),
        }
    }
}

/// Company and job title used only to name the artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilenameDescriptor {
    pub company_name: Option<String>,
    pub job_title: Option<String>,
}

impl FilenameDescriptor {
    /// `Tailored_Resume_<company>_<title>.pdf`
    pub fn filename(&self) -> String {
        format!(
            "{FILENAME_PREFIX}_{}_{}.pdf",
            sanitize_token(self.company_name.as_deref(), COMPANY_FALLBACK),
            sanitize_token(self.job_title.as_deref(), TITLE_FALLBACK),
        )
    }
}

/// Lowercases and replaces every non-ASCII-alphanumeric character with `_`,
/// one for one. Absent or empty input yields `fallback`.
pub fn sanitize_token(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect(),
        _ => fallback.to_string(),
    }
}

pub fn to_data_url(bytes: &[u8]) -> String {
    format!("data:{PDF_MIME};base64,{}", BASE64.encode(bytes))
}

/// What the host is asked to save.
pub struct SaveRequest<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
    /// Ask the user where to save instead of saving silently.
    pub save_as: bool,
}

/// The host's save action. Implementations may refuse.
pub trait SaveTarget: Send + Sync {
    /// Returns where the artifact ended up.
    fn save(&self, request: &SaveRequest<'_>) -> Result<String, DeliveryError>;
}

/// Saves into a downloads directory, never overwriting: a taken name gets a
/// ` (n)` suffix.
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn free_path(&self, filename: &str) -> PathBuf {
        let candidate = self.dir.join(filename);
        if !candidate.exists() {
            return candidate;
        }
        let path = Path::new(filename);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        let ext = path.extension().and_then(|e| e.to_str());
        (1..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

impl SaveTarget for DownloadDir {
    fn save(&self, request: &SaveRequest<'_>) -> Result<String, DeliveryError> {
        if request.filename.contains(['/', '\\']) || request.filename.starts_with('.') {
            return Err(DeliveryError::Rejected(format!(
                "invalid filename '{}'",
                request.filename
            )));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.free_path(request.filename);
        std::fs::write(&path, request.bytes)?;
        debug!(path = %path.display(), save_as = request.save_as, "Saved download");
        Ok(path.display().to_string())
    }
}

/// Result of a successful delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivered {
    pub filename: String,
    pub data_url: String,
    pub location: String,
    pub size_bytes: usize,
}

pub fn deliver(
    document: &RenderedDocument,
    descriptor: &FilenameDescriptor,
    target: &dyn SaveTarget,
) -> Result<Delivered, DeliveryError> {
    let bytes = document.to_pdf_bytes()?;
    let filename = descriptor.filename();
    let data_url = to_data_url(&bytes);

    let location = target.save(&SaveRequest {
        filename: &filename,
        bytes: &bytes,
        save_as: true,
    })?;
    info!(%filename, %location, size = bytes.len(), "PDF delivered");

    Ok(Delivered {
        filename,
        data_url,
        location,
        size_bytes: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{render_markdown, PageMetrics};

    struct RefusingTarget;

    impl SaveTarget for RefusingTarget {
        fn save(&self, _request: &SaveRequest<'_>) -> Result<String, DeliveryError> {
            Err(DeliveryError::Rejected("user cancelled".to_string()))
        }
    }

    fn descriptor(company: Option<&str>, title: Option<&str>) -> FilenameDescriptor {
        FilenameDescriptor {
            company_name: company.map(String::from),
            job_title: title.map(String::from),
        }
    }

    #[test]
    fn test_filename_sanitization() {
        let d = descriptor(Some("Acme, Inc.!"), Some("Sr. Dev"));
        assert_eq!(d.filename(), "Tailored_Resume_acme__inc___sr__dev.pdf");
    }

    #[test]
    fn test_filename_fallbacks() {
        assert_eq!(descriptor(None, None).filename(), "Tailored_Resume_c_j.pdf");
        assert_eq!(
            descriptor(Some(""), Some("Go")).filename(),
            "Tailored_Resume_c_go.pdf"
        );
    }

    #[test]
    fn test_sanitize_replaces_non_ascii_one_for_one() {
        assert_eq!(sanitize_token(Some("Café Ø"), "c"), "caf___");
    }

    #[test]
    fn test_data_url_prefix() {
        let url = to_data_url(b"%PDF");
        assert_eq!(url, "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn test_deliver_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let target = DownloadDir::new(dir.path().join("downloads"));
        let doc = render_markdown("# Jane Doe\n* Go", &PageMetrics::a4());

        let delivered = deliver(&doc, &descriptor(Some("Acme"), Some("Dev")), &target).unwrap();

        assert_eq!(delivered.filename, "Tailored_Resume_acme_dev.pdf");
        assert!(delivered.data_url.starts_with("data:application/pdf;base64,"));
        let saved = std::fs::read(&delivered.location).unwrap();
        assert!(saved.starts_with(b"%PDF"));
        assert_eq!(saved.len(), delivered.size_bytes);
    }

    #[test]
    fn test_download_dir_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let target = DownloadDir::new(dir.path());
        let request = SaveRequest {
            filename: "Tailored_Resume_c_j.pdf",
            bytes: b"one",
            save_as: true,
        };
        let first = target.save(&request).unwrap();
        let second = target.save(&request).unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("Tailored_Resume_c_j (1).pdf"));
    }

    #[test]
    fn test_download_dir_rejects_path_components() {
        let dir = tempfile::tempdir().unwrap();
        let target = DownloadDir::new(dir.path());
        let err = target
            .save(&SaveRequest {
                filename: "../escape.pdf",
                bytes: b"x",
                save_as: true,
            })
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Rejected(_)));
    }

    #[test]
    fn test_rejected_save_is_delivery_error() {
        let doc = render_markdown("# Jane Doe", &PageMetrics::a4());
        let err = deliver(&doc, &FilenameDescriptor::default(), &RefusingTarget).unwrap_err();
        assert_eq!(err.user_message(), "Download failed: user cancelled");
    }
}
