//! Document source resolution: a local file or a fetched URL
//!
//! The conversion core treats the resulting bytes identically regardless of
//! where they came from.

use std::fs;
use std::path::Path;

use log::warn;

use crate::status::StatusReporter;

/// Raw document bytes plus the display name they arrived under.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    pub bytes: Vec<u8>,
    pub name: String,
}

/// Fetching or reading the document failed before the engine ever saw it.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the URL does not appear to be a PDF (content type {content_type:?})")]
    NotPdf { content_type: Option<String> },

    #[error("file:// URLs cannot be fetched; pass the path directly instead")]
    LocalFileUrl,
}

/// Read a local file, using its file name as the display name.
pub fn from_path(path: &Path) -> Result<SourceDocument, FetchError> {
    let bytes = fs::read(path).map_err(|source| FetchError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    Ok(SourceDocument { bytes, name })
}

/// Fetch a remote document in a single attempt.
///
/// URLs that do not look like PDFs are still attempted when the response
/// declares a PDF content type, with a warning; anything else is refused.
pub fn from_url(url: &str, status: &mut dyn StatusReporter) -> Result<SourceDocument, FetchError> {
    if url.starts_with("file://") {
        return Err(FetchError::LocalFileUrl);
    }

    let looks_like_pdf = is_pdf_url(url);
    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus {
            status: response.status().as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    if !looks_like_pdf {
        match &content_type {
            Some(ct) if ct.to_lowercase().contains("pdf") => {
                status.status(
                    "Warning: URL does not end with .pdf, but the server says it serves one. \
                     Attempting to load...",
                );
                warn!("accepting non-.pdf URL on content type {ct}: {url}");
            }
            _ => return Err(FetchError::NotPdf { content_type }),
        }
    }

    let bytes = response.bytes()?.to_vec();
    Ok(SourceDocument {
        bytes,
        name: url_file_name(url),
    })
}

/// True when the URL names a PDF outright: a `.pdf` suffix or a `.pdf#`
/// fragment anchor.
fn is_pdf_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.ends_with(".pdf") || lower.contains(".pdf#")
}

/// Display name for a fetched document: everything after the last slash,
/// or a fixed fallback when that is empty.
fn url_file_name(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        "browser_pdf".to_string()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_urls_are_recognized() {
        assert!(is_pdf_url("https://example.com/paper.pdf"));
        assert!(is_pdf_url("https://example.com/PAPER.PDF"));
        assert!(is_pdf_url("https://example.com/paper.pdf#page=3"));
        assert!(!is_pdf_url("https://example.com/paper"));
        assert!(!is_pdf_url("https://example.com/paper.pdfx"));
    }

    #[test]
    fn file_name_comes_from_last_segment() {
        assert_eq!(url_file_name("https://example.com/docs/paper.pdf"), "paper.pdf");
        assert_eq!(url_file_name("https://example.com/docs/"), "browser_pdf");
    }

    #[test]
    fn reading_a_missing_path_fails() {
        let err = from_path(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, FetchError::Read { .. }));
    }
}
