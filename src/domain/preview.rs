//! Document preview selection for the "Document View" tab.

use serde::Serialize;
use url::Url;

/// How a stored document can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewKind {
    Pdf,
    WordDoc,
    Unsupported,
}

/// Rendering strategy handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentPreview {
    /// Embedded PDF viewer.
    Pdf { url: String },
    /// Converted-HTML viewer, with the remote office viewer as fallback.
    WordDoc {
        url: String,
        #[serde(rename = "fallbackViewerUrl", skip_serializing_if = "Option::is_none")]
        fallback_viewer_url: Option<String>,
    },
    /// "Preview not available for .ext files"
    Unavailable {
        #[serde(skip_serializing_if = "Option::is_none")]
        extension: Option<String>,
    },
    /// No stored file to preview.
    Missing,
}

/// Classify a file URL by extension. Anything that is not an absolute
/// http(s) URL is `Unsupported`, whatever its extension.
pub fn classify(file_url: Option<&str>) -> PreviewKind {
    let Some(url) = file_url.and_then(parse_http_url) else {
        return PreviewKind::Unsupported;
    };

    match extension_of(url.path()).as_deref() {
        Some("pdf") => PreviewKind::Pdf,
        Some("doc" | "docx") => PreviewKind::WordDoc,
        _ => PreviewKind::Unsupported,
    }
}

impl DocumentPreview {
    pub fn select(file_url: Option<&str>, office_viewer_url: &str) -> Self {
        let Some(file_url) = file_url.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Missing;
        };

        match classify(Some(file_url)) {
            PreviewKind::Pdf => Self::Pdf {
                url: file_url.to_string(),
            },
            PreviewKind::WordDoc => Self::WordDoc {
                url: file_url.to_string(),
                fallback_viewer_url: office_viewer_link(office_viewer_url, file_url),
            },
            PreviewKind::Unsupported => Self::Unavailable {
                extension: match parse_http_url(file_url) {
                    Some(url) => extension_of(url.path()),
                    None => extension_of(file_url),
                },
            },
        }
    }

    pub fn kind(&self) -> Option<PreviewKind> {
        match self {
            Self::Pdf { .. } => Some(PreviewKind::Pdf),
            Self::WordDoc { .. } => Some(PreviewKind::WordDoc),
            Self::Unavailable { .. } => Some(PreviewKind::Unsupported),
            Self::Missing => None,
        }
    }
}

/// Resolve a backend-relative media path (`/media/...`) against the
/// backend's base URL. Other values are returned unchanged.
pub fn resolve_media_url(file_url: &str, base: &Url) -> String {
    if file_url.starts_with("/media/") {
        if let Ok(resolved) = base.join(file_url) {
            return resolved.to_string();
        }
    }
    file_url.to_string()
}

fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https")
        .then_some(url)
        .filter(|u| u.host().is_some())
}

/// Lowercased extension of the last path segment, ignoring query and fragment.
fn extension_of(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

fn office_viewer_link(viewer: &str, file_url: &str) -> Option<String> {
    Url::parse_with_params(viewer, &[("src", file_url)])
        .ok()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWER: &str = "https://view.officeapps.live.com/op/embed.aspx";

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(classify(Some("https://files.example.com/report.PDF")), PreviewKind::Pdf);
        assert_eq!(classify(Some("http://localhost:8000/media/notes.docx")), PreviewKind::WordDoc);
        assert_eq!(classify(Some("http://localhost:8000/media/old.doc")), PreviewKind::WordDoc);
        assert_eq!(classify(Some("https://files.example.com/data.csv")), PreviewKind::Unsupported);
    }

    #[test]
    fn missing_extension_is_unsupported() {
        assert_eq!(classify(Some("https://files.example.com/README")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("https://files.example.com/trailing.")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("https://files.example.com/")), PreviewKind::Unsupported);
        assert_eq!(classify(None), PreviewKind::Unsupported);
    }

    #[test]
    fn query_string_does_not_hide_extension() {
        assert_eq!(
            classify(Some("https://cdn.example.com/a/report.pdf?token=abc#page=2")),
            PreviewKind::Pdf
        );
    }

    #[test]
    fn non_http_or_relative_urls_are_unsupported() {
        assert_eq!(classify(Some("report.pdf")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("/media/documents/report.pdf")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("file:///tmp/report.pdf")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("ftp://example.com/report.pdf")), PreviewKind::Unsupported);
        assert_eq!(classify(Some("")), PreviewKind::Unsupported);
    }

    #[test]
    fn word_preview_carries_encoded_fallback() {
        let preview = DocumentPreview::select(Some("https://example.com/my essay.docx"), VIEWER);

        let DocumentPreview::WordDoc { url, fallback_viewer_url } = preview else {
            panic!("expected word preview");
        };
        assert_eq!(url, "https://example.com/my essay.docx");
        let fallback = fallback_viewer_url.expect("fallback link");
        assert!(fallback.starts_with(VIEWER));
        assert!(fallback.contains("src=https%3A%2F%2Fexample.com%2Fmy"));
    }

    #[test]
    fn unsupported_preview_reports_extension() {
        assert_eq!(
            DocumentPreview::select(Some("https://example.com/data.CSV"), VIEWER),
            DocumentPreview::Unavailable {
                extension: Some("csv".to_string())
            }
        );
        assert_eq!(DocumentPreview::select(None, VIEWER), DocumentPreview::Missing);
        assert_eq!(DocumentPreview::select(Some("   "), VIEWER), DocumentPreview::Missing);
    }

    #[test]
    fn relative_media_paths_resolve_against_backend() {
        let base = Url::parse("http://localhost:8000/").unwrap();

        assert_eq!(
            resolve_media_url("/media/documents/essay.pdf", &base),
            "http://localhost:8000/media/documents/essay.pdf"
        );
        assert_eq!(
            resolve_media_url("https://cdn.example.com/essay.pdf", &base),
            "https://cdn.example.com/essay.pdf"
        );
    }
}
