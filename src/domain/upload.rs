//! Upload checks applied before a document is forwarded for analysis.

use serde::Serialize;
use thiserror::Error;

/// Formats the analysis backend can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
    Txt,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Doc => "application/msword",
            Self::Txt => "text/plain",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No document provided")]
    Missing,

    #[error("Invalid file format. Please upload a PDF, DOCX, DOC, or TXT file.")]
    UnsupportedFormat,

    #[error("File too large. Maximum file size is {limit_mb}MB.")]
    TooLarge { limit_mb: usize },
}

/// Validate an uploaded file's name and size.
pub fn validate_upload(
    file_name: &str,
    size: usize,
    max_bytes: usize,
) -> Result<DocumentFormat, UploadError> {
    if file_name.trim().is_empty() || size == 0 {
        return Err(UploadError::Missing);
    }

    let format = DocumentFormat::from_file_name(file_name).ok_or(UploadError::UnsupportedFormat)?;

    if size > max_bytes {
        return Err(UploadError::TooLarge {
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(format)
}
