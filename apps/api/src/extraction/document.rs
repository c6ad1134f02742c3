//! Resume decoding: turns uploaded bytes into text for the matching core.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    PlainText,
    Pdf,
}

impl ResumeFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, AppError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => Ok(ResumeFormat::PlainText),
            Some("pdf") => Ok(ResumeFormat::Pdf),
            _ => Err(AppError::UnsupportedFileType(file_name.to_string())),
        }
    }
}

/// Decodes an uploaded resume into text.
///
/// Undecodable input is a `MalformedInput` failure, never an empty resume.
/// PDF extraction is CPU-bound and runs on the blocking pool.
pub async fn decode_resume(file_name: &str, bytes: Bytes) -> Result<String, AppError> {
    match ResumeFormat::from_file_name(file_name)? {
        ResumeFormat::PlainText => decode_plain_text(&bytes),
        ResumeFormat::Pdf => {
            let name = file_name.to_string();
            tokio::task::spawn_blocking(move || extract_pdf_text(&name, &bytes))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        }
    }
}

pub fn decode_plain_text(bytes: &[u8]) -> Result<String, AppError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        AppError::MalformedInput(format!(
            "resume is not valid UTF-8 text (invalid byte at offset {})",
            e.utf8_error().valid_up_to()
        ))
    })
}

fn extract_pdf_text(file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!("PDF extraction failed for '{file_name}': {e}");
        AppError::MalformedInput(format!("could not extract text from PDF '{file_name}'"))
    })?;

    if text.trim().is_empty() {
        return Err(AppError::MalformedInput(format!(
            "PDF '{file_name}' contains no extractable text"
        )));
    }

    debug!("Extracted {} characters from '{file_name}'", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(
            ResumeFormat::from_file_name("cv.TXT").unwrap(),
            ResumeFormat::PlainText
        );
        assert_eq!(
            ResumeFormat::from_file_name("resume.final.pdf").unwrap(),
            ResumeFormat::Pdf
        );
    }

    #[test]
    fn test_unsupported_extensions_are_rejected() {
        for name in ["resume.docx", "resume", "notes.md"] {
            assert!(matches!(
                ResumeFormat::from_file_name(name),
                Err(AppError::UnsupportedFileType(n)) if n == name
            ));
        }
    }

    #[tokio::test]
    async fn test_plain_text_is_decoded() {
        let text = decode_resume("cv.txt", Bytes::from_static(b"Jane Doe\nPython"))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nPython");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_malformed_input() {
        let err = decode_resume("cv.txt", Bytes::from_static(&[0x4a, 0xff, 0xfe]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(msg) if msg.contains("offset 1")));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_malformed_input() {
        let err = decode_resume("cv.pdf", Bytes::from_static(b"not a pdf at all"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }
}
