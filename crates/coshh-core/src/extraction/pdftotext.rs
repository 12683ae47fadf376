use crate::error::CoshhError;
use crate::extraction::TextExtractor;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so composition tables keep their columns.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, CoshhError> {
        if bytes.is_empty() {
            return Err(CoshhError::Extraction("document is empty".into()));
        }

        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| CoshhError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(bytes)
            .map_err(|e| CoshhError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CoshhError::PdftotextNotFound
                } else {
                    CoshhError::Extraction(format!("pdftotext failed: {e}"))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(CoshhError::PdftotextFailed { code, stderr });
        }

        // Pages are separated by form feeds; keep them as blank lines so
        // section markers at the top of a page still start a line.
        let text = String::from_utf8_lossy(&output.stdout).replace('\x0c', "\n");
        tracing::debug!(chars = text.len(), "pdftotext extraction complete");
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_rejected() {
        let err = PdftotextExtractor::new().extract_text(&[]).unwrap_err();
        assert!(matches!(err, CoshhError::Extraction(_)));
    }

    #[test]
    fn test_non_pdf_bytes_fail() {
        if !PdftotextExtractor::is_available() {
            return;
        }
        let err = PdftotextExtractor::new()
            .extract_text(b"SECTION 1: not a pdf")
            .unwrap_err();
        assert!(matches!(err, CoshhError::PdftotextFailed { .. }));
    }
}
