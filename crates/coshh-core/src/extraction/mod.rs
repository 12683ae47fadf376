pub mod msds;
pub mod pdftotext;
pub mod sections;

use crate::error::CoshhError;

pub use msds::{extract_hazard_facts, HazardFacts};

/// Trait for document text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of a document.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, CoshhError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Backend for documents that are already text. Invalid UTF-8 is replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, CoshhError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn backend_name(&self) -> &str {
        "plain-text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_lossy() {
        let text = PlainTextExtractor
            .extract_text(b"H350 \xff May cause cancer")
            .unwrap();
        assert!(text.starts_with("H350 "));
        assert!(text.contains('\u{FFFD}'));
        assert_eq!(PlainTextExtractor.backend_name(), "plain-text");
    }
}
