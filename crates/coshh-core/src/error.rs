use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoshhError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("value out of range: {0}")]
    RangeViolation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to load knowledge table from {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("invalid knowledge table: {0}")]
    TableInvalid(String),

    #[error("failed to load inventory from {path}: {reason}")]
    InventoryLoad { path: PathBuf, reason: String },

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
