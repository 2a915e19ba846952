//! Error types for lexiscan
//!
//! Every failure is fatal to the current scan run. Errors raised while a
//! page is being scanned carry the document, page and keyword so a run
//! never has to be repeated just to locate the problem.

use thiserror::Error;

/// The primary error type for lexiscan operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A document directory or file could not be found or read.
    #[error("Input access error: {0}")]
    InputAccess(String),

    /// The keyword source is malformed (no usable keywords, unreadable file, etc.)
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// A keyword cannot be used as a whitespace-bounded literal pattern.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// A report sink failed to accept a row.
    #[error("Output write error: {0}")]
    OutputWrite(String),

    /// The distribution (chart) collaborator failed.
    #[error("Chart render error: {0}")]
    ChartRender(String),

    /// Invalid or missing configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The run was cancelled between documents or pages.
    #[error("Scan cancelled before {0}")]
    Cancelled(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    /// The operation that was being attempted when the error occurred.
    pub fn operation(&self) -> &'static str {
        match self {
            ScanError::InputAccess(_) | ScanError::Io(_) => "reading input files",
            ScanError::Lexicon(_) => "reading keywords",
            ScanError::Pattern(_) | ScanError::Cancelled(_) => "scanning pages",
            ScanError::OutputWrite(_) | ScanError::Json(_) => "writing report",
            ScanError::ChartRender(_) => "writing chart",
            ScanError::Config(_) => "loading configuration",
        }
    }

    /// Append location details (document, page, keyword) to the message,
    /// keeping the error kind.
    pub fn with_context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();
        let join = |msg: String| format!("{} ({})", msg, context);
        match self {
            ScanError::InputAccess(msg) => ScanError::InputAccess(join(msg)),
            ScanError::Lexicon(msg) => ScanError::Lexicon(join(msg)),
            ScanError::Pattern(msg) => ScanError::Pattern(join(msg)),
            ScanError::OutputWrite(msg) => ScanError::OutputWrite(join(msg)),
            ScanError::ChartRender(msg) => ScanError::ChartRender(join(msg)),
            ScanError::Config(msg) => ScanError::Config(join(msg)),
            ScanError::Cancelled(msg) => ScanError::Cancelled(join(msg)),
            ScanError::Io(err) => ScanError::OutputWrite(join(err.to_string())),
            ScanError::Json(err) => ScanError::OutputWrite(join(err.to_string())),
        }
    }
}

/// A specialized `Result` type for lexiscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
