//! Error types for Feedscope services.

use thiserror::Error;

/// Result type alias using the Feedscope error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Feedscope services.
///
/// The variants split into two user-visible classes: empty-precondition
/// errors (`EmptySession`, `NoAnalysis`) map to 404, collaborator and parse
/// failures map to 5xx. Handlers must preserve that distinction.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report or reindex requested with no posts in the session
    #[error("No posts in session")]
    EmptySession,

    /// Results or digest requested before any batch was analyzed
    #[error("No analysis yet")]
    NoAnalysis,

    /// Analyzer output was not parseable as structured JSON
    #[error("Malformed analyzer output: {0}")]
    MalformedAnalysis(String),

    /// Analyzer collaborator call failed
    #[error("Analyzer error: {0}")]
    Analyzer(String),

    /// Vector index collaborator call failed
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Speech synthesizer collaborator call failed
    #[error("Speech synthesis error: {0}")]
    Speech(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error is the not-found class (empty precondition).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EmptySession | Self::NoAnalysis)
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EmptySession | Self::NoAnalysis => 404,
            Self::MalformedAnalysis(_)
            | Self::Analyzer(_)
            | Self::VectorIndex(_)
            | Self::Speech(_) => 502,
            _ => 500,
        }
    }

    /// Stable machine-readable error code for API responses.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::EmptySession => "EMPTY_SESSION",
            Self::NoAnalysis => "NO_ANALYSIS",
            Self::MalformedAnalysis(_) => "MALFORMED_ANALYSIS",
            Self::Analyzer(_) => "ANALYZER_ERROR",
            Self::VectorIndex(_) => "VECTOR_INDEX_ERROR",
            Self::Speech(_) => "SPEECH_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::EmptySession.status_code(), 404);
        assert_eq!(Error::NoAnalysis.status_code(), 404);
        assert_eq!(Error::MalformedAnalysis("bad".into()).status_code(), 502);
        assert_eq!(Error::Analyzer("down".into()).status_code(), 502);
        assert_eq!(Error::VectorIndex("down".into()).status_code(), 502);
        assert_eq!(Error::Speech("down".into()).status_code(), 502);
        assert_eq!(Error::Internal("oops".into()).status_code(), 500);
    }

    #[test]
    fn test_not_found_class() {
        assert!(Error::EmptySession.is_not_found());
        assert!(Error::NoAnalysis.is_not_found());
        assert!(!Error::Analyzer("down".into()).is_not_found());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::EmptySession.code(), "EMPTY_SESSION");
        assert_eq!(Error::NoAnalysis.code(), "NO_ANALYSIS");
        assert_eq!(Error::MalformedAnalysis("x".into()).code(), "MALFORMED_ANALYSIS");
    }
}
