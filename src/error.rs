use std::fmt;
use std::io;
use thiserror::Error;

/// Stage of an archive run, reported when persisting a snapshot fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStage {
    Prepare,
    StructuredData,
    History,
    Report,
    Bundle,
}

impl fmt::Display for ArchiveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveStage::Prepare => "prepare",
            ArchiveStage::StructuredData => "structured-data",
            ArchiveStage::History => "history",
            ArchiveStage::Report => "report",
            ArchiveStage::Bundle => "bundle",
        };
        f.write_str(name)
    }
}

/// Custom error type for taskmon
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Archive failed at {stage} stage: {message}")]
    ArchiveFailed { stage: ArchiveStage, message: String },

    #[error("{0}")]
    Unknown(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for taskmon
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        MonitorError::NotFound(msg.into())
    }

    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        MonitorError::PermissionDenied(msg.into())
    }

    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        MonitorError::Timeout(msg.into())
    }

    pub fn unknown<S: Into<String>>(msg: S) -> Self {
        MonitorError::Unknown(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        MonitorError::Config(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        MonitorError::InvalidInput(msg.into())
    }

    /// Wrap any error raised while writing an archive artifact
    pub fn archive_failed<E: fmt::Display>(stage: ArchiveStage, err: E) -> Self {
        MonitorError::ArchiveFailed {
            stage,
            message: err.to_string(),
        }
    }

    /// Classify an OS error into the not-found / permission / unknown taxonomy
    pub fn from_os(err: io::Error, what: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => MonitorError::not_found(what.to_string()),
            io::ErrorKind::PermissionDenied => MonitorError::permission_denied(what.to_string()),
            _ => MonitorError::unknown(format!("{}: {}", what, err)),
        }
    }
}
