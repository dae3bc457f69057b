use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Log directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Report template could not be read: {}", .path.display())]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No records were parsed from the log file")]
    NoRecordsParsed,

    #[error("Failed lines reached {ratio:.2}% of the log, threshold is {threshold}%")]
    FailureRatioExceeded { ratio: f64, threshold: u8 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[source] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to serialize report rows: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classes of fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run was misconfigured: missing directories, templates, bad config.
    Setup,
    /// The selected log file is corrupt or in an incompatible format.
    DataQuality,
    /// Reading the log or publishing the report failed.
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DirectoryNotFound(_)
            | Error::TemplateMissing { .. }
            | Error::Config(_)
            | Error::ConfigParse(_)
            | Error::InvalidPattern(_) => ErrorKind::Setup,
            Error::NoRecordsParsed | Error::FailureRatioExceeded { .. } => ErrorKind::DataQuality,
            Error::Serialize(_) | Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
