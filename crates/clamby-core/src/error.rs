use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for clamby operations
pub type Result<T> = std::result::Result<T, ClambyError>;

/// Errors raised while invoking the ClamAV tools
#[derive(Error, Debug)]
pub enum ClambyError {
    /// The requested executable is not one of the permitted ClamAV tools
    #[error("`{name}` is not permitted")]
    UnpermittedExecutable {
        /// Name that was requested
        name: String,
    },

    /// The scan target does not exist or is not a regular file
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested for scanning
        path: PathBuf,
    },

    /// The scanner reported an infection
    #[error("VIRUS DETECTED on {detected_at}: {}", path.display())]
    VirusDetected {
        /// Path of the infected file
        path: PathBuf,
        /// When the detection was classified
        detected_at: DateTime<Utc>,
    },

    /// The daemon client failed for a reason other than a detection
    #[error("clamscan client error (exit status {status:?})")]
    ClamscanClientError {
        /// Exit status of the client, if it exited normally
        status: Option<i32>,
    },

    /// An option had the wrong type or a config file could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClambyError {
    /// Returns true if configuration decides whether this condition is raised.
    ///
    /// `UnpermittedExecutable` is always fatal.
    #[must_use]
    pub const fn is_configurable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. } | Self::VirusDetected { .. } | Self::ClamscanClientError { .. }
        )
    }

    /// Returns true if the error reports an actual detection
    #[must_use]
    pub const fn is_detection(&self) -> bool {
        matches!(self, Self::VirusDetected { .. })
    }
}

impl From<toml::de::Error> for ClambyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ClambyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
