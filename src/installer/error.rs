use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::installer::platform::Platform;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{tool} is not supported on {platform}")]
    UnsupportedPlatform { tool: String, platform: Platform },

    #[error("{tool} requires `{program}`, which was not found in PATH")]
    PrerequisiteMissing { tool: String, program: String },

    #[error("Preflight check failed: {0}")]
    Preflight(String),

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid status code: {status}, url={url}, body={body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to extract {path:?}: {source}")]
    Extraction {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Subprocess { program: String, status: ExitStatus },

    #[error("Failed to {action} {path:?}: {source}")]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid release listing: {0}")]
    Catalog(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl InstallError {
    /// Returns a mapper turning an `io::Error` into [`InstallError::Filesystem`]
    /// for the given action and path.
    pub fn fs(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Filesystem {
            action,
            path,
            source,
        }
    }

    pub fn extraction(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Extraction {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
