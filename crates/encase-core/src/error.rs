//! Error types for encase-core

use std::path::PathBuf;

/// Result type for encase-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure class, used by the binary for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown repo-type, bad template, bad option value or config file.
    Configuration,
    /// Hosting-service account lookup failed.
    IdentityLookup,
    /// The package could not be installed.
    Provisioning,
    /// The resolved runner could not be started.
    RunnerNotFound,
    /// Filesystem failure outside the categories above.
    Io,
}

/// Errors that can occur while resolving and launching.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] encase_config::Error),

    #[error(transparent)]
    Provision(#[from] encase_provision::Error),

    #[error("Can not execute : {runner}: {source}")]
    RunnerNotFound {
        runner: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(encase_config::Error::Io { .. }) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Configuration,
            Error::Provision(encase_provision::Error::IdentityLookup { .. }) => {
                ErrorKind::IdentityLookup
            }
            Error::Provision(encase_provision::Error::Provisioning { .. }) => {
                ErrorKind::Provisioning
            }
            Error::Provision(encase_provision::Error::Io { .. }) => ErrorKind::Io,
            Error::RunnerNotFound { .. } => ErrorKind::RunnerNotFound,
        }
    }
}
