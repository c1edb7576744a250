use std::path::PathBuf;

use crate::identity::HostingService;

/// Errors raised while looking up identities or provisioning the package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The hosting CLI could not be run, failed, or returned unusable data.
    #[error("{service} error: {reason}")]
    IdentityLookup {
        service: HostingService,
        reason: String,
    },

    /// The package install command failed or could not be spawned.
    #[error("Can not install : {package} (`{command}` {})", describe_failure(.exit_code, .source))]
    Provisioning {
        package: String,
        command: String,
        /// `None` when the installer never started.
        exit_code: Option<i32>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Filesystem error while preparing the install location.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_failure(code: &Option<i32>, source: &Option<std::io::Error>) -> String {
    match (code, source) {
        (Some(code), _) => format!("exited with status {code}"),
        (None, Some(e)) => format!("could not be started: {e}"),
        (None, None) => "could not be started".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
