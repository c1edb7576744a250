//! Error types for encase-config

use std::path::PathBuf;

use crate::keys::{OptionKey, OptionKind};

/// Result type for encase-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building configuration.
///
/// Every variant is a configuration error: resolution stops before any
/// provisioning or execution takes place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown or unsupported repo_type '{name}'")]
    UnknownRepoType { name: String },

    #[error("repo_type '{name}' has no prefix_template")]
    MissingPathTemplate { name: String },

    #[error("unresolvable placeholder '{{{placeholder}}}' in template '{template}'")]
    UnresolvedPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("malformed template '{template}': {message}")]
    MalformedTemplate { template: String, message: String },

    #[error("unknown option key '{key}' in {origin}")]
    UnknownOptionKey { key: String, origin: String },

    #[error("option '{key}' expects a {expected} value, got {found} (from {origin})")]
    InvalidOptionValue {
        key: OptionKey,
        expected: OptionKind,
        found: String,
        origin: String,
    },

    #[error("unknown identity mode '{mode}' for repo_type '{name}'")]
    UnknownIdentityMode { name: String, mode: String },

    #[error("Could not determine home directory; set WORKTOP")]
    HomeDirUnavailable,

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_placeholder_display_keeps_braces() {
        let err = Error::UnresolvedPlaceholder {
            template: "{worktop}/{nope}".to_string(),
            placeholder: "nope".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("'{nope}'"), "got: {display}");
        assert!(display.contains("{worktop}/{nope}"));
    }

    #[test]
    fn test_invalid_value_display_names_key_and_origin() {
        let err = Error::InvalidOptionValue {
            key: OptionKey::Readme,
            expected: OptionKind::Flag,
            found: "\"maybe\"".to_string(),
            origin: "ENCASE_README".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("readme"));
        assert!(display.contains("flag"));
        assert!(display.contains("ENCASE_README"));
    }
}
