//! Error types for the run-encase binary

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from encase-core
    #[error(transparent)]
    Core(#[from] encase_core::Error),

    /// Error while loading configuration
    #[error(transparent)]
    Config(#[from] encase_config::Error),

    /// No project / subcommand arguments at all
    #[error("No project or subcommand given")]
    NoArguments,

    /// A known subcommand came first but `-P` was not given
    #[error("Project name is not specified")]
    MissingProject,
}

impl CliError {
    /// Argument errors are reported together with the usage text.
    pub fn wants_usage(&self) -> bool {
        matches!(self, CliError::NoArguments | CliError::MissingProject)
    }
}
