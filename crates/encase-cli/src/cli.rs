//! CLI argument parsing using clap derive

use clap::Parser;

/// Run py-encase with personal default configuration
///
/// Wrapper flags must come before the project name; everything from the
/// first positional argument on is handed to py-encase.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "run-encase", disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Repository / project name
    #[arg(short = 'P', value_name = "PROJECT")]
    pub project: Option<String>,

    /// Repository type
    #[arg(short = 't', value_name = "TYPE")]
    pub repo_type: Option<String>,

    /// Dry-run: resolve and print the command without installing or running
    #[arg(short = 'n')]
    pub dry_run: bool,

    /// Verbose messages from this launcher
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Run py-encase with --verbose (implies -v)
    #[arg(short = 'V')]
    pub tool_verbose: bool,

    /// Show usage and the available repository types
    #[arg(short = 'H')]
    pub help: bool,

    /// [PROJECT] [SUBCOMMAND] [py-encase options ...]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub rest: Vec<String>,
}

impl Cli {
    /// Launcher verbosity: `-v` or `-V`.
    pub fn launcher_verbose(&self) -> bool {
        self.verbose || self.tool_verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("run-encase").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_wrapper_flags() {
        let cli = parse(&["-P", "demo", "-t", "github", "-n", "-V", "init"]);
        assert_eq!(cli.project.as_deref(), Some("demo"));
        assert_eq!(cli.repo_type.as_deref(), Some("github"));
        assert!(cli.dry_run);
        assert!(cli.tool_verbose);
        assert!(cli.launcher_verbose());
        assert_eq!(cli.rest, vec!["init"]);
    }

    #[test]
    fn test_trailing_options_pass_through() {
        let cli = parse(&["demo", "add", "--title", "T", "-v"]);
        assert!(!cli.verbose);
        assert_eq!(cli.rest, vec!["demo", "add", "--title", "T", "-v"]);
    }

    #[test]
    fn test_no_args_is_empty_rest() {
        let cli = parse(&[]);
        assert!(cli.rest.is_empty());
        assert!(!cli.help);
    }

    #[test]
    fn test_help_flag() {
        assert!(parse(&["-H"]).help);
    }
}
