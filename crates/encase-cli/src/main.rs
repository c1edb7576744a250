//! run-encase
//!
//! Launches py-encase with personal defaults: resolves the repository type,
//! hosting identity and package version, installs py-encase when missing and
//! hands the child's exit code back to the shell.

mod args;
mod cli;
mod error;
mod logging;
mod usage;

use std::io;

use clap::Parser;
use colored::Colorize;

use cli::Cli;
use encase_config::{
    ConfigResolver, Defaults, EnvSnapshot, REPO_TYPE_DEFAULT, RepoTypeCatalog, ResolvedConfig,
};
use encase_core::{LaunchRequest, Launcher};
use encase_provision::SystemRunner;
use error::{CliError, Result};

const PROGRAM: &str = "run-encase";

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.launcher_verbose());

    let env = EnvSnapshot::from_process();
    let resolved = ConfigResolver::new(Defaults::default()).resolve(&env);

    if cli.help {
        match &resolved {
            Ok(config) => print!("{}", render_usage(config)),
            Err(e) => {
                tracing::warn!(error = %e, "configuration not loaded, listing built-in repo types");
                print!(
                    "{}",
                    usage::render(PROGRAM, &RepoTypeCatalog::builtin(), REPO_TYPE_DEFAULT)
                );
            }
        }
        return Ok(0);
    }
    let config = resolved?;

    let target = match args::split(cli.project.clone(), &cli.rest) {
        Ok(target) => target,
        Err(e) if e.wants_usage() => {
            eprint!("{}", render_usage(&config));
            if matches!(e, CliError::NoArguments) {
                return Ok(1);
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    if target.subcommand.is_empty() {
        tracing::info!("No known sub-command of py-encase is specified.");
    }

    let request = LaunchRequest {
        project: target.project,
        repo_type: cli
            .repo_type
            .clone()
            .unwrap_or_else(|| config.settings.repo_type_default.clone()),
        subcommand: target.subcommand,
        extra_args: target.extra,
        dry_run: cli.dry_run,
        echo: cli.launcher_verbose(),
        tool_verbose: cli.tool_verbose,
    };
    tracing::debug!(
        project = %request.project,
        repo_type = %request.repo_type,
        subcommand = %request.subcommand,
        "Launch request"
    );

    let runner = SystemRunner;
    let mut launcher = Launcher::new(&runner, &env, config);
    let mut stdout = io::stdout().lock();
    let code = launcher.launch(&request, &mut stdout)?;
    Ok(code)
}

fn render_usage(config: &ResolvedConfig) -> String {
    usage::render(
        PROGRAM,
        &config.catalog,
        &config.settings.repo_type_default,
    )
}
