//! Launch pipeline
//!
//! Runs the stages in order: repo-type pass, user flags, version resolution,
//! provisioning, runner selection, option building. The resulting
//! [`LaunchPlan`] is echoed and, unless dry-run, executed with the child's
//! exit code handed back to the caller.

use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use encase_config::{EnvSnapshot, Layer, OptionKey, OptionValue, ResolvedConfig};
use encase_provision::{
    CommandRunner, IdentityResolver, Invocation, ProvisionOutcome, Provisioner, ResolvedVersion,
    VersionResolver,
};

use crate::options::OptionBuilder;
use crate::repo_type::{self, RepoTypeResolution};
use crate::runner::{RunnerChoice, RunnerSelector};
use crate::{Error, Result};

/// Module search-path variable extended for the central install.
pub const SEARCH_PATH_VAR: &str = "PYTHONPATH";

#[cfg(windows)]
const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_SEPARATOR: char = ':';

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub project: String,
    pub repo_type: String,
    /// py-encase subcommand; may be empty.
    pub subcommand: String,
    /// Arguments passed through after the default options.
    pub extra_args: Vec<String>,
    /// Resolve and echo only.
    pub dry_run: bool,
    /// Echo the composed command before running it.
    pub echo: bool,
    /// Pass `--verbose` to py-encase.
    pub tool_verbose: bool,
}

/// Fully composed launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub repo: RepoTypeResolution,
    pub version: ResolvedVersion,
    pub provision: ProvisionOutcome,
    pub runner: RunnerChoice,
    pub invocation: Invocation,
}

impl LaunchPlan {
    /// Human-readable command line as printed for dry-run and verbose runs.
    pub fn echo_line(&self) -> String {
        let command = self.invocation.argv().join(" ");
        if self.runner.needs_search_path {
            format!(
                "env {SEARCH_PATH_VAR}=\"{}{PATH_SEPARATOR}${SEARCH_PATH_VAR}\" {command}",
                self.version.install_dir.display()
            )
        } else {
            command
        }
    }
}

/// `<dest>` followed by any existing search path.
pub fn search_path_value(dest: &Path, existing: Option<&str>) -> String {
    let dest = dest.to_string_lossy();
    match existing {
        Some(old) if !old.is_empty() => format!("{dest}{PATH_SEPARATOR}{old}"),
        _ => dest.into_owned(),
    }
}

/// Drives a single launch.
pub struct Launcher<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    env: &'a EnvSnapshot,
    config: ResolvedConfig,
    /// Resolved on the first plan and reused afterwards.
    version: OnceLock<ResolvedVersion>,
}

impl<'a, R: CommandRunner + ?Sized> Launcher<'a, R> {
    pub fn new(runner: &'a R, env: &'a EnvSnapshot, config: ResolvedConfig) -> Self {
        Self {
            runner,
            env,
            config,
            version: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Resolve everything up to the final command; installs unless dry-run.
    pub fn plan(&mut self, request: &LaunchRequest) -> Result<LaunchPlan> {
        let settings = &self.config.settings;
        let identity = IdentityResolver::new(self.runner, self.env, &settings.gh, &settings.glab);
        let repo = repo_type::resolve(
            &self.config.catalog,
            &request.repo_type,
            &request.project,
            &mut self.config.store,
            settings,
            &identity,
        )?;
        if request.tool_verbose {
            self.config
                .store
                .set(OptionKey::VerboseFlag, OptionValue::Flag(true), Layer::User)?;
        }

        let version = self
            .version
            .get_or_init(|| VersionResolver::new(self.runner, settings).resolve().clone())
            .clone();
        let provision = Provisioner::new(self.runner, settings).ensure(&version, request.dry_run)?;

        let prefix = self.config.store.value(OptionKey::Prefix).map(Path::new);
        let runner = RunnerSelector::new(&version.runner, settings.module_name())
            .select(&request.subcommand, prefix);

        let mut invocation = Invocation::new(runner.program.to_string_lossy())
            .args(runner.leading_args.iter().cloned());
        if !request.subcommand.is_empty() {
            invocation = invocation.arg(&request.subcommand);
        }
        invocation = invocation
            .args(OptionBuilder::new(&self.config.store, &settings.pip).build(&request.subcommand))
            .args(request.extra_args.iter().cloned());
        if runner.needs_search_path {
            let value = search_path_value(&version.install_dir, self.env.get(SEARCH_PATH_VAR));
            invocation = invocation.env(SEARCH_PATH_VAR, value);
        }

        tracing::debug!(
            runner = %runner.program.display(),
            python = %settings.python,
            search_path = runner.needs_search_path,
            "launch composed"
        );
        Ok(LaunchPlan {
            repo,
            version,
            provision,
            runner,
            invocation,
        })
    }

    /// Plan, echo to `out` when asked, and execute unless dry-run.
    ///
    /// Returns the runner's exit code (0 for dry-run).
    pub fn launch(&mut self, request: &LaunchRequest, out: &mut dyn Write) -> Result<i32> {
        let plan = self.plan(request)?;
        if request.dry_run || request.echo {
            if let Err(e) = writeln!(out, "{}", plan.echo_line()) {
                tracing::debug!(error = %e, "could not echo command");
            }
        }
        if request.dry_run {
            return Ok(0);
        }
        let output = self
            .runner
            .run(&plan.invocation)
            .map_err(|source| Error::RunnerNotFound {
                runner: plan.runner.program.clone(),
                source,
            })?;
        if !output.success() {
            tracing::debug!(code = output.status_code, "runner exited non-zero");
        }
        Ok(output.status_code)
    }
}
