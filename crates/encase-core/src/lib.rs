//! Resolution and command composition for run-encase
//!
//! Ties the configuration layer and the external-process layer together:
//! the repo-type pass, runner selection, the per-subcommand option tables
//! and the launch pipeline that composes and executes the final command.

pub mod error;
pub mod launch;
pub mod options;
pub mod repo_type;
pub mod runner;

pub use error::{Error, ErrorKind, Result};
pub use launch::{LaunchPlan, LaunchRequest, Launcher, SEARCH_PATH_VAR, search_path_value};
pub use options::{Binding, OptionBuilder, SUBCOMMANDS, bindings, is_known_subcommand};
pub use repo_type::RepoTypeResolution;
pub use runner::{MANAGE_ARG, MANAGEMENT_EXECUTABLE, RunnerChoice, RunnerSelector};
