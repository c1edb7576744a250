//! Project / subcommand split of the remaining arguments

use encase_core::is_known_subcommand;

use crate::error::{CliError, Result};

/// Project, subcommand and pass-through arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub project: String,
    /// Empty when no subcommand was given.
    pub subcommand: String,
    pub extra: Vec<String>,
}

/// Split `rest` given the optional `-P` project.
///
/// - a known subcommand first requires `-P`
/// - otherwise, without `-P` the first argument is the project and the
///   second (if any) the subcommand; with `-P` the first is the subcommand
pub fn split(project: Option<String>, rest: &[String]) -> Result<Target> {
    let Some((first, remain)) = rest.split_first() else {
        return Err(CliError::NoArguments);
    };

    if is_known_subcommand(first) {
        let project = project.ok_or(CliError::MissingProject)?;
        return Ok(Target {
            project,
            subcommand: first.clone(),
            extra: remain.to_vec(),
        });
    }

    Ok(match project {
        Some(project) => Target {
            project,
            subcommand: first.clone(),
            extra: remain.to_vec(),
        },
        None => match remain.split_first() {
            Some((subcommand, extra)) => Target {
                project: first.clone(),
                subcommand: subcommand.clone(),
                extra: extra.to_vec(),
            },
            None => Target {
                project: first.clone(),
                subcommand: String::new(),
                extra: Vec::new(),
            },
        },
    })
}
