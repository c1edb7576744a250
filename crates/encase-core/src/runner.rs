//! Runner selection
//!
//! Once a project carries its own copy of the tool, that copy is used
//! directly; otherwise the centrally installed entry point runs with the
//! install location on `PYTHONPATH`.

use std::path::{Path, PathBuf};

/// Leading argument that puts the entry point in management mode.
pub const MANAGE_ARG: &str = "--manage";

/// Self-contained management executable inside a project's `bin/`.
pub const MANAGEMENT_EXECUTABLE: &str = "mng_encase";

/// Executable to launch and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerChoice {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
    /// Whether the install location must be put on the module search path.
    pub needs_search_path: bool,
}

/// Picks the runner for a subcommand.
#[derive(Debug, Clone)]
pub struct RunnerSelector<'a> {
    default_runner: &'a Path,
    module_name: String,
}

impl<'a> RunnerSelector<'a> {
    /// `default_runner` is the centrally installed entry point; `module_name`
    /// names the project-local script copy (`<module_name>.py`).
    pub fn new(default_runner: &'a Path, module_name: impl Into<String>) -> Self {
        Self {
            default_runner,
            module_name: module_name.into(),
        }
    }

    pub fn select(&self, subcommand: &str, prefix: Option<&Path>) -> RunnerChoice {
        if subcommand == "init" {
            return self.central(vec![MANAGE_ARG.to_string()]);
        }
        if let Some(prefix) = prefix {
            let bin = prefix.join("bin");
            let management = bin.join(MANAGEMENT_EXECUTABLE);
            if management.is_file() {
                return RunnerChoice {
                    program: management,
                    leading_args: Vec::new(),
                    needs_search_path: false,
                };
            }
            let script = bin.join(format!("{}.py", self.module_name));
            if script.is_file() {
                return RunnerChoice {
                    program: script,
                    leading_args: vec![MANAGE_ARG.to_string()],
                    needs_search_path: false,
                };
            }
        }
        self.central(Vec::new())
    }

    fn central(&self, leading_args: Vec<String>) -> RunnerChoice {
        RunnerChoice {
            program: self.default_runner.to_path_buf(),
            leading_args,
            needs_search_path: true,
        }
    }
}
