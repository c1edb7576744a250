//! [`TestWorkspace`]: a temporary worktop and depot for launcher scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use encase_config::EnvSnapshot;
use tempfile::TempDir;

/// A temporary directory laid out as `<root>/worktop` and `<root>/depot`.
///
/// ```rust,no_run
/// use encase_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let runner = ws.plant_install("0.0.30");
/// assert!(runner.is_file());
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        let ws = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(ws.worktop()).unwrap();
        fs::create_dir_all(ws.depot()).unwrap();
        ws
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn worktop(&self) -> PathBuf {
        self.root().join("worktop")
    }

    pub fn depot(&self) -> PathBuf {
        self.root().join("depot")
    }

    /// Launcher environment pointing at this workspace, user `alice`.
    pub fn env(&self) -> EnvSnapshot {
        EnvSnapshot::from_pairs([
            ("WORKTOP", self.worktop().to_string_lossy().into_owned()),
            ("DEPOT", self.depot().to_string_lossy().into_owned()),
            ("USER", "alice".to_string()),
        ])
    }

    /// Pairs for `std::process::Command::envs` mirroring [`Self::env`].
    pub fn env_vars(&self) -> Vec<(String, String)> {
        vec![
            ("WORKTOP".into(), self.worktop().to_string_lossy().into_owned()),
            ("DEPOT".into(), self.depot().to_string_lossy().into_owned()),
            ("USER".into(), "alice".into()),
        ]
    }

    /// Install location for `version` (empty for unpinned).
    pub fn install_dir(&self, version: &str) -> PathBuf {
        if version.is_empty() {
            self.depot().join("py-encase")
        } else {
            self.depot().join(format!("py-encase-{version}"))
        }
    }

    /// Create an install with a default runner; returns the runner path.
    pub fn plant_install(&self, version: &str) -> PathBuf {
        let runner = self.install_dir(version).join("bin").join("py_encase");
        self.write_executable(&runner, "#!/bin/sh\nexit 0\n");
        runner
    }

    /// Create `<prefix>/bin/<name>`; returns its path.
    pub fn plant_project_executable(&self, prefix: &Path, name: &str) -> PathBuf {
        let path = prefix.join("bin").join(name);
        self.write_executable(&path, "#!/bin/sh\nexit 0\n");
        path
    }

    /// Write a user config file under the workspace; returns its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.root().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `content` to `path` and mark it executable.
    pub fn write_executable(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }
}
