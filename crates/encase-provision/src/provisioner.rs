//! Package installation
//!
//! Installs the package into its resolved install location with
//! `pip install --upgrade --target`, unless a usable install is already there.

use std::fs;

use encase_config::Settings;

use crate::command::{CommandRunner, Invocation};
use crate::error::{Error, Result};
use crate::version::ResolvedVersion;

/// What [`Provisioner::ensure`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The install location already exists.
    Existing,
    /// Unpinned and the default runner is already present.
    RunnerPresent,
    /// An install was needed but skipped for dry-run.
    DryRun,
    /// The installer ran successfully.
    Installed,
}

/// Ensures the package is present in its install location.
pub struct Provisioner<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    pip: &'a str,
    package: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> Provisioner<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        Self {
            runner,
            pip: &settings.pip,
            package: &settings.package,
        }
    }

    /// The installer command for `resolved`.
    pub fn install_invocation(&self, resolved: &ResolvedVersion) -> Invocation {
        Invocation::new(self.pip)
            .args(["install", "--upgrade", "--target"])
            .arg(resolved.install_dir.to_string_lossy())
            .arg(resolved.requirement(self.package))
    }

    pub fn ensure(&self, resolved: &ResolvedVersion, dry_run: bool) -> Result<ProvisionOutcome> {
        let dest = &resolved.install_dir;
        if dest.is_dir() {
            tracing::debug!(dest = %dest.display(), "using existing install");
            return Ok(ProvisionOutcome::Existing);
        }
        if resolved.is_unpinned() && resolved.runner.exists() {
            tracing::debug!(runner = %resolved.runner.display(), "runner present, not reinstalling");
            return Ok(ProvisionOutcome::RunnerPresent);
        }

        let invocation = self.install_invocation(resolved);
        if dry_run {
            tracing::info!(command = %invocation, "dry-run: skipping install");
            return Ok(ProvisionOutcome::DryRun);
        }

        tracing::info!(package = self.package, dest = %dest.display(), "installing");
        fs::create_dir_all(dest).map_err(|source| Error::Io {
            path: dest.clone(),
            source,
        })?;

        let failed = |exit_code, source| Error::Provisioning {
            package: self.package.to_string(),
            command: invocation.to_string(),
            exit_code,
            source,
        };
        let output = self
            .runner
            .run(&invocation)
            .map_err(|e| failed(None, Some(e)))?;
        if !output.success() {
            return Err(failed(Some(output.status_code), None));
        }
        Ok(ProvisionOutcome::Installed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, SystemRunner};
    use crate::version::VersionSource;
    use encase_config::{Defaults, EnvSnapshot};
    use std::cell::RefCell;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    struct Installer {
        status: i32,
        seen: RefCell<Vec<Invocation>>,
    }

    impl Installer {
        fn exiting(status: i32) -> Self {
            Self {
                status,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for Installer {
        fn run(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
            self.seen.borrow_mut().push(invocation.clone());
            Ok(CommandOutput {
                status_code: self.status,
                stdout: Vec::new(),
            })
        }
    }

    fn settings() -> Settings {
        let env = EnvSnapshot::from_pairs([("WORKTOP", "/w"), ("PIP3", "pip-x")]);
        Settings::resolve(&Defaults::default(), &env).unwrap()
    }

    fn resolved(dir: &Path, version: &str) -> ResolvedVersion {
        let install_dir = dir.join("py-encase");
        ResolvedVersion {
            version: version.to_string(),
            source: if version.is_empty() {
                VersionSource::Unpinned
            } else {
                VersionSource::Pinned
            },
            runner: install_dir.join("bin").join("py_encase"),
            install_dir,
        }
    }

    #[test]
    fn test_existing_dir_skips_install() {
        let tmp = TempDir::new().unwrap();
        let resolved = resolved(tmp.path(), "1.0");
        fs::create_dir_all(&resolved.install_dir).unwrap();
        let settings = settings();
        let runner = Installer::exiting(0);

        let outcome = Provisioner::new(&runner, &settings).ensure(&resolved, false).unwrap();
        assert_eq!(outcome, ProvisionOutcome::Existing);
        assert!(runner.seen.borrow().is_empty());
    }

    #[test]
    fn test_install_pinned() {
        let tmp = TempDir::new().unwrap();
        let resolved = resolved(tmp.path(), "0.0.30");
        let settings = settings();
        let runner = Installer::exiting(0);

        let outcome = Provisioner::new(&runner, &settings).ensure(&resolved, false).unwrap();
        assert_eq!(outcome, ProvisionOutcome::Installed);
        assert!(resolved.install_dir.is_dir());
        let seen = runner.seen.borrow();
        let dest = resolved.install_dir.to_string_lossy();
        assert_eq!(
            seen[0].argv(),
            vec!["pip-x", "install", "--upgrade", "--target", &*dest, "py-encase==0.0.30"]
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let resolved = resolved(tmp.path(), "");
        let settings = settings();
        let runner = Installer::exiting(0);

        let outcome = Provisioner::new(&runner, &settings).ensure(&resolved, true).unwrap();
        assert_eq!(outcome, ProvisionOutcome::DryRun);
        assert!(!resolved.install_dir.exists());
        assert!(runner.seen.borrow().is_empty());
    }

    #[test]
    fn test_failed_install_reports_exit_code() {
        let tmp = TempDir::new().unwrap();
        let resolved = resolved(tmp.path(), "");
        let settings = settings();
        let runner = Installer::exiting(2);

        let err = Provisioner::new(&runner, &settings)
            .ensure(&resolved, false)
            .unwrap_err();
        assert!(matches!(err, Error::Provisioning { exit_code: Some(2), .. }));
        assert!(err.to_string().starts_with("Can not install : py-encase"));
    }

    #[test]
    fn test_missing_installer_reports_os_error() {
        let tmp = TempDir::new().unwrap();
        let resolved = resolved(tmp.path(), "1");
        let env = EnvSnapshot::from_pairs([
            ("WORKTOP", "/w"),
            ("PIP3", "/nonexistent/pip-missing"),
        ]);
        let settings = Settings::resolve(&Defaults::default(), &env).unwrap();

        let err = Provisioner::new(&SystemRunner, &settings)
            .ensure(&resolved, false)
            .unwrap_err();

        assert!(matches!(err, Error::Provisioning { exit_code: None, .. }));
        assert!(err.to_string().contains("could not be started: "), "{err}");
        let source = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<io::Error>())
            .expect("spawn error kept as source");
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }
}
