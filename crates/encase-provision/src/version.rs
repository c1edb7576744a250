//! Package version resolution
//!
//! The version is decided once per run: an explicit pin wins, otherwise the
//! newest release reported by `pip index versions` is used, and when that
//! fails the package is installed unpinned. The install location and the
//! default runner path follow from the version.

use std::path::PathBuf;
use std::sync::{LazyLock, OnceLock};

use encase_config::Settings;
use regex::Regex;

use crate::command::{CommandRunner, Invocation};

/// First line of `pip index versions`, e.g. `py-encase (0.0.30)`.
static INDEX_VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s]+\s*\(([\d.]+)\)").unwrap());

/// Where the version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Environment or compiled-in pin.
    Pinned,
    /// Newest release reported by the package index.
    Detected,
    /// Detection failed; no version constraint.
    Unpinned,
}

/// Outcome of version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Version string, empty when unpinned.
    pub version: String,
    pub source: VersionSource,
    pub install_dir: PathBuf,
    /// Default runner: `<install_dir>/bin/<module name>`.
    pub runner: PathBuf,
}

impl ResolvedVersion {
    pub fn is_unpinned(&self) -> bool {
        self.version.is_empty()
    }

    /// Requirement passed to pip: `pkg==ver`, or just `pkg` when unpinned.
    pub fn requirement(&self, package: &str) -> String {
        if self.is_unpinned() {
            package.to_string()
        } else {
            format!("{package}=={}", self.version)
        }
    }
}

/// Extract the newest version from `pip index versions` output.
///
/// Only the first non-blank line is considered.
pub fn parse_index_version(output: &str) -> Option<String> {
    let first = output.lines().map(str::trim).find(|l| !l.is_empty())?;
    INDEX_VERSION_PATTERN
        .captures(first)
        .map(|caps| caps[1].to_string())
}

/// Resolves the package version at most once.
pub struct VersionResolver<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    settings: &'a Settings,
    resolved: OnceLock<ResolvedVersion>,
}

impl<'a, R: CommandRunner + ?Sized> VersionResolver<'a, R> {
    pub fn new(runner: &'a R, settings: &'a Settings) -> Self {
        Self {
            runner,
            settings,
            resolved: OnceLock::new(),
        }
    }

    /// Resolve the version; later calls return the first result unchanged.
    pub fn resolve(&self) -> &ResolvedVersion {
        self.resolved.get_or_init(|| self.compute())
    }

    fn compute(&self) -> ResolvedVersion {
        let (version, source) = match &self.settings.pinned_version {
            Some(pin) => (pin.clone(), VersionSource::Pinned),
            None => match self.detect() {
                Some(version) => (version, VersionSource::Detected),
                None => (String::new(), VersionSource::Unpinned),
            },
        };

        let install_dir = match &self.settings.dest_override {
            Some(dest) => dest.clone(),
            None if version.is_empty() => self.settings.depot.join(&self.settings.package),
            None => self
                .settings
                .depot
                .join(format!("{}-{version}", self.settings.package)),
        };
        let runner = install_dir.join("bin").join(self.settings.module_name());

        tracing::debug!(
            version = %version,
            ?source,
            install_dir = %install_dir.display(),
            "package version resolved"
        );
        ResolvedVersion {
            version,
            source,
            install_dir,
            runner,
        }
    }

    fn detect(&self) -> Option<String> {
        let invocation = Invocation::new(&self.settings.pip)
            .args(["index", "versions"])
            .arg(&self.settings.package)
            .capture();
        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(command = %invocation, error = %e, "version detection failed");
                return None;
            }
        };
        if !output.success() {
            tracing::debug!(
                command = %invocation,
                status = output.status_code,
                "version detection failed"
            );
            return None;
        }
        let version = parse_index_version(&output.stdout_text());
        if version.is_none() {
            tracing::debug!(command = %invocation, "unrecognised package index output");
        }
        version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use encase_config::{Defaults, EnvSnapshot};
    use rstest::rstest;
    use std::cell::Cell;
    use std::io;
    use std::path::Path;

    struct CountingIndex {
        calls: Cell<usize>,
        reply: Option<&'static str>,
    }

    impl CommandRunner for CountingIndex {
        fn run(&self, _invocation: &Invocation) -> io::Result<CommandOutput> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                Some(text) => Ok(CommandOutput {
                    status_code: 0,
                    stdout: text.as_bytes().to_vec(),
                }),
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }
    }

    fn settings(extra: &[(&str, &str)]) -> Settings {
        let env = EnvSnapshot::from_pairs([("WORKTOP", "/w"), ("DEPOT", "/depot")])
            .with("USER", "alice");
        let env = extra
            .iter()
            .fold(env, |env, (k, v)| env.with(*k, *v));
        Settings::resolve(&Defaults::default(), &env).unwrap()
    }

    #[rstest]
    #[case("py-encase (0.0.30)\nAvailable versions: 0.0.30, 0.0.29\n", Some("0.0.30"))]
    #[case("\n\n  py-encase (1.2)  \n", Some("1.2"))]
    #[case("py-encase(3.4.5)", Some("3.4.5"))]
    #[case("WARNING: something\npy-encase (0.0.30)\n", None)]
    #[case("py-encase (0.0.30rc1)", None)]
    #[case("", None)]
    fn test_parse_index_version(#[case] output: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_index_version(output).as_deref(), expected);
    }

    #[test]
    fn test_pinned_version_skips_detection() {
        let settings = settings(&[("PY_MOD_VER", "0.0.30")]);
        let index = CountingIndex {
            calls: Cell::new(0),
            reply: Some("py-encase (9.9.9)"),
        };
        let resolved = VersionResolver::new(&index, &settings).resolve().clone();
        assert_eq!(index.calls.get(), 0);
        assert_eq!(resolved.source, VersionSource::Pinned);
        assert_eq!(resolved.install_dir, Path::new("/depot/py-encase-0.0.30"));
        assert_eq!(resolved.runner, Path::new("/depot/py-encase-0.0.30/bin/py_encase"));
        assert_eq!(resolved.requirement("py-encase"), "py-encase==0.0.30");
    }

    #[test]
    fn test_detection_is_memoized() {
        let settings = settings(&[]);
        let index = CountingIndex {
            calls: Cell::new(0),
            reply: Some("py-encase (0.0.31)\n"),
        };
        let resolver = VersionResolver::new(&index, &settings);
        let first = resolver.resolve().clone();
        let second = resolver.resolve().clone();
        assert_eq!(index.calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(first.version, "0.0.31");
        assert_eq!(first.source, VersionSource::Detected);
    }

    #[test]
    fn test_detection_failure_is_unpinned() {
        let settings = settings(&[]);
        let index = CountingIndex {
            calls: Cell::new(0),
            reply: None,
        };
        let resolved = VersionResolver::new(&index, &settings).resolve().clone();
        assert!(resolved.is_unpinned());
        assert_eq!(resolved.source, VersionSource::Unpinned);
        assert_eq!(resolved.install_dir, Path::new("/depot/py-encase"));
        assert_eq!(resolved.requirement("py-encase"), "py-encase");
    }

    enum DestSource {
        Env,
        Compiled,
    }

    #[rstest]
    fn test_dest_override_ignores_version(
        #[values(
            (Some("1.2.3"), None, "1.2.3"),
            (None, None, ""),
            (None, Some("WARNING: index unavailable\n"), "")
        )]
        case: (Option<&str>, Option<&'static str>, &str),
        #[values(DestSource::Env, DestSource::Compiled)] dest: DestSource,
    ) {
        let (pin, reply, expected_version) = case;
        let mut defaults = Defaults::default();
        let mut env = EnvSnapshot::from_pairs([("WORKTOP", "/w"), ("DEPOT", "/depot")]);
        match dest {
            DestSource::Env => env = env.with("PY_MOD_DEST", "/opt/encase"),
            DestSource::Compiled => defaults.dest = Some("/opt/encase".into()),
        }
        if let Some(pin) = pin {
            env = env.with("PY_MOD_VER", pin);
        }
        let settings = Settings::resolve(&defaults, &env).unwrap();
        let index = CountingIndex {
            calls: Cell::new(0),
            reply,
        };

        let resolved = VersionResolver::new(&index, &settings).resolve().clone();

        assert_eq!(resolved.version, expected_version);
        assert_eq!(resolved.install_dir, Path::new("/opt/encase"));
        assert_eq!(resolved.runner, Path::new("/opt/encase/bin/py_encase"));
    }
}
