//! Compiled-in defaults and launcher settings
//!
//! [`Defaults`] is the immutable record of configurable values that ships
//! with the binary. [`Settings`] is what the launcher actually uses: the
//! defaults with environment variables folded in once at startup.

use std::path::PathBuf;

use crate::keys::{OptionKey, OptionValue};
use crate::{EnvSnapshot, Error, Result};

/// Name of the managed package.
pub const PACKAGE_NAME: &str = "py-encase";

/// Repo-type used when `-t` is not given.
pub const REPO_TYPE_DEFAULT: &str = "local";

/// Compiled-in configuration record.
///
/// `None` fields fall back to the environment and then to derived defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub package: String,
    pub python: Option<String>,
    pub pip: Option<String>,
    /// Pinned package version; `None` or empty means auto-detect.
    pub version: Option<String>,
    pub worktop: Option<PathBuf>,
    pub depot: Option<PathBuf>,
    /// Install location used regardless of version.
    pub dest: Option<PathBuf>,
    pub gh: Option<String>,
    pub glab: Option<String>,
    pub repo_type_default: String,
    /// Built-in option values; keys not listed start neutral.
    pub options: Vec<(OptionKey, OptionValue)>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            package: PACKAGE_NAME.to_string(),
            python: None,
            pip: None,
            version: None,
            worktop: None,
            depot: None,
            dest: None,
            gh: None,
            glab: None,
            repo_type_default: REPO_TYPE_DEFAULT.to_string(),
            options: Vec::new(),
        }
    }
}

/// Effective launcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub package: String,
    pub pip: String,
    pub python: String,
    /// Explicitly requested version (environment or pin), trimmed and non-empty.
    pub pinned_version: Option<String>,
    pub worktop: PathBuf,
    pub depot: PathBuf,
    pub dest_override: Option<PathBuf>,
    pub gh: String,
    pub glab: String,
    /// Local OS user, empty when unknown.
    pub user: String,
    pub repo_type_default: String,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Settings {
    /// Fold environment overrides into `defaults`.
    ///
    /// Environment wins over the compiled-in value for every setting.
    pub fn resolve(defaults: &Defaults, env: &EnvSnapshot) -> Result<Self> {
        let pip = env
            .first_non_empty(&["PIP3", "PIP"])
            .map(str::to_string)
            .or_else(|| defaults.pip.clone())
            .unwrap_or_else(|| "pip3".to_string());
        let python = env
            .first_non_empty(&["PYTHON3", "PYTHON"])
            .map(str::to_string)
            .or_else(|| defaults.python.clone())
            .unwrap_or_else(|| "python3".to_string());
        let pinned_version =
            non_empty(env.get("PY_MOD_VER")).or_else(|| non_empty(defaults.version.as_deref()));

        let worktop = match env.first_non_empty(&["WORKTOP"]) {
            Some(path) => PathBuf::from(path),
            None => match &defaults.worktop {
                Some(path) => path.clone(),
                None => dirs::home_dir()
                    .ok_or(Error::HomeDirUnavailable)?
                    .join("Documents")
                    .join("workspace"),
            },
        };
        let depot = env
            .first_non_empty(&["DEPOT"])
            .map(PathBuf::from)
            .or_else(|| defaults.depot.clone())
            .unwrap_or_else(|| worktop.join("opr").join("depot"));
        let dest_override = env
            .first_non_empty(&["PY_MOD_DEST"])
            .map(PathBuf::from)
            .or_else(|| defaults.dest.clone());

        let gh = env
            .first_non_empty(&["GH"])
            .map(str::to_string)
            .or_else(|| defaults.gh.clone())
            .unwrap_or_else(|| "gh".to_string());
        let glab = env
            .first_non_empty(&["GLAB"])
            .map(str::to_string)
            .or_else(|| defaults.glab.clone())
            .unwrap_or_else(|| "glab".to_string());
        let user = env
            .first_non_empty(&["USER", "USERNAME"])
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            package: defaults.package.clone(),
            pip,
            python,
            pinned_version,
            worktop,
            depot,
            dest_override,
            gh,
            glab,
            user,
            repo_type_default: defaults.repo_type_default.clone(),
        })
    }

    /// Package name with `-` normalised to `_` (the entry-point file name).
    pub fn module_name(&self) -> String {
        self.package.replace('-', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn base_env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([("WORKTOP", "/w"), ("USER", "alice")])
    }

    #[test]
    fn test_derived_defaults() {
        let settings = Settings::resolve(&Defaults::default(), &base_env()).unwrap();
        assert_eq!(settings.pip, "pip3");
        assert_eq!(settings.python, "python3");
        assert_eq!(settings.worktop, Path::new("/w"));
        assert_eq!(settings.depot, Path::new("/w/opr/depot"));
        assert_eq!(settings.dest_override, None);
        assert_eq!(settings.pinned_version, None);
        assert_eq!(settings.gh, "gh");
        assert_eq!(settings.glab, "glab");
        assert_eq!(settings.user, "alice");
        assert_eq!(settings.repo_type_default, "local");
        assert_eq!(settings.module_name(), "py_encase");
    }

    #[test]
    fn test_environment_beats_compiled_in() {
        let defaults = Defaults {
            pip: Some("pip-default".into()),
            version: Some("0.0.1".into()),
            depot: Some("/compiled/depot".into()),
            dest: Some("/compiled/dest".into()),
            gh: Some("gh-compiled".into()),
            ..Defaults::default()
        };
        let env = base_env()
            .with("PIP3", "pip-env")
            .with("PY_MOD_VER", " 0.0.30 ")
            .with("DEPOT", "/env/depot")
            .with("PY_MOD_DEST", "/env/dest")
            .with("GH", "gh-env");
        let settings = Settings::resolve(&defaults, &env).unwrap();

        assert_eq!(settings.pip, "pip-env");
        assert_eq!(settings.pinned_version.as_deref(), Some("0.0.30"));
        assert_eq!(settings.depot, Path::new("/env/depot"));
        assert_eq!(settings.dest_override.as_deref(), Some(Path::new("/env/dest")));
        assert_eq!(settings.gh, "gh-env");
    }

    #[test]
    fn test_compiled_in_used_when_env_missing() {
        let defaults = Defaults {
            version: Some("1.2.3".into()),
            dest: Some("/compiled/dest".into()),
            ..Defaults::default()
        };
        let settings = Settings::resolve(&defaults, &base_env()).unwrap();
        assert_eq!(settings.pinned_version.as_deref(), Some("1.2.3"));
        assert_eq!(
            settings.dest_override.as_deref(),
            Some(Path::new("/compiled/dest"))
        );
    }

    #[test]
    fn test_blank_pin_means_unpinned() {
        let defaults = Defaults {
            version: Some("  ".into()),
            ..Defaults::default()
        };
        let env = base_env().with("PY_MOD_VER", "");
        let settings = Settings::resolve(&defaults, &env).unwrap();
        assert_eq!(settings.pinned_version, None);
    }

    #[test]
    fn test_pip_falls_back_to_second_variable() {
        let env = base_env().with("PIP", "/opt/pip");
        let settings = Settings::resolve(&Defaults::default(), &env).unwrap();
        assert_eq!(settings.pip, "/opt/pip");
    }
}
