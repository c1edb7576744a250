//! User configuration file (`config.toml`)
//!
//! All sections are optional:
//!
//! ```toml
//! [settings]
//! pip = "pip3"
//! worktop = "/srv/work"
//!
//! [options]
//! readme = true
//! git_protocol = "ssh"
//!
//! [repo_types.gitea]
//! description = "Self-hosted Gitea"
//! prefix_template = "{worktop}/git_workdirs/gitea/{user}/{proj}"
//! identity = "none"
//! git_hosting = "gitea"
//! setup_git = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::{IdentityMode, RepoTypeProfile};
use crate::defaults::Defaults;
use crate::keys::{OptionKey, OptionKind, OptionValue};
use crate::{Error, Result};

/// `[settings]` section: overrides for compiled-in launcher defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    pub pip: Option<String>,
    pub python: Option<String>,
    pub version: Option<String>,
    pub worktop: Option<PathBuf>,
    pub depot: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub gh: Option<String>,
    pub glab: Option<String>,
    pub repo_type_default: Option<String>,
}

impl SettingsSection {
    /// Overlay present fields onto `defaults`.
    pub fn apply_to(&self, defaults: &mut Defaults) {
        fn overlay<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        overlay(&mut defaults.pip, &self.pip);
        overlay(&mut defaults.python, &self.python);
        overlay(&mut defaults.version, &self.version);
        overlay(&mut defaults.worktop, &self.worktop);
        overlay(&mut defaults.depot, &self.depot);
        overlay(&mut defaults.dest, &self.dest);
        overlay(&mut defaults.gh, &self.gh);
        overlay(&mut defaults.glab, &self.glab);
        if let Some(name) = &self.repo_type_default {
            defaults.repo_type_default.clone_from(name);
        }
    }
}

/// `[repo_types.<name>]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepoTypeSection {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prefix_template: Option<String>,
    #[serde(default)]
    pub identity: Option<String>,
    /// Remaining keys are option overrides.
    #[serde(flatten)]
    pub overrides: BTreeMap<String, toml::Value>,
}

/// Parsed user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
    #[serde(default)]
    pub repo_types: BTreeMap<String, RepoTypeSection>,
}

impl UserConfig {
    /// Parse TOML content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load `path`; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            tracing::debug!(?path, "No user config found - skipping");
            return Ok(None);
        }
        tracing::debug!(?path, "Loading user config");
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content, path).map(Some)
    }

    /// Typed `[options]` entries in canonical key order.
    pub fn options(&self, origin: &Path) -> Result<Vec<(OptionKey, OptionValue)>> {
        let mut out = self
            .options
            .iter()
            .map(|(name, value)| convert_entry(name, value, &origin_label(origin, "options")))
            .collect::<Result<Vec<_>>>()?;
        out.sort_by_key(|(key, _)| *key);
        Ok(out)
    }

    /// Catalog profiles declared under `[repo_types]`, in name order.
    pub fn profiles(&self, origin: &Path) -> Result<Vec<RepoTypeProfile>> {
        self.repo_types
            .iter()
            .map(|(name, section)| section.to_profile(name, origin))
            .collect()
    }
}

impl RepoTypeSection {
    fn to_profile(&self, name: &str, origin: &Path) -> Result<RepoTypeProfile> {
        let identity = match self.identity.as_deref() {
            None => IdentityMode::None,
            Some(mode) => mode.parse().map_err(|()| Error::UnknownIdentityMode {
                name: name.to_string(),
                mode: mode.to_string(),
            })?,
        };
        let label = origin_label(origin, &format!("repo_types.{name}"));
        let mut overrides = Vec::with_capacity(self.overrides.len());
        for (key, value) in &self.overrides {
            overrides.push(convert_entry(key, value, &label)?);
        }
        Ok(RepoTypeProfile {
            name: name.to_string(),
            description: self.description.clone().unwrap_or_default(),
            prefix_template: self.prefix_template.clone(),
            identity,
            overrides,
        })
    }
}

fn origin_label(path: &Path, table: &str) -> String {
    format!("[{table}] of {}", path.display())
}

fn convert_entry(name: &str, value: &toml::Value, origin: &str) -> Result<(OptionKey, OptionValue)> {
    let key: OptionKey = name.parse().map_err(|()| Error::UnknownOptionKey {
        key: name.to_string(),
        origin: origin.to_string(),
    })?;
    let converted = match (key.kind(), value) {
        (OptionKind::Flag, toml::Value::Boolean(b)) => OptionValue::Flag(*b),
        (OptionKind::Value, toml::Value::String(s)) => OptionValue::text(s.clone()),
        (OptionKind::Value, toml::Value::Integer(i)) => OptionValue::text(i.to_string()),
        (kind, other) => {
            return Err(Error::InvalidOptionValue {
                key,
                expected: kind,
                found: other.to_string(),
                origin: origin.to_string(),
            });
        }
    };
    Ok((key, converted))
}
