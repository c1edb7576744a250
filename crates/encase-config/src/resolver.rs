//! Layered configuration resolution
//!
//! The `ConfigResolver` builds the startup configuration from, in order:
//! 1. compiled-in [`Defaults`]
//! 2. the optional user config file
//! 3. environment variables (`ENCASE_<KEY>` and the launcher settings variables)
//!
//! Identity, repo-type profile and user flags are applied later by the
//! launch pipeline on top of the resulting store.

use std::path::PathBuf;

use crate::catalog::RepoTypeCatalog;
use crate::defaults::{Defaults, Settings};
use crate::file::UserConfig;
use crate::store::{ConfigStore, Layer};
use crate::{EnvSnapshot, Result};

/// Variable naming an explicit user config file.
pub const CONFIG_FILE_VAR: &str = "RUN_ENCASE_CONFIG";

/// Output of startup resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub settings: Settings,
    pub store: ConfigStore,
    pub catalog: RepoTypeCatalog,
}

/// Resolves startup configuration.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    defaults: Defaults,
    /// Explicit config file path. When `None`, `RUN_ENCASE_CONFIG` and then
    /// `<config_dir>/run-encase/config.toml` are used.
    config_file_override: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(defaults: Defaults) -> Self {
        Self {
            defaults,
            config_file_override: None,
        }
    }

    /// Use `path` as the user config file.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file_override = Some(path.into());
        self
    }

    fn config_file(&self, env: &EnvSnapshot) -> Option<PathBuf> {
        if let Some(ref path) = self.config_file_override {
            return Some(path.clone());
        }
        if let Some(path) = env.first_non_empty(&[CONFIG_FILE_VAR]) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("run-encase").join("config.toml"))
    }

    pub fn resolve(&self, env: &EnvSnapshot) -> Result<ResolvedConfig> {
        let mut defaults = self.defaults.clone();
        let mut catalog = RepoTypeCatalog::builtin();
        let mut store = ConfigStore::with_defaults(defaults.options.iter().cloned())?;

        if let Some(path) = self.config_file(env) {
            if let Some(user) = UserConfig::load(&path)? {
                user.settings.apply_to(&mut defaults);
                for (key, value) in user.options(&path)? {
                    store.set(key, value, Layer::File)?;
                }
                for profile in user.profiles(&path)? {
                    tracing::debug!(name = %profile.name, "repo_type from config file");
                    catalog.insert(profile);
                }
            }
        }

        store.apply_env(env)?;
        let settings = Settings::resolve(&defaults, env)?;
        tracing::debug!(
            worktop = %settings.worktop.display(),
            depot = %settings.depot.display(),
            pip = %settings.pip,
            "launcher settings"
        );

        Ok(ResolvedConfig {
            settings,
            store,
            catalog,
        })
    }
}
