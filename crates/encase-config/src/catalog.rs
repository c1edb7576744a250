//! Repo-type catalog
//!
//! A repo-type names a profile: where projects of that type live (a path
//! template), which option values it fixes, and whether the hosting-service
//! account must be discovered first. The built-in set lives in
//! [`RepoTypeCatalog::builtin`]; the user config file may add or replace entries.

use std::fmt;
use std::str::FromStr;

use crate::keys::{OptionKey, OptionValue};

/// How the account for a repo-type is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityMode {
    /// The local user name is the account.
    #[default]
    None,
    /// Ask the GitHub CLI for the authenticated user.
    Github,
    /// Ask the GitLab CLI for the authenticated user.
    Gitlab,
}

impl IdentityMode {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentityMode::None => "none",
            IdentityMode::Github => "github",
            IdentityMode::Gitlab => "gitlab",
        }
    }
}

impl fmt::Display for IdentityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentityMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(IdentityMode::None),
            "github" | "gh" => Ok(IdentityMode::Github),
            "gitlab" | "glab" => Ok(IdentityMode::Gitlab),
            _ => Err(()),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTypeProfile {
    pub name: String,
    pub description: String,
    /// Project-root template. `None` is a configuration error at resolve time.
    pub prefix_template: Option<String>,
    pub identity: IdentityMode,
    /// Option values merged into the store, in declaration order.
    pub overrides: Vec<(OptionKey, OptionValue)>,
}

impl RepoTypeProfile {
    pub fn new(name: impl Into<String>, prefix_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prefix_template: Some(prefix_template.into()),
            identity: IdentityMode::None,
            overrides: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_flag(self, key: OptionKey) -> Self {
        self.with_override(key, OptionValue::Flag(true))
    }

    pub fn with_value(self, key: OptionKey, value: impl Into<String>) -> Self {
        self.with_override(key, OptionValue::text(value))
    }

    /// Add or replace a fixed option value.
    pub fn with_override(mut self, key: OptionKey, value: OptionValue) -> Self {
        match self.overrides.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.overrides.push((key, value)),
        }
        self
    }

    /// Fixed value for `key`, if the profile sets one.
    pub fn override_for(&self, key: OptionKey) -> Option<&OptionValue> {
        self.overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Ordered catalog of repo-type profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoTypeCatalog {
    profiles: Vec<RepoTypeProfile>,
}

impl RepoTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in repo-types: `local`, `selfhosted`, `github`, `gitlab`.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            RepoTypeProfile::new("local", "{worktop}/git_workdirs/local/{user}/{proj}")
                .with_description("Local git repo under {worktop}/git_workdirs/local/{user}/{proj}")
                .with_flag(OptionKey::Readme)
                .with_flag(OptionKey::SetupGit),
        );
        catalog.insert(
            RepoTypeProfile::new(
                "selfhosted",
                "{worktop}/git_workdirs/{git_remote_host}/{user}/{proj}",
            )
            .with_description(
                "Self-hosted git repo under {worktop}/git_workdirs/{git_remote_host}/{user}/{proj}",
            )
            .with_value(OptionKey::GitRemoteHost, "selfhosted")
            .with_flag(OptionKey::Readme)
            .with_flag(OptionKey::SetupGit),
        );
        catalog.insert(
            RepoTypeProfile::new("github", "{worktop}/git_workdirs/github/{account}/{proj}")
                .with_description("GitHub-hosted repo; account is taken from `gh api user`")
                .with_identity(IdentityMode::Github)
                .with_flag(OptionKey::Readme)
                .with_flag(OptionKey::SetupGit)
                .with_flag(OptionKey::GitSetUpstream)
                .with_flag(OptionKey::GitRemoteSetup)
                .with_value(OptionKey::GitHosting, "github")
                .with_flag(OptionKey::GithubUserinfo),
        );
        catalog.insert(
            RepoTypeProfile::new("gitlab", "{worktop}/git_workdirs/gitlab/{account}/{proj}")
                .with_description("GitLab-hosted repo; account is taken from `glab api user`")
                .with_identity(IdentityMode::Gitlab)
                .with_flag(OptionKey::Readme)
                .with_flag(OptionKey::SetupGit)
                .with_flag(OptionKey::GitSetUpstream)
                .with_flag(OptionKey::GitRemoteSetup)
                .with_value(OptionKey::GitHosting, "gitlab")
                .with_flag(OptionKey::GitlabUserinfo),
        );
        catalog
    }

    /// Add a profile, replacing any existing profile with the same name in place.
    pub fn insert(&mut self, profile: RepoTypeProfile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RepoTypeProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Profile names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepoTypeProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template;

    #[test]
    fn test_builtin_names_in_order() {
        let catalog = RepoTypeCatalog::builtin();
        assert_eq!(catalog.names(), vec!["local", "selfhosted", "github", "gitlab"]);
    }

    #[test]
    fn test_builtin_templates_are_valid() {
        for profile in RepoTypeCatalog::builtin().iter() {
            let tmpl = profile
                .prefix_template
                .as_deref()
                .unwrap_or_else(|| panic!("{} has no template", profile.name));
            template::validate(tmpl).unwrap();
            assert!(!profile.description.is_empty());
        }
    }

    #[test]
    fn test_hosting_profiles_request_identity() {
        let catalog = RepoTypeCatalog::builtin();
        assert_eq!(catalog.get("github").unwrap().identity, IdentityMode::Github);
        assert_eq!(catalog.get("gitlab").unwrap().identity, IdentityMode::Gitlab);
        assert_eq!(catalog.get("local").unwrap().identity, IdentityMode::None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut catalog = RepoTypeCatalog::builtin();
        catalog.insert(RepoTypeProfile::new("local", "{worktop}/{proj}"));
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.names()[0], "local");
        assert_eq!(
            catalog.get("local").unwrap().prefix_template.as_deref(),
            Some("{worktop}/{proj}")
        );
    }

    #[test]
    fn test_with_override_replaces_existing_key() {
        let profile = RepoTypeProfile::new("x", "{proj}")
            .with_value(OptionKey::GitHosting, "a")
            .with_value(OptionKey::GitHosting, "b");
        assert_eq!(profile.overrides.len(), 1);
        assert_eq!(
            profile.override_for(OptionKey::GitHosting),
            Some(&OptionValue::text("b"))
        );
    }

    #[test]
    fn test_identity_mode_parse() {
        assert_eq!("gh".parse::<IdentityMode>(), Ok(IdentityMode::Github));
        assert_eq!("gitlab".parse::<IdentityMode>(), Ok(IdentityMode::Gitlab));
        assert!("bitbucket".parse::<IdentityMode>().is_err());
    }
}
