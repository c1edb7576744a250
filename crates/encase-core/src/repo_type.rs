//! Repo-type resolution pass
//!
//! Looks up the repo-type profile, discovers the hosting account when the
//! profile asks for it, expands the project-root template into `prefix` and
//! merges the profile's fixed option values into the store.

use encase_config::{
    ConfigStore, Error as ConfigError, IdentityMode, Layer, OptionKey, RepoTypeCatalog,
    RepoTypeProfile, Settings, TemplateVars, template,
};
use encase_provision::{CommandRunner, HostingService, Identity, IdentityResolver};

use crate::Result;

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTypeResolution {
    pub repo_type: String,
    /// Expanded project root, also stored under `prefix`.
    pub prefix: String,
    /// Account used in the template: discovered, or the local user.
    pub account: String,
    pub git_remote_host: String,
    pub identity: Option<Identity>,
}

fn hosting_service(mode: IdentityMode) -> Option<HostingService> {
    match mode {
        IdentityMode::None => None,
        IdentityMode::Github => Some(HostingService::Github),
        IdentityMode::Gitlab => Some(HostingService::Gitlab),
    }
}

/// Resolve `repo_type` for `project`, mutating `store`.
///
/// Unknown names and template problems fail before the store is touched.
pub fn resolve<R: CommandRunner + ?Sized>(
    catalog: &RepoTypeCatalog,
    repo_type: &str,
    project: &str,
    store: &mut ConfigStore,
    settings: &Settings,
    identity: &IdentityResolver<'_, R>,
) -> Result<RepoTypeResolution> {
    let profile = catalog
        .get(repo_type)
        .ok_or_else(|| ConfigError::UnknownRepoType {
            name: repo_type.to_string(),
        })?;
    let prefix_template = profile
        .prefix_template
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ConfigError::MissingPathTemplate {
            name: repo_type.to_string(),
        })?;
    template::validate(prefix_template)?;

    let git_remote_host = store
        .value(OptionKey::GitRemoteHost)
        .or_else(|| {
            profile
                .override_for(OptionKey::GitRemoteHost)
                .and_then(|v| v.as_str())
        })
        .unwrap_or(repo_type)
        .to_string();

    let discovered = match hosting_service(profile.identity) {
        Some(service) => {
            let found = identity.lookup(service)?;
            for (key, value) in found.option_values() {
                store.set_text(key, value, Layer::Identity)?;
            }
            Some(found)
        }
        None => None,
    };
    let account = discovered
        .as_ref()
        .map_or_else(|| settings.user.clone(), |id| id.account.clone());

    let vars = TemplateVars {
        worktop: settings.worktop.to_string_lossy().into_owned(),
        repo_type: repo_type.to_string(),
        user: settings.user.clone(),
        proj: project.to_string(),
        account: account.clone(),
        git_remote_host: git_remote_host.clone(),
    };
    let prefix = template::expand(prefix_template, &vars)?;
    store.set_text(OptionKey::Prefix, prefix.as_str(), Layer::Profile)?;
    merge_profile(profile, store)?;

    tracing::debug!(repo_type, prefix = %prefix, account = %account, "repo_type resolved");
    Ok(RepoTypeResolution {
        repo_type: repo_type.to_string(),
        prefix,
        account,
        git_remote_host,
        identity: discovered,
    })
}

/// Merge fixed profile values. Neutral values never erase identity results.
fn merge_profile(profile: &RepoTypeProfile, store: &mut ConfigStore) -> Result<()> {
    for (key, value) in &profile.overrides {
        if *key == OptionKey::Prefix {
            continue;
        }
        if value.is_neutral() && store.layer(*key) == Layer::Identity {
            continue;
        }
        store.set(*key, value.clone(), Layer::Profile)?;
    }
    Ok(())
}
