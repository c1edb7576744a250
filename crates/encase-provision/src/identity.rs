//! Hosting-service identity lookup
//!
//! Asks the GitHub (`gh`) or GitLab (`glab`) CLI for the authenticated user
//! and derives the account name and the service's no-reply email address.

use std::fmt;

use encase_config::{EnvSnapshot, OptionKey};
use serde::Deserialize;

use crate::command::{CommandRunner, Invocation};
use crate::error::{Error, Result};

/// Hosting service with a queryable user API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostingService {
    Github,
    Gitlab,
}

impl HostingService {
    /// Short label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            HostingService::Github => "GH",
            HostingService::Gitlab => "GLab",
        }
    }

    fn noreply_domain(self) -> &'static str {
        match self {
            HostingService::Github => "users.noreply.github.com",
            HostingService::Gitlab => "users.noreply.gitlab.com",
        }
    }

    fn id_separator(self) -> char {
        match self {
            HostingService::Github => '+',
            HostingService::Gitlab => '-',
        }
    }
}

impl fmt::Display for HostingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authenticated hosting-service user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account: String,
    pub email: String,
}

impl Identity {
    /// Option values written into the store on success.
    pub fn option_values(&self) -> [(OptionKey, &str); 6] {
        [
            (OptionKey::GitUserName, self.account.as_str()),
            (OptionKey::GitUserEmail, self.email.as_str()),
            (OptionKey::GitRemoteAccount, self.account.as_str()),
            (OptionKey::AuthorEmail, self.email.as_str()),
            (OptionKey::MaintainerName, self.account.as_str()),
            (OptionKey::MaintainerEmail, self.email.as_str()),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserId {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    #[serde(default)]
    login: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<UserId>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse the JSON printed by `<cli> api user`.
pub fn parse_user_record(service: HostingService, json: &str) -> Result<Identity> {
    let malformed = |reason: String| Error::IdentityLookup { service, reason };

    let user: ApiUser = serde_json::from_str(json)
        .map_err(|e| malformed(format!("unexpected response from `api user`: {e}")))?;

    let account = match service {
        HostingService::Github => non_empty(user.login),
        HostingService::Gitlab => non_empty(user.username).or_else(|| non_empty(user.name)),
    }
    .ok_or_else(|| malformed("user record has no account name".to_string()))?;

    let id = match user.id {
        Some(UserId::Number(n)) => n.to_string(),
        Some(UserId::Text(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s,
        _ => return Err(malformed("user record has no numeric id".to_string())),
    };

    let email = format!(
        "{id}{}{account}@{}",
        service.id_separator(),
        service.noreply_domain()
    );
    Ok(Identity { account, email })
}

/// Looks up the authenticated user through the hosting CLIs.
pub struct IdentityResolver<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    env: &'a EnvSnapshot,
    gh: String,
    glab: String,
}

impl<'a, R: CommandRunner + ?Sized> IdentityResolver<'a, R> {
    /// `gh` and `glab` are the CLI programs to run.
    pub fn new(
        runner: &'a R,
        env: &'a EnvSnapshot,
        gh: impl Into<String>,
        glab: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            env,
            gh: gh.into(),
            glab: glab.into(),
        }
    }

    fn program(&self, service: HostingService) -> &str {
        match service {
            HostingService::Github => &self.gh,
            HostingService::Gitlab => &self.glab,
        }
    }

    /// The `<cli> api user` invocation; plain output unless the caller set otherwise.
    pub fn invocation(&self, service: HostingService) -> Invocation {
        let mut invocation = Invocation::new(self.program(service))
            .args(["api", "user"])
            .capture();
        for (name, value) in [("NO_COLOR", "1"), ("TERM", "dumb")] {
            if !self.env.contains(name) {
                invocation = invocation.env(name, value);
            }
        }
        invocation
    }

    pub fn lookup(&self, service: HostingService) -> Result<Identity> {
        let invocation = self.invocation(service);
        let output = self
            .runner
            .run(&invocation)
            .map_err(|e| Error::IdentityLookup {
                service,
                reason: format!("could not run `{}`: {e}", invocation.program),
            })?;
        if !output.success() {
            return Err(Error::IdentityLookup {
                service,
                reason: format!("`{invocation}` exited with status {}", output.status_code),
            });
        }
        let identity = parse_user_record(service, &output.stdout_text())?;
        tracing::debug!(%service, account = %identity.account, "identity resolved");
        Ok(identity)
    }
}
