//! Project-root path templates
//!
//! Templates use `{name}` placeholders; `{{` and `}}` stand for literal
//! braces. Only the names in [`PLACEHOLDERS`] are recognised.

use crate::{Error, Result};

/// Placeholder names accepted in a path template.
pub const PLACEHOLDERS: &[&str] = &[
    "worktop",
    "repo_type",
    "user",
    "proj",
    "account",
    "git_remote_host",
];

/// Values substituted into a path template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    pub worktop: String,
    pub repo_type: String,
    pub user: String,
    pub proj: String,
    pub account: String,
    pub git_remote_host: String,
}

impl TemplateVars {
    fn lookup(&self, name: &str) -> Option<&str> {
        let value = match name {
            "worktop" => &self.worktop,
            "repo_type" => &self.repo_type,
            "user" => &self.user,
            "proj" => &self.proj,
            "account" => &self.account,
            "git_remote_host" => &self.git_remote_host,
            _ => return None,
        };
        Some(value.as_str())
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Placeholder(&'a str),
}

fn segments(template: &str) -> Result<Vec<Segment<'_>>> {
    let malformed = |message: &str| Error::MalformedTemplate {
        template: template.to_string(),
        message: message.to_string(),
    };

    let mut out = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        if pos > 0 {
            out.push(Segment::Literal(&rest[..pos]));
        }
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            out.push(Segment::Brace('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push(Segment::Brace('}'));
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(malformed("unmatched '}'"));
        } else {
            let close = tail.find('}').ok_or_else(|| malformed("unclosed '{'"))?;
            let name = &tail[1..close];
            if name.contains('{') {
                return Err(malformed("nested '{'"));
            }
            out.push(Segment::Placeholder(name));
            rest = &tail[close + 1..];
        }
    }
    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    Ok(out)
}

/// Check that `template` is well-formed and only uses known placeholders.
pub fn validate(template: &str) -> Result<()> {
    for segment in segments(template)? {
        if let Segment::Placeholder(name) = segment {
            if !PLACEHOLDERS.contains(&name) {
                return Err(Error::UnresolvedPlaceholder {
                    template: template.to_string(),
                    placeholder: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Substitute every placeholder in `template`.
pub fn expand(template: &str, vars: &TemplateVars) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(name) => {
                let value = vars
                    .lookup(name)
                    .ok_or_else(|| Error::UnresolvedPlaceholder {
                        template: template.to_string(),
                        placeholder: name.to_string(),
                    })?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars() -> TemplateVars {
        TemplateVars {
            worktop: "/w".into(),
            repo_type: "local".into(),
            user: "alice".into(),
            proj: "demo".into(),
            account: "alice-gh".into(),
            git_remote_host: "git.example.org".into(),
        }
    }

    #[rstest]
    #[case("{worktop}/git_workdirs/local/{user}/{proj}", "/w/git_workdirs/local/alice/demo")]
    #[case("{worktop}/{git_remote_host}/{account}", "/w/git.example.org/alice-gh")]
    #[case("{repo_type}-{proj}", "local-demo")]
    #[case("{{literal}}/{proj}", "{literal}/demo")]
    #[case("no/placeholders", "no/placeholders")]
    fn test_expand(#[case] template: &str, #[case] expected: &str) {
        assert_eq!(expand(template, &vars()).unwrap(), expected);
    }

    #[test]
    fn test_unknown_placeholder_is_reported() {
        let err = expand("{worktop}/{team}", &vars()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "team"
        ));
    }

    #[rstest]
    #[case("{worktop")]
    #[case("worktop}")]
    #[case("{wor{ktop}")]
    fn test_malformed_templates(#[case] template: &str) {
        assert!(matches!(
            expand(template, &vars()),
            Err(Error::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_validate() {
        assert!(validate("{worktop}/{proj}").is_ok());
        assert!(validate("{worktop}/{nope}").is_err());
    }
}
