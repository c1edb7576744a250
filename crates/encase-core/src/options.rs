//! Per-subcommand option tables
//!
//! Each py-encase subcommand has a fixed, ordered list of bindings from option
//! keys to command-line flags. [`OptionBuilder`] walks the list and emits
//! tokens for the keys that are set:
//!
//! - a flag binding emits `--flag` when the flag is true, nothing otherwise
//! - a value binding emits `--flag VALUE` when the value is non-empty
//! - [`Binding::Python`] emits `--python <python_opt>` when set
//! - [`Binding::Pip`] emits `--pip <pip command>` when `pip_opt` is true
//!
//! Subcommands without a table get no default options.

use encase_config::{ConfigStore, OptionKey};

/// One entry of an option table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Flag(OptionKey, &'static str),
    Value(OptionKey, &'static str),
    /// `--python <python_opt>`
    Python,
    /// `--pip <pip command>`, gated by `pip_opt`
    Pip,
}

/// Subcommands of py-encase the launcher recognises.
pub const SUBCOMMANDS: &[&str] = &[
    "info",
    "contents",
    "init",
    "add",
    "addlib",
    "addkv",
    "newmodule",
    "update_readme",
    "init_git",
    "dump_template",
    "clean",
    "distclean",
    "selfupdate",
    "install",
    "download",
    "freeze",
    "inspect",
    "list",
    "cache",
    "piphelp",
];

pub fn is_known_subcommand(name: &str) -> bool {
    SUBCOMMANDS.contains(&name)
}

use Binding::{Flag as F, Pip, Python, Value as V};
use OptionKey::*;

const VERBOSE: Binding = F(VerboseFlag, "--verbose");

const INFO: &[Binding] = &[
    VERBOSE,
    F(Long, "--long"),
    F(Short, "--short"),
    F(Version, "--version"),
    F(PipModuleName, "--pip-module-name"),
    F(ManageScriptName, "--manage-script-name"),
    F(ManageOption, "--manage-option"),
];

const CONTENTS: &[Binding] = &[
    VERBOSE,
    F(All, "--all"),
    F(BinScript, "--bin-script"),
    F(LibScript, "--lib-script"),
    F(ModulesSrc, "--modules-src"),
];

const INIT: &[Binding] = &[
    V(Prefix, "--prefix"),
    V(Title, "--title"),
    V(Template, "--template"),
    F(AppFramework, "--app-framework"),
    F(BareScript, "--bare-script"),
    V(GuiKvfile, "--gui-kvfile"),
    F(Readme, "--readme"),
    V(Module, "--module"),
    F(RequiredModule, "--required-module"),
    V(ScriptLib, "--script-lib"),
    F(StdScriptLib, "--std-script-lib"),
    F(SetupGit, "--setup-git"),
    F(GitSetUpstream, "--git-set-upstream"),
    F(GitRemoteSetup, "--git-remote-setup"),
    V(GitUserName, "--git-user-name"),
    V(GitUserEmail, "--git-user-email"),
    F(GithubUserinfo, "--github-userinfo"),
    F(GitlabUserinfo, "--gitlab-userinfo"),
    V(GitRepositoryName, "--git-repository-name"),
    V(GitHosting, "--git-hosting"),
    V(GitProtocol, "--git-protocol"),
    V(GitRemoteUrl, "--git-remote-url"),
    V(GitRemoteAccount, "--git-remote-account"),
    V(GitRemoteHost, "--git-remote-host"),
    V(GitRemotePort, "--git-remote-port"),
    V(GitRemotePath, "--git-remote-path"),
    V(GitRemoteSshopts, "--git-remote-sshopts"),
    V(GitRemoteCmd, "--git-remote-cmd"),
    V(GitRemoteShare, "--git-remote-share"),
    V(GitRemoteName, "--git-remote-name"),
    V(SshCommand, "--ssh-command"),
    V(GhCommand, "--gh-command"),
    V(GlabCommand, "--glab-command"),
    F(SetShebang, "--set-shebang"),
    Python,
    Pip,
    V(GitCommand, "--git-command"),
    VERBOSE,
];

const ADD: &[Binding] = &[
    V(Prefix, "--prefix"),
    V(Module, "--module"),
    V(Title, "--title"),
    V(Template, "--template"),
    F(AppFramework, "--app-framework"),
    F(BareScript, "--bare-script"),
    V(GuiKvfile, "--gui-kvfile"),
    F(Readme, "--readme"),
    F(RequiredModule, "--required-module"),
    V(ScriptLib, "--script-lib"),
    F(StdScriptLib, "--std-script-lib"),
    Python,
    Pip,
    V(GitCommand, "--git-command"),
    VERBOSE,
];

const ADDLIB: &[Binding] = &[
    V(Prefix, "--prefix"),
    V(Module, "--module"),
    V(Template, "--template"),
    F(Readme, "--readme"),
    F(RequiredModule, "--required-module"),
    F(StdScriptLib, "--std-script-lib"),
    Python,
    Pip,
    V(GitCommand, "--git-command"),
    VERBOSE,
];

const ADDKV: &[Binding] = &[V(Prefix, "--prefix"), V(Template, "--template"), VERBOSE];

const NEWMODULE: &[Binding] = &[
    V(Prefix, "--prefix"),
    V(Title, "--title"),
    V(Description, "--description"),
    V(Template, "--template"),
    V(ModuleWebsite, "--module-website"),
    V(ClassName, "--class-name"),
    V(Module, "--module"),
    V(Keywords, "--keywords"),
    V(Classifiers, "--classifiers"),
    V(AuthorName, "--author-name"),
    V(AuthorEmail, "--author-email"),
    V(MaintainerName, "--maintainer-name"),
    V(MaintainerEmail, "--maintainer-email"),
    V(CreateYear, "--create-year"),
    F(NoReadme, "--no-readme"),
    F(NoGitFile, "--no-git-file"),
    F(SetShebang, "--set-shebang"),
    F(GithubUserinfo, "--github-userinfo"),
    F(GitlabUserinfo, "--gitlab-userinfo"),
    F(GitSetUpstream, "--git-set-upstream"),
    F(GitRemoteSetup, "--git-remote-setup"),
    V(GitUserName, "--git-user-name"),
    V(GitUserEmail, "--git-user-email"),
    V(GitRepositoryName, "--git-repository-name"),
    V(GitHosting, "--git-hosting"),
    V(GitProtocol, "--git-protocol"),
    V(GitRemoteUrl, "--git-remote-url"),
    V(GitRemoteAccount, "--git-remote-account"),
    V(GitRemoteHost, "--git-remote-host"),
    V(GitRemotePort, "--git-remote-port"),
    V(GitRemotePath, "--git-remote-path"),
    V(GitRemoteSshopts, "--git-remote-sshopts"),
    V(GitRemoteCmd, "--git-remote-cmd"),
    V(GitRemoteShare, "--git-remote-share"),
    V(GitRemoteName, "--git-remote-name"),
    V(SshCommand, "--ssh-command"),
    V(GhCommand, "--gh-command"),
    V(GlabCommand, "--glab-command"),
    Python,
    Pip,
    V(GitCommand, "--git-command"),
    VERBOSE,
];

const UPDATE_README: &[Binding] = &[
    V(Title, "--title"),
    V(Template, "--template"),
    F(Backup, "--backup"),
    VERBOSE,
];

const INIT_GIT: &[Binding] = &[
    V(ModuleSrc, "--module-src"),
    F(GitSetUpstream, "--git-set-upstream"),
    F(GitRemoteSetup, "--git-remote-setup"),
    V(GitUserName, "--git-user-name"),
    V(GitUserEmail, "--git-user-email"),
    F(GithubUserinfo, "--github-userinfo"),
    F(GitlabUserinfo, "--gitlab-userinfo"),
    V(GitRepositoryName, "--git-repository-name"),
    V(GitHosting, "--git-hosting"),
    V(GitProtocol, "--git-protocol"),
    V(GitRemoteUrl, "--git-remote-url"),
    V(GitRemoteAccount, "--git-remote-account"),
    V(GitRemoteHost, "--git-remote-host"),
    V(GitRemotePort, "--git-remote-port"),
    V(GitRemotePath, "--git-remote-path"),
    V(GitRemoteSshopts, "--git-remote-sshopts"),
    V(GitRemoteCmd, "--git-remote-cmd"),
    V(GitRemoteShare, "--git-remote-share"),
    V(GitRemoteName, "--git-remote-name"),
    V(SshCommand, "--ssh-command"),
    V(GhCommand, "--gh-command"),
    V(GlabCommand, "--glab-command"),
    V(GitCommand, "--git-command"),
    V(Template, "--template"),
    VERBOSE,
];

const DUMP_TEMPLATE: &[Binding] = &[V(Output, "--output"), VERBOSE];

const VERBOSE_ONLY: &[Binding] = &[VERBOSE];

/// Option table for `subcommand`; empty for pass-through and unknown names.
pub fn bindings(subcommand: &str) -> &'static [Binding] {
    match subcommand {
        "info" => INFO,
        "contents" => CONTENTS,
        "init" => INIT,
        "add" => ADD,
        "addlib" => ADDLIB,
        "addkv" => ADDKV,
        "newmodule" => NEWMODULE,
        "update_readme" => UPDATE_README,
        "init_git" => INIT_GIT,
        "dump_template" => DUMP_TEMPLATE,
        "clean" | "distclean" | "selfupdate" => VERBOSE_ONLY,
        _ => &[],
    }
}

/// Turns the option store into default arguments for a subcommand.
pub struct OptionBuilder<'a> {
    store: &'a ConfigStore,
    pip: &'a str,
}

impl<'a> OptionBuilder<'a> {
    /// `pip` is the resolved pip command emitted by [`Binding::Pip`].
    pub fn new(store: &'a ConfigStore, pip: &'a str) -> Self {
        Self { store, pip }
    }

    pub fn build(&self, subcommand: &str) -> Vec<String> {
        let mut args = Vec::new();
        for binding in bindings(subcommand) {
            match *binding {
                Binding::Flag(key, flag) => {
                    if self.store.flag(key) {
                        args.push(flag.to_string());
                    }
                }
                Binding::Value(key, flag) => {
                    if let Some(value) = self.store.value(key) {
                        args.extend([flag.to_string(), value.to_string()]);
                    }
                }
                Binding::Python => {
                    if let Some(python) = self.store.value(PythonOpt) {
                        args.extend(["--python".to_string(), python.to_string()]);
                    }
                }
                Binding::Pip => {
                    if self.store.flag(PipOpt) {
                        args.extend(["--pip".to_string(), self.pip.to_string()]);
                    }
                }
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encase_config::{Layer, OptionValue};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn store(values: &[(OptionKey, OptionValue)]) -> ConfigStore {
        let mut store = ConfigStore::new();
        for (key, value) in values {
            store.set(*key, value.clone(), Layer::User).unwrap();
        }
        store
    }

    #[test]
    fn test_info_keeps_table_order() {
        let store = store(&[
            (Version, OptionValue::Flag(true)),
            (Long, OptionValue::Flag(true)),
            (Short, OptionValue::Flag(false)),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("info"),
            vec!["--long", "--version"]
        );
    }

    #[test]
    fn test_init_prefix_before_readme() {
        let store = store(&[
            (Readme, OptionValue::Flag(true)),
            (Prefix, OptionValue::text("/x/y")),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("init"),
            vec!["--prefix", "/x/y", "--readme"]
        );
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let store = store(&[
            (Title, OptionValue::text("")),
            (Template, OptionValue::Value(None)),
            (Backup, OptionValue::Flag(true)),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("update_readme"),
            vec!["--backup"]
        );
    }

    #[test]
    fn test_python_and_pip_rules_sit_before_git_command() {
        let store = store(&[
            (PythonOpt, OptionValue::text("/usr/bin/python3.12")),
            (PipOpt, OptionValue::Flag(true)),
            (GitCommand, OptionValue::text("git")),
            (StdScriptLib, OptionValue::Flag(true)),
            (VerboseFlag, OptionValue::Flag(true)),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "/opt/pip3").build("addlib"),
            vec![
                "--std-script-lib",
                "--python",
                "/usr/bin/python3.12",
                "--pip",
                "/opt/pip3",
                "--git-command",
                "git",
                "--verbose",
            ]
        );
    }

    #[test]
    fn test_pip_rule_needs_toggle() {
        let store = store(&[(PythonOpt, OptionValue::text("py"))]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("add"),
            vec!["--python", "py"]
        );
    }

    #[test]
    fn test_gitlab_userinfo_uses_dashes_in_init() {
        let store = store(&[(GitlabUserinfo, OptionValue::Flag(true))]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("init"),
            vec!["--gitlab-userinfo"]
        );
    }

    #[test]
    fn test_newmodule_emits_set_shebang_once() {
        let store = store(&[(SetShebang, OptionValue::Flag(true))]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("newmodule"),
            vec!["--set-shebang"]
        );
    }

    #[test]
    fn test_init_git_template_comes_last_before_verbose() {
        let store = store(&[
            (Template, OptionValue::text("tpl")),
            (ModuleSrc, OptionValue::text("src")),
            (VerboseFlag, OptionValue::Flag(true)),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build("init_git"),
            vec!["--module-src", "src", "--template", "tpl", "--verbose"]
        );
    }

    #[rstest]
    #[case("clean")]
    #[case("distclean")]
    #[case("selfupdate")]
    fn test_verbose_only_subcommands(#[case] subcommand: &str) {
        let store = store(&[
            (VerboseFlag, OptionValue::Flag(true)),
            (Readme, OptionValue::Flag(true)),
        ]);
        assert_eq!(
            OptionBuilder::new(&store, "pip3").build(subcommand),
            vec!["--verbose"]
        );
    }

    #[rstest]
    #[case("install")]
    #[case("piphelp")]
    #[case("no-such-subcommand")]
    #[case("")]
    fn test_no_defaults(#[case] subcommand: &str) {
        let store = store(&[
            (VerboseFlag, OptionValue::Flag(true)),
            (Prefix, OptionValue::text("/p")),
        ]);
        assert!(OptionBuilder::new(&store, "pip3").build(subcommand).is_empty());
    }

    #[rstest]
    #[case("info", INFO)]
    #[case("contents", CONTENTS)]
    #[case("init", INIT)]
    #[case("add", ADD)]
    #[case("addlib", ADDLIB)]
    #[case("addkv", ADDKV)]
    #[case("newmodule", NEWMODULE)]
    #[case("update_readme", UPDATE_README)]
    #[case("init_git", INIT_GIT)]
    #[case("dump_template", DUMP_TEMPLATE)]
    #[case("clean", VERBOSE_ONLY)]
    #[case("distclean", VERBOSE_ONLY)]
    #[case("selfupdate", VERBOSE_ONLY)]
    fn test_subcommand_table(#[case] name: &str, #[case] expected: &[Binding]) {
        assert!(is_known_subcommand(name));
        assert!(!expected.is_empty());
        assert_eq!(bindings(name), expected);
    }

    #[test]
    fn test_pass_through_subcommands_are_known_without_defaults() {
        let pass_through: Vec<_> = SUBCOMMANDS
            .iter()
            .filter(|name| bindings(name).is_empty())
            .copied()
            .collect();
        assert_eq!(
            pass_through,
            vec!["install", "download", "freeze", "inspect", "list", "cache", "piphelp"]
        );
        assert!(!is_known_subcommand("deploy"));
    }

    #[test]
    fn test_value_bindings_match_key_kinds() {
        for name in SUBCOMMANDS {
            for binding in bindings(name) {
                match binding {
                    Binding::Flag(key, _) => {
                        assert_eq!(key.kind(), encase_config::OptionKind::Flag, "{key}")
                    }
                    Binding::Value(key, _) => {
                        assert_eq!(key.kind(), encase_config::OptionKind::Value, "{key}")
                    }
                    Binding::Python | Binding::Pip => {}
                }
            }
        }
    }
}
