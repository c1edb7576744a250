//! The closed set of option keys understood by py-encase subcommands.
//!
//! Every key has a fixed [`OptionKind`]: a flag is either passed or not, a
//! scalar carries a string value that is omitted when empty.

use std::fmt;
use std::str::FromStr;

/// Value kind of an option key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Presence/absence toggle (`--flag`)
    Flag,
    /// String value (`--option VALUE`)
    Value,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Flag => f.write_str("flag"),
            OptionKind::Value => f.write_str("string"),
        }
    }
}

macro_rules! option_keys {
    ($($variant:ident => $name:literal : $kind:ident),+ $(,)?) => {
        /// Option key recognised by the launcher.
        ///
        /// Declaration order is the canonical store order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OptionKey {
            $($variant),+
        }

        impl OptionKey {
            /// All keys in canonical order.
            pub const ALL: &'static [OptionKey] = &[$(OptionKey::$variant),+];

            /// Configuration name of the key (snake_case).
            pub fn name(self) -> &'static str {
                match self {
                    $(OptionKey::$variant => $name),+
                }
            }

            /// Value kind of the key.
            pub fn kind(self) -> OptionKind {
                match self {
                    $(OptionKey::$variant => OptionKind::$kind),+
                }
            }
        }
    };
}

option_keys! {
    // project / repository
    Prefix => "prefix": Value,
    Title => "title": Value,
    Template => "template": Value,
    AppFramework => "app_framework": Flag,
    BareScript => "bare_script": Flag,
    GuiKvfile => "gui_kvfile": Value,
    Readme => "readme": Flag,
    RequiredModule => "required_module": Flag,
    ScriptLib => "script_lib": Value,
    StdScriptLib => "std_script_lib": Flag,
    SetupGit => "setup_git": Flag,
    GitSetUpstream => "git_set_upstream": Flag,
    GitRemoteSetup => "git_remote_setup": Flag,
    GitUserName => "git_user_name": Value,
    GitUserEmail => "git_user_email": Value,
    Module => "module": Value,
    // remote
    GitRepositoryName => "git_repository_name": Value,
    GitHosting => "git_hosting": Value,
    GitProtocol => "git_protocol": Value,
    GitRemoteUrl => "git_remote_url": Value,
    GitRemoteAccount => "git_remote_account": Value,
    GitRemoteHost => "git_remote_host": Value,
    GitRemotePort => "git_remote_port": Value,
    GitRemotePath => "git_remote_path": Value,
    GitRemoteSshopts => "git_remote_sshopts": Value,
    GitRemoteCmd => "git_remote_cmd": Value,
    GitRemoteShare => "git_remote_share": Value,
    GitRemoteName => "git_remote_name": Value,
    SshCommand => "ssh_command": Value,
    GhCommand => "gh_command": Value,
    GlabCommand => "glab_command": Value,
    // py-encase execution
    Move => "move": Value,
    PythonOpt => "python_opt": Value,
    PipOpt => "pip_opt": Flag,
    GitCommand => "git_command": Value,
    VerboseFlag => "verbose_flag": Flag,
    // newmodule
    Description => "description": Value,
    ModuleWebsite => "module_website": Value,
    ClassName => "class_name": Value,
    Keywords => "keywords": Value,
    Classifiers => "classifiers": Value,
    AuthorName => "author_name": Value,
    AuthorEmail => "author_email": Value,
    MaintainerName => "maintainer_name": Value,
    MaintainerEmail => "maintainer_email": Value,
    CreateYear => "create_year": Value,
    NoReadme => "no_readme": Flag,
    NoGitFile => "no_git_file": Flag,
    SetShebang => "set_shebang": Flag,
    // init_git
    ModuleSrc => "module_src": Value,
    // update_readme
    Backup => "backup": Flag,
    // dump_template
    Output => "output": Value,
    // info
    Long => "long": Flag,
    Short => "short": Flag,
    Version => "version": Flag,
    PipModuleName => "pip_module_name": Flag,
    ManageScriptName => "manage_script_name": Flag,
    ManageOption => "manage_option": Flag,
    // contents
    All => "all": Flag,
    BinScript => "bin_script": Flag,
    LibScript => "lib_script": Flag,
    ModulesSrc => "modules_src": Flag,
    // hosting userinfo
    GithubUserinfo => "github_userinfo": Flag,
    GitlabUserinfo => "gitlab_userinfo": Flag,
}

impl OptionKey {
    /// Environment variable that overrides this key (`ENCASE_<NAME>`).
    pub fn env_var(self) -> String {
        format!("ENCASE_{}", self.name().to_ascii_uppercase())
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s)
            .ok_or(())
    }
}

/// Current value of an option key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Value(Option<String>),
}

impl OptionValue {
    /// Neutral value for a kind: `false` or unset.
    pub fn neutral(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Flag => OptionValue::Flag(false),
            OptionKind::Value => OptionValue::Value(None),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        OptionValue::Value(Some(value.into()))
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Flag(_) => OptionKind::Flag,
            OptionValue::Value(_) => OptionKind::Value,
        }
    }

    /// True for a set flag.
    pub fn is_set(&self) -> bool {
        matches!(self, OptionValue::Flag(true))
    }

    /// Scalar value, `None` when unset or empty.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Value(Some(v)) if !v.is_empty() => Some(v.as_str()),
            _ => None,
        }
    }

    /// True when the value renders to nothing on the command line.
    pub fn is_neutral(&self) -> bool {
        match self {
            OptionValue::Flag(b) => !b,
            OptionValue::Value(_) => self.as_str().is_none(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{b}"),
            OptionValue::Value(Some(v)) => write!(f, "{v:?}"),
            OptionValue::Value(None) => f.write_str("<unset>"),
        }
    }
}

/// Parse a textual boolean as accepted in environment overrides.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
