//! Configuration layer for run-encase
//!
//! This crate provides:
//! - The closed set of py-encase option keys and their value kinds
//! - A layered option store that remembers which stage wrote each value
//! - Compiled-in defaults and environment-derived launcher settings
//! - The repo-type catalog and project-root path templates
//! - The optional user configuration file

pub mod catalog;
pub mod defaults;
pub mod env;
pub mod error;
pub mod file;
pub mod keys;
pub mod resolver;
pub mod store;
pub mod template;

pub use catalog::{IdentityMode, RepoTypeCatalog, RepoTypeProfile};
pub use defaults::{Defaults, PACKAGE_NAME, REPO_TYPE_DEFAULT, Settings};
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use file::UserConfig;
pub use keys::{OptionKey, OptionKind, OptionValue, parse_flag};
pub use resolver::{CONFIG_FILE_VAR, ConfigResolver, ResolvedConfig};
pub use store::{ConfigStore, Layer};
pub use template::TemplateVars;
