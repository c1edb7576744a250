//! External-process side of run-encase
//!
//! - [`command`]: the [`CommandRunner`] capability and the real [`SystemRunner`]
//! - [`identity`]: hosting-service account discovery via `gh`/`glab`
//! - [`version`]: memoized package version and install-location resolution
//! - [`provisioner`]: `pip install --target` into the install location

pub mod command;
pub mod error;
pub mod identity;
pub mod provisioner;
pub mod version;

pub use command::{CommandOutput, CommandRunner, Invocation, OutputMode, SystemRunner};
pub use error::{Error, Result};
pub use identity::{HostingService, Identity, IdentityResolver, parse_user_record};
pub use provisioner::{ProvisionOutcome, Provisioner};
pub use version::{ResolvedVersion, VersionResolver, VersionSource, parse_index_version};
