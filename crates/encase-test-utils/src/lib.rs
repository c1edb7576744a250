//! Shared test utilities for the run-encase workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`runner`]: [`ScriptedRunner`], a recording fake for `CommandRunner`
//! - [`workspace`]: [`TestWorkspace`], a temporary worktop/depot layout

pub mod runner;
pub mod workspace;

pub use runner::ScriptedRunner;
pub use workspace::TestWorkspace;
