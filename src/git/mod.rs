//! Git driver for documentation publishing
//!
//! This module provides:
//! - Bounded subprocess execution with typed outcome classification
//! - A version-gated facade over the git command line
//! - Semantic version parsing for the minimum-capability gate

pub mod driver;
pub mod error;
pub mod process;
pub mod version;

pub use driver::{BranchName, CommitId, CommitMessage, GitDriver, ObjectName, Point};
pub use error::{GitError, Result};
pub use process::{CommandOutcome, CommandRunner, GitProcess};
pub use version::SemanticVersion;
