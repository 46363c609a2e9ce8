//! Typed error taxonomy for the git driver
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use super::version::SemanticVersion;

/// All error types the git driver can produce
#[derive(Debug, Error)]
pub enum GitError {
    /// The installed tool does not meet the minimum version requirement
    #[error("need {required} or newer, found: {found}")]
    VersionIncompatible {
        required: SemanticVersion,
        found: String,
    },

    /// The git binary could not be located on PATH
    #[error("git binary not found: {0}")]
    NotFound(#[from] which::Error),

    /// Spawning or waiting on the subprocess failed
    #[error("failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The subprocess did not exit within the bounded wait
    #[error("`git {command}` did not finish within {timeout}s")]
    Timeout { command: String, timeout: u64 },

    /// Exit code outside the {0, 1, 128} contract; both streams captured
    #[error(
        "`git {command}` exited with unexpected code {code:?}\n\n\
         Standard output:\n{stdout}\n\n\
         Standard error:\n{stderr}"
    )]
    UnexpectedExit {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Exit code 1 on an operation that required success
    #[error("`git {command}` failed: {output}")]
    CommandFailed { command: String, output: String },

    /// Exit code 128 on an operation that required success
    #[error("`git {command}` reported a fatal error: {output}")]
    Fatal { command: String, output: String },

    /// `branch --show-current` produced no name (detached HEAD)
    #[error("workspace has no current branch")]
    NoCurrentBranch,

    /// A filesystem operation around a git command failed
    #[error("filesystem operation on {} failed: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for git driver operations
pub type Result<T> = std::result::Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_incompatible_display() {
        let err = GitError::VersionIncompatible {
            required: SemanticVersion::new("git", 2, 37, 0),
            found: "git version 2.30.1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "need git 2.37.0 or newer, found: git version 2.30.1"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = GitError::Timeout {
            command: "clone origin repo".to_string(),
            timeout: 10,
        };
        assert_eq!(
            err.to_string(),
            "`git clone origin repo` did not finish within 10s"
        );
    }

    #[test]
    fn test_unexpected_exit_captures_both_streams() {
        let err = GitError::UnexpectedExit {
            command: "push".to_string(),
            code: Some(129),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("unexpected code Some(129)"));
        assert!(message.contains("Standard output:\nout"));
        assert!(message.contains("Standard error:\nerr"));
    }

    #[test]
    fn test_command_failed_display() {
        let err = GitError::CommandFailed {
            command: "worktree remove target/docpkg".to_string(),
            output: "not a working tree".to_string(),
        };
        assert!(err.to_string().contains("worktree remove"));
        assert!(err.to_string().contains("not a working tree"));
    }
}
