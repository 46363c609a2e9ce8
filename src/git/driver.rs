//! Version-gated facade over the git command line
//!
//! Each operation maps 1:1 to one git command. Construction queries the
//! installed version and fails fast when the minimum requirement is not
//! met. Operations that tolerate controlled failure (`commit`,
//! `create_branch`) pattern-match on the classified outcome; everything
//! else requires success.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::{GitError, Result};
use super::process::{CommandOutcome, CommandRunner, GitProcess};
use super::version::SemanticVersion;

/// Fixed message for the synthetic root commit of a documentation branch.
const ROOT_COMMIT_MESSAGE: &str = "build: new documentation package";

/// Anything a branch can be created at.
pub trait Point {
    fn reference(&self) -> &str;
}

/// A branch name as passed to or reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Point for BranchName {
    fn reference(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A commit id reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(String);

impl CommitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Point for CommitId {
    fn reference(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object name (e.g. a tree hash) reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName(String);

impl ObjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human text for a commit.
#[derive(Debug, Clone)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Synchronous facade over the git command line.
///
/// Stateless after construction; directories are passed per call. Generic
/// over the runner so tests can substitute a scripted fake.
pub struct GitDriver<R = GitProcess> {
    runner: R,
}

impl GitDriver<GitProcess> {
    /// Locate git on PATH and enforce the minimum version.
    pub fn new() -> Result<Self> {
        Self::with_runner(GitProcess::new()?)
    }
}

impl<R: CommandRunner> GitDriver<R> {
    /// The version floor the installed tool must meet.
    pub fn required_version() -> SemanticVersion {
        SemanticVersion::new("git", 2, 37, 0)
    }

    /// Gate the runner on the installed version; fails fast when the
    /// banner cannot be parsed or the floor is not met.
    pub fn with_runner(runner: R) -> Result<Self> {
        let required = Self::required_version();
        let banner = runner
            .run(&["version"], Path::new("."))?
            .require_success("version")?;
        match SemanticVersion::parse(&banner) {
            Some(installed) if required.is_met_by(&installed) => {
                debug!(version = %installed, "git version accepted");
                Ok(Self { runner })
            }
            _ => Err(GitError::VersionIncompatible {
                required,
                found: banner,
            }),
        }
    }

    /// `git init <dir>`
    pub fn initialize(&self, dir: &Path) -> Result<()> {
        let dir = dir.to_string_lossy();
        self.runner
            .run(&["init", &dir], Path::new("."))?
            .require_success("init")?;
        Ok(())
    }

    /// `git clone <origin> <dir>`
    pub fn clone(&self, origin: &Path, dir: &Path) -> Result<()> {
        let origin = origin.to_string_lossy();
        let dir = dir.to_string_lossy();
        self.runner
            .run(&["clone", &origin, &dir], Path::new("."))?
            .require_success("clone")?;
        Ok(())
    }

    /// Copy `source` to `dir/<target>`, creating parent directories and
    /// overwriting any existing file, then stage it.
    pub fn add_file(&self, dir: &Path, source: &Path, target: &Path) -> Result<()> {
        let destination = dir.join(target);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|error| GitError::Filesystem {
                path: parent.to_path_buf(),
                source: error,
            })?;
        }
        debug!(from = %source.display(), to = %destination.display(), "copying");
        fs::copy(source, &destination).map_err(|error| GitError::Filesystem {
            path: source.to_path_buf(),
            source: error,
        })?;
        let target = target.to_string_lossy();
        self.runner
            .run(&["add", &target], dir)?
            .require_success("add")?;
        Ok(())
    }

    /// `git add .`
    pub fn add_current_worktree(&self, dir: &Path) -> Result<()> {
        self.runner.run(&["add", "."], dir)?.require_success("add")?;
        Ok(())
    }

    /// `git worktree add --force <path> <branch>`
    pub fn add_worktree(&self, dir: &Path, path: &Path, branch: &BranchName) -> Result<()> {
        let path = path.to_string_lossy();
        self.runner
            .run(&["worktree", "add", "--force", &path, branch.as_str()], dir)?
            .require_success("worktree add")?;
        Ok(())
    }

    /// `git worktree remove <path>`
    pub fn remove_worktree(&self, dir: &Path, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.runner
            .run(&["worktree", "remove", &path], dir)?
            .require_success("worktree remove")?;
        Ok(())
    }

    /// `git branch --show-current`; a detached HEAD has no current branch.
    pub fn current_branch(&self, dir: &Path) -> Result<BranchName> {
        let name = self
            .runner
            .run(&["branch", "--show-current"], dir)?
            .require_success("branch")?;
        if name.is_empty() {
            return Err(GitError::NoCurrentBranch);
        }
        Ok(BranchName(name))
    }

    /// `git branch <name> <point>`
    ///
    /// Tolerates controlled failure: an existing branch or an unresolvable
    /// point leaves the repository as it was.
    pub fn create_branch(&self, dir: &Path, name: &BranchName, point: &dyn Point) -> Result<()> {
        let outcome = self
            .runner
            .run(&["branch", name.as_str(), point.reference()], dir)?;
        match outcome {
            CommandOutcome::Success(_) => {}
            CommandOutcome::Failed(output) | CommandOutcome::Fatal(output) => {
                debug!(branch = %name, "branch not created: {output}");
            }
        }
        Ok(())
    }

    /// `git commit -m <message>`; `None` when there was nothing to commit.
    pub fn commit(&self, dir: &Path, message: &CommitMessage) -> Result<Option<CommitId>> {
        match self.runner.run(&["commit", "-m", message.as_str()], dir)? {
            CommandOutcome::Success(_) => {
                let id = self
                    .runner
                    .run(&["rev-parse", "HEAD"], dir)?
                    .require_success("rev-parse")?;
                debug!(commit = %id, "committed");
                Ok(Some(CommitId(id)))
            }
            CommandOutcome::Failed(output) => {
                debug!("commit failed: {}", output.replace('\n', "\\n"));
                Ok(None)
            }
            CommandOutcome::Fatal(output) => Err(GitError::Fatal {
                command: "commit".to_string(),
                output,
            }),
        }
    }

    /// `git commit-tree <tree> -m <message>` with the fixed root message.
    pub fn commit_tree(&self, dir: &Path, tree: &ObjectName) -> Result<CommitId> {
        let id = self
            .runner
            .run(&["commit-tree", tree.as_str(), "-m", ROOT_COMMIT_MESSAGE], dir)?
            .require_success("commit-tree")?;
        Ok(CommitId(id))
    }

    /// `git mktree` fed an empty input stream, yielding the empty tree.
    pub fn make_tree(&self, dir: &Path) -> Result<ObjectName> {
        let name = self
            .runner
            .run(&["mktree"], dir)?
            .require_success("mktree")?;
        Ok(ObjectName(name))
    }

    /// `git push <remote> <branch>`
    pub fn publish(&self, dir: &Path, remote: &str, branch: &BranchName) -> Result<()> {
        self.runner
            .run(&["push", remote, branch.as_str()], dir)?
            .require_success("push")?;
        Ok(())
    }
}
