//! Worktree publishing protocol
//!
//! A `Publisher` owns an isolated checkout and its target branch for its
//! lifetime: construction acquires them, `close` releases them exactly
//! once, and `Drop` backstops the release when an error path skips
//! `close`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::fsops;
use crate::git::{BranchName, CommandRunner, CommitMessage, GitDriver};
use crate::manifest::{FileDescription, PackageId};

/// Fixed message for a publish commit.
const PUBLISH_COMMIT_MESSAGE: &str = "docs: new package";

/// Configuration points of the publish workflow.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Name of the remote the target branch tracks and is pushed to.
    pub remote: String,
    /// Where the isolated checkout lives, relative to the workspace root.
    pub checkout_dir: PathBuf,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            checkout_dir: PathBuf::from("target/docpkg"),
        }
    }
}

/// Stateful orchestrator of the publish workflow.
///
/// Construction establishes the isolated checkout and the target branch
/// `docpkg/{package_id}/{current_branch}`; `publish` copies, commits and
/// pushes; `close` tears the checkout down.
pub struct Publisher<R: CommandRunner> {
    driver: GitDriver<R>,
    workspace: PathBuf,
    checkout_rel: PathBuf,
    branch: BranchName,
    remote: String,
    released: bool,
}

impl<R: CommandRunner> Publisher<R> {
    /// Establish the checkout and branch for `package_id` with defaults.
    pub fn new(driver: GitDriver<R>, workspace: &Path, package_id: &PackageId) -> Result<Self> {
        Self::with_options(driver, workspace, package_id, PublishOptions::default())
    }

    pub fn with_options(
        driver: GitDriver<R>,
        workspace: &Path,
        package_id: &PackageId,
        options: PublishOptions,
    ) -> Result<Self> {
        let original = driver
            .current_branch(workspace)
            .context("Failed to determine the current branch")?;
        let branch = BranchName::new(format!("docpkg/{package_id}/{original}"));
        debug!(branch = %branch, "establishing documentation branch");

        fsops::remove_recursively(&workspace.join(&options.checkout_dir))?;

        // The branch needs an ancestor commit before files are added:
        // commit the empty tree.
        let tree = driver.make_tree(workspace)?;
        debug!(tree = %tree, "committing empty tree");
        let root = driver.commit_tree(workspace, &tree)?;
        debug!(commit = %root, "created root commit");

        // Two-step branch creation: first bind to the remote ref if it
        // resolves, then create at the root commit. Both steps tolerate
        // failure, so an existing local tracking branch survives.
        let remote_ref = BranchName::new(format!("{}/{branch}", options.remote));
        driver.create_branch(workspace, &branch, &remote_ref)?;
        driver.create_branch(workspace, &branch, &root)?;

        driver
            .add_worktree(workspace, &options.checkout_dir, &branch)
            .context("Failed to add the publishing worktree")?;

        Ok(Self {
            driver,
            workspace: workspace.to_path_buf(),
            checkout_rel: options.checkout_dir,
            branch,
            remote: options.remote,
            released: false,
        })
    }

    /// The branch the publisher commits to and pushes.
    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    fn checkout(&self) -> PathBuf {
        self.workspace.join(&self.checkout_rel)
    }

    /// Copy each file into the checkout, commit once, and push the branch.
    ///
    /// Nothing to commit is a no-op, not an error; the push still runs.
    pub fn publish<'a>(
        &self,
        files: impl IntoIterator<Item = &'a FileDescription>,
    ) -> Result<()> {
        let checkout = self.checkout();
        for file in files {
            debug!(path = %file.path().display(), "publishing");
            self.driver
                .add_file(&checkout, &self.workspace.join(file.path()), file.path())
                .with_context(|| format!("Failed to stage {}", file.path().display()))?;
        }
        let message = CommitMessage::new(PUBLISH_COMMIT_MESSAGE);
        match self.driver.commit(&checkout, &message)? {
            Some(id) => debug!(commit = %id, "committed"),
            None => debug!("nothing to commit"),
        }
        self.driver
            .publish(&checkout, &self.remote, &self.branch)
            .context("Failed to push the documentation branch")?;
        Ok(())
    }

    /// Release the isolated checkout.
    ///
    /// Runs exactly once; a publisher dropped without `close` performs
    /// the same release from `Drop`.
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        self.driver
            .remove_worktree(&self.workspace, &self.checkout_rel)
            .context("Failed to remove the publishing worktree")?;
        Ok(())
    }
}

impl<R: CommandRunner> Drop for Publisher<R> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(error) = self
            .driver
            .remove_worktree(&self.workspace, &self.checkout_rel)
        {
            warn!(%error, "failed to remove the publishing worktree");
        }
    }
}
