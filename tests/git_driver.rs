//! Exercises the git facade against real repositories on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use docpkg::git::{BranchName, CommitMessage, GitDriver};
use tempfile::TempDir;

const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().to_path_buf();
    git(&["init"], &root);
    git(&["config", "user.email", "tester@example.com"], &root);
    git(&["config", "user.name", "Tester"], &root);
    fs::write(root.join("README.md"), "# Test repository\n").expect("write README");
    git(&["add", "README.md"], &root);
    git(&["commit", "-m", "chore: initial commit"], &root);
    git(&["branch", "-M", "main"], &root);
    (dir, root)
}

#[test]
fn test_driver_constructs_against_the_installed_git() {
    assert!(GitDriver::new().is_ok());
}

#[test]
fn test_current_branch_reports_main() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    let branch = driver.current_branch(&root).unwrap();
    assert_eq!(branch.as_str(), "main");
}

#[test]
fn test_add_file_copies_and_stages() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    fs::write(root.join("source.md"), "# Notes\n").unwrap();

    driver
        .add_file(&root, &root.join("source.md"), Path::new("notes/summary.md"))
        .unwrap();

    let copied = fs::read_to_string(root.join("notes/summary.md")).unwrap();
    assert_eq!(copied, "# Notes\n");
    let staged = git(&["diff", "--cached", "--name-only"], &root);
    assert_eq!(staged, "notes/summary.md");
}

#[test]
fn test_make_tree_yields_the_empty_tree() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    let tree = driver.make_tree(&root).unwrap();
    assert_eq!(tree.as_str(), EMPTY_TREE);
}

#[test]
fn test_commit_tree_creates_a_parentless_commit() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    let tree = driver.make_tree(&root).unwrap();
    let commit = driver.commit_tree(&root, &tree).unwrap();

    assert_eq!(git(&["cat-file", "-t", commit.as_str()], &root), "commit");
    let count = git(&["rev-list", "--count", commit.as_str()], &root);
    assert_eq!(count, "1");
}

#[test]
fn test_commit_reports_the_new_head_or_absence() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    let message = CommitMessage::new("docs: new package");

    // Clean tree: nothing to commit.
    assert_eq!(driver.commit(&root, &message).unwrap(), None);

    fs::write(root.join("source.md"), "text\n").unwrap();
    driver
        .add_file(&root, &root.join("source.md"), Path::new("copy.md"))
        .unwrap();
    let id = driver.commit(&root, &message).unwrap().unwrap();
    assert_eq!(git(&["rev-parse", "HEAD"], &root), id.as_str());
}

#[test]
fn test_worktree_add_and_remove() {
    let (_dir, root) = init_repo();
    let driver = GitDriver::new().unwrap();
    git(&["branch", "side"], &root);

    driver
        .add_worktree(&root, Path::new("checkout"), &BranchName::new("side"))
        .unwrap();
    assert!(root.join("checkout/README.md").exists());
    assert_eq!(git(&["branch", "--show-current"], &root.join("checkout")), "side");

    driver.remove_worktree(&root, Path::new("checkout")).unwrap();
    assert!(!root.join("checkout").exists());
}

#[test]
fn test_initialize_creates_a_repository() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("fresh");
    let driver = GitDriver::new().unwrap();

    driver.initialize(&target).unwrap();
    assert!(target.join(".git").exists());
}

#[test]
fn test_clone_replicates_a_repository() {
    let (_dir, root) = init_repo();
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("replica");
    let driver = GitDriver::new().unwrap();

    driver.clone(&root, &target).unwrap();
    assert!(target.join("README.md").exists());
}
