//! Publish command
//! Usage: docpkg publish <path> [--remote <name>]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::git::GitDriver;
use crate::manifest::{Manifest, MANIFEST_FILE_NAME};
use crate::publish::{PublishOptions, Publisher};

/// Publish the files listed by `<path>/.docpkg`.
///
/// A missing or invalid manifest is reported before any git side effect.
pub fn execute(path: PathBuf, remote: String) -> Result<()> {
    let manifest_path = path.join(MANIFEST_FILE_NAME);
    let Ok(source) = fs::read_to_string(&manifest_path) else {
        bail!("No package manifest found at {}", manifest_path.display());
    };
    let Some(manifest) = Manifest::parse(&source) else {
        bail!(
            "{} is not a valid package manifest",
            manifest_path.display()
        );
    };

    println!(
        "Publishing {} ({} file(s))...",
        manifest.name.as_str().cyan(),
        manifest.files.len()
    );

    let driver = GitDriver::new().context("Failed to initialize the git driver")?;
    let options = PublishOptions {
        remote,
        ..Default::default()
    };
    let publisher = Publisher::with_options(driver, &path, &manifest.id, options)?;

    publisher.publish(manifest.files.iter())?;
    let branch = publisher.branch().clone();
    publisher.close()?;

    println!(
        "{} Published package '{}' to branch {}",
        "✓".green().bold(),
        manifest.id,
        branch.as_str().dimmed()
    );

    Ok(())
}
