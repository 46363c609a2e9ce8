//! Package manifest reading and schema validation
//!
//! A `.docpkg` manifest is one S-expression of the form
//! `(manifest :id <atom> :name "<text>" :paths ("<p1>" "<p2>" ...))`.
//! Key order is insignificant; all three keys are required; unknown keys
//! are ignored. Any structural or type mismatch yields absence, never an
//! error; the specific mismatch is logged for diagnosability.

pub mod sexpr;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use sexpr::Expression;

/// File name of the package manifest, at the root of the published path.
pub const MANIFEST_FILE_NAME: &str = ".docpkg";

/// User-supplied package identifier.
///
/// Lowercase start, then lowercase letters, digits, slashes and dashes;
/// at most 20 characters in total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId(String);

fn package_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9/-]{0,19}$").expect("valid pattern"))
}

impl PackageId {
    /// Validate at construction; anything outside the pattern is rejected.
    pub fn new(value: &str) -> Option<Self> {
        if package_id_pattern().is_match(value) {
            Some(Self(value.to_string()))
        } else {
            debug!(value, "package id rejected");
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable package title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A file to publish, addressed relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileDescription(PathBuf);

impl FileDescription {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A decoded `.docpkg` manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub id: PackageId,
    pub name: PackageName,
    pub files: HashSet<FileDescription>,
}

impl Manifest {
    /// Parse manifest source text; absence on any parse or schema mismatch.
    pub fn parse(source: &str) -> Option<Self> {
        Self::decode(&sexpr::read(source)?)
    }

    /// Decode a parsed expression against the manifest schema.
    pub fn decode(expression: &Expression) -> Option<Self> {
        let Expression::Pair(head, tail) = expression else {
            debug!("manifest is not a list");
            return None;
        };
        match head.as_ref() {
            Expression::Atom(word) if word == "manifest" => {}
            _ => {
                debug!("expression does not open with the manifest atom");
                return None;
            }
        }
        let Some(items) = tail.to_vec() else {
            debug!("manifest body is not a proper list");
            return None;
        };
        if items.len() % 2 != 0 {
            debug!(length = items.len(), "manifest plist has odd length");
            return None;
        }

        let mut pairs: HashMap<&str, &Expression> = HashMap::new();
        for entry in items.chunks(2) {
            let Expression::Atom(key) = entry[0] else {
                debug!("manifest key is not an atom");
                return None;
            };
            if pairs.insert(key.as_str(), entry[1]).is_some() {
                debug!(key, "duplicate manifest key");
                return None;
            }
        }

        let id = match pairs.get(":id") {
            Some(Expression::Atom(value)) => PackageId::new(value)?,
            _ => {
                debug!("manifest :id missing or not an atom");
                return None;
            }
        };
        let name = match pairs.get(":name") {
            Some(Expression::Text(value)) => PackageName::new(value.clone()),
            _ => {
                debug!("manifest :name missing or not quoted text");
                return None;
            }
        };
        let files = match pairs.get(":paths") {
            Some(expression) => decode_paths(expression)?,
            None => {
                debug!("manifest :paths missing");
                return None;
            }
        };

        Some(Manifest { id, name, files })
    }
}

fn decode_paths(expression: &Expression) -> Option<HashSet<FileDescription>> {
    let Some(items) = expression.to_vec() else {
        debug!("manifest :paths is not a proper list");
        return None;
    };
    let mut files = HashSet::new();
    for item in items {
        let Expression::Text(path) = item else {
            debug!("manifest path is not quoted text");
            return None;
        };
        files.insert(FileDescription::new(path));
    }
    Some(files)
}
