//! Version banner parsing and the directional compatibility rule

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// A `name major.minor.patch` triple as reported by `git version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    name: String,
    major: u32,
    minor: u32,
    patch: u32,
}

fn banner_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([^ ]+) version (\d+)\.(\d+)\.(\d+)(?: \(.*\))?$").expect("valid pattern")
    })
}

impl SemanticVersion {
    pub fn new(name: &str, major: u32, minor: u32, patch: u32) -> Self {
        Self {
            name: name.to_string(),
            major,
            minor,
            patch,
        }
    }

    /// Parse a banner such as `git version 2.37.0 (Apple Git-136)`.
    ///
    /// All-or-nothing: input that does not match the anchored pattern
    /// yields `None`. The trailing parenthetical suffix is ignored.
    pub fn parse(banner: &str) -> Option<Self> {
        let captures = banner_pattern().captures(banner.trim())?;
        Some(Self {
            name: captures[1].to_string(),
            major: captures[2].parse().ok()?,
            minor: captures[3].parse().ok()?,
            patch: captures[4].parse().ok()?,
        })
    }

    /// Directional compatibility: does `installed` satisfy this requirement?
    ///
    /// Name and major version must match exactly; minor.patch must be at
    /// least the required floor. This is a floor check, not a total order.
    pub fn is_met_by(&self, installed: &SemanticVersion) -> bool {
        let name_matches = self.name == installed.name;
        let same_design = self.major == installed.major && installed.minor >= self.minor;
        name_matches
            && same_design
            && (installed.minor > self.minor || installed.patch >= self.patch)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}.{}", self.name, self.major, self.minor, self.patch)
    }
}
