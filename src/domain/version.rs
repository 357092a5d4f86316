use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Field order matters: the derived `Ord` compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version-of-record string such as `"1.4.9"`.
    ///
    /// Surrounding whitespace is ignored. Leading zeros, negative numbers,
    /// pre-release and build metadata are all rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let parsed = semver::Version::parse(trimmed).map_err(|e| {
            BumpError::parse(format!(
                "Invalid version '{}' - expected MAJOR.MINOR.PATCH: {}",
                text, e
            ))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(BumpError::parse(format!(
                "Invalid version '{}' - pre-release and build metadata are not supported",
                text
            )));
        }

        Ok(Version::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Bump version according to the rule
    pub fn bump(&self, rule: BumpRule) -> Result<Self> {
        let overflow = || BumpError::VersionOverflow {
            version: self.to_string(),
            rule: rule.to_string(),
        };

        let next = match rule {
            BumpRule::Major => Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            BumpRule::Minor => Version::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            BumpRule::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(next)
    }
}

impl FromStr for Version {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Which segment of the version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpRule {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpRule {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(BumpRule::Major),
            "minor" => Ok(BumpRule::Minor),
            "patch" => Ok(BumpRule::Patch),
            _ => Err(BumpError::InvalidRule(s.to_string())),
        }
    }
}

impl fmt::Display for BumpRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpRule::Major => write!(f, "major"),
            BumpRule::Minor => write!(f, "minor"),
            BumpRule::Patch => write!(f, "patch"),
        }
    }
}
