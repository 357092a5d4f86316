use std::ops::Range;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::Version;
use crate::error::{BumpError, Result};

const PLACEHOLDER: &str = "{version}";

/// Where a version string lives inside a file.
///
/// The pattern is literal text with exactly one `{version}` placeholder,
/// e.g. `version = "{version}"`. A leading `^` anchors it to the start of a
/// line and a trailing `$` to the end of a line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionLocation {
    pub path: PathBuf,
    pub pattern: String,
}

impl VersionLocation {
    pub fn new(path: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        VersionLocation {
            path: path.into(),
            pattern: pattern.into(),
        }
    }

    /// Check the pattern has a single placeholder and compiles.
    pub fn validate(&self) -> Result<()> {
        self.build_regex(r"[0-9]+\.[0-9]+\.[0-9]+").map(|_| ())
    }

    /// Extract the raw version text at this location.
    ///
    /// The text is returned unparsed so that a malformed version surfaces as a
    /// parse error rather than a missing match.
    pub fn read_version<'a>(&self, content: &'a str) -> Result<&'a str> {
        let re = self.build_regex(r#"[^\s"'<>]+"#)?;
        let mut found = re.captures_iter(content).filter_map(|c| c.get(1));

        match (found.next(), found.next()) {
            (Some(m), None) => Ok(m.as_str()),
            (None, _) => Err(BumpError::rewrite(format!(
                "{}: no occurrence of pattern '{}'",
                self.path.display(),
                self.pattern
            ))),
            (Some(_), Some(_)) => Err(BumpError::rewrite(format!(
                "{}: pattern '{}' matches more than once",
                self.path.display(),
                self.pattern
            ))),
        }
    }

    /// Byte range of the single occurrence of `version` under this pattern.
    ///
    /// An occurrence must stand alone: a digit or `.` right before or after it
    /// means it is part of a longer number such as `11.4.9` or `1.4.9.1`.
    /// Zero or multiple occurrences fail closed.
    pub fn find(&self, content: &str, version: &Version) -> Result<Range<usize>> {
        let re = self.build_regex(&regex::escape(&version.to_string()))?;
        let ranges: Vec<Range<usize>> = re
            .captures_iter(content)
            .filter_map(|c| c.get(1).map(|m| m.range()))
            .filter(|range| stands_alone(content, range))
            .collect();

        match ranges.as_slice() {
            [range] => Ok(range.clone()),
            [] => Err(BumpError::rewrite(format!(
                "{}: version {} not found with pattern '{}'",
                self.path.display(),
                version,
                self.pattern
            ))),
            many => Err(BumpError::rewrite(format!(
                "{}: version {} matches {} times with pattern '{}', refusing to guess",
                self.path.display(),
                version,
                many.len(),
                self.pattern
            ))),
        }
    }

    /// Resolve the location's path against a working directory.
    pub fn resolve(&self, workdir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workdir.join(&self.path)
        }
    }

    fn build_regex(&self, version_regex: &str) -> Result<Regex> {
        let parts: Vec<&str> = self.pattern.split(PLACEHOLDER).collect();
        if parts.len() != 2 {
            return Err(BumpError::config(format!(
                "Pattern '{}' for {} must contain exactly one {} placeholder",
                self.pattern,
                self.path.display(),
                PLACEHOLDER
            )));
        }

        let (anchor_start, prefix) = match parts[0].strip_prefix('^') {
            Some(rest) => ("^", rest),
            None => ("", parts[0]),
        };
        let (suffix, anchor_end) = match parts[1].strip_suffix('$') {
            Some(rest) => (rest, r"\r?$"),
            None => (parts[1], ""),
        };

        let source = format!(
            "(?m){}{}({}){}{}",
            anchor_start,
            regex::escape(prefix),
            version_regex,
            regex::escape(suffix),
            anchor_end
        );

        Regex::new(&source)
            .map_err(|e| BumpError::config(format!("Invalid pattern '{}': {}", self.pattern, e)))
    }
}

/// No version character touches either end of `range`.
fn stands_alone(content: &str, range: &Range<usize>) -> bool {
    let joined = |c: char| c.is_ascii_digit() || c == '.';
    !content[..range.start].chars().next_back().is_some_and(joined)
        && !content[range.end..].chars().next().is_some_and(joined)
}
