use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{TagPattern, VersionLocation};
use crate::error::{BumpError, Result};

/// File name looked up in the repository and the user config directory.
pub const CONFIG_FILE_NAME: &str = "gitbump.toml";

/// Represents the complete configuration for git-bump.
///
/// Contains the version locations to rewrite, release naming templates, and optional hooks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The first location is the version of record.
    #[serde(default = "default_locations")]
    pub locations: Vec<VersionLocation>,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

/// Returns the default version location: the package version in Cargo.toml.
fn default_locations() -> Vec<VersionLocation> {
    vec![VersionLocation::new(
        "Cargo.toml",
        r#"^version = "{version}"$"#,
    )]
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_commit_message() -> String {
    "chore(release): {version}".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Naming of the commit and tag produced by a release.
///
/// Templates accept `{version}`, `{old_version}` and `{rule}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    /// Only used to print the push command; git-bump never pushes.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_pattern: default_tag_pattern(),
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
            remote: default_remote(),
        }
    }
}

/// Scripts run around the release commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Runs before staging; a non-zero exit rejects the release.
    #[serde(default)]
    pub pre_commit: Option<PathBuf>,

    /// Runs after tagging; failures are only reported.
    #[serde(default)]
    pub post_tag: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            locations: default_locations(),
            release: ReleaseConfig::default(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| BumpError::config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(BumpError::config("At least one version location is required"));
        }
        for location in &self.locations {
            location.validate()?;
        }
        self.tag_pattern()?;
        Ok(())
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.release.tag_pattern.as_str())
    }

    /// The location holding the version of record.
    pub fn primary_location(&self) -> Result<&VersionLocation> {
        self.locations
            .first()
            .ok_or_else(|| BumpError::config("At least one version location is required"))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitbump.toml` in the repository working directory
/// 3. `gitbump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `workdir` - Repository working directory searched for `gitbump.toml`
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, workdir: &Path) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(workdir),
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path).map_err(|e| {
                BumpError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&text)
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn find_config_file(workdir: &Path) -> Option<PathBuf> {
    let local = workdir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
