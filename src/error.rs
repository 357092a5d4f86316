use std::fmt;
use std::path::PathBuf;

use git2::Oid;
use thiserror::Error;

use crate::domain::Stage;

/// Unified error type for git-bump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("Invalid bump rule: '{0}' (expected patch, minor or major)")]
    InvalidRule(String),

    #[error("Working tree has uncommitted changes outside the release files: {}", display_paths(.0))]
    DirtyWorkingTree(Vec<PathBuf>),

    #[error("Rewrite error: {0}")]
    Rewrite(String),

    #[error("Tag already exists: {0}")]
    TagAlreadyExists(String),

    #[error("Commit error: {0}")]
    Commit(String),

    #[error("Version overflow: cannot apply {rule} bump to {version}")]
    VersionOverflow { version: String, rule: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-bump
pub type Result<T> = std::result::Result<T, BumpError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl BumpError {
    pub fn parse(msg: impl Into<String>) -> Self {
        BumpError::Parse(msg.into())
    }

    pub fn rewrite(msg: impl Into<String>) -> Self {
        BumpError::Rewrite(msg.into())
    }

    pub fn commit(msg: impl Into<String>) -> Self {
        BumpError::Commit(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    pub fn hook(msg: impl Into<String>) -> Self {
        BumpError::Hook(msg.into())
    }

    /// Process exit code reported for this error.
    ///
    /// `2` is shared with clap's usage errors, so an unknown rule and a
    /// missing rule exit the same way.
    pub fn exit_code(&self) -> u8 {
        match self {
            BumpError::InvalidRule(_) => 2,
            BumpError::Parse(_) | BumpError::VersionOverflow { .. } => 3,
            BumpError::DirtyWorkingTree(_) => 4,
            BumpError::Rewrite(_) => 5,
            BumpError::TagAlreadyExists(_) => 6,
            BumpError::Commit(_) => 7,
            BumpError::Config(_) => 8,
            BumpError::Hook(_) | BumpError::Git(_) | BumpError::Io(_) => 1,
        }
    }
}

/// A failed invocation, together with how far it got.
///
/// `stage` is the last stage that completed. When it is [`Stage::Committed`]
/// the release commit exists (see `commit`) and the caller must either retry
/// tagging or revert it by hand.
#[derive(Debug)]
pub struct ReleaseFailure {
    pub stage: Stage,
    pub commit: Option<Oid>,
    pub rolled_back: bool,
    pub error: BumpError,
}

impl ReleaseFailure {
    pub fn new(stage: Stage, error: BumpError) -> Self {
        ReleaseFailure {
            stage,
            commit: None,
            rolled_back: false,
            error,
        }
    }

    pub fn with_commit(mut self, commit: Oid) -> Self {
        self.commit = Some(commit);
        self
    }

    pub fn rolled_back(mut self) -> Self {
        self.rolled_back = true;
        self
    }

    pub fn exit_code(&self) -> u8 {
        self.error.exit_code()
    }
}

impl fmt::Display for ReleaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (last completed stage: {})", self.error, self.stage)?;
        if let Some(commit) = self.commit {
            write!(f, ", release commit {}", commit)?;
        }
        if self.rolled_back {
            write!(f, ", working tree restored")?;
        }
        Ok(())
    }
}

impl std::error::Error for ReleaseFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
