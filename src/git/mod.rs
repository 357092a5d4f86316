//! Git operations abstraction layer
//!
//! The release engine only needs a handful of repository capabilities:
//! inspecting the working tree, staging paths, committing and tagging. They
//! are expressed by the [Repository] trait so the engine can run against a
//! real repository or an in-memory fake.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! All paths crossing this trait are relative to the repository working
//! directory.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// A path whose working-tree or index state differs from HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    /// Path relative to the working directory
    pub path: PathBuf,
    /// True when git does not track the path at all
    pub untracked: bool,
}

impl PathChange {
    pub fn modified(path: impl Into<PathBuf>) -> Self {
        PathChange {
            path: path.into(),
            untracked: false,
        }
    }

    pub fn untracked(path: impl Into<PathBuf>) -> Self {
        PathChange {
            path: path.into(),
            untracked: true,
        }
    }
}

/// Version-control capabilities used by a release
///
/// Implementations are used from a single thread for the duration of one
/// invocation; no locking is expected.
///
/// ## Error Handling
///
/// Methods return [crate::error::Result<T>]. Implementations map a rejected
/// commit to [crate::error::BumpError::Commit] and a tag name collision to
/// [crate::error::BumpError::TagAlreadyExists].
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// List every changed path, tracked or not, excluding ignored files
    fn changed_paths(&self) -> Result<Vec<PathChange>>;

    /// Add the current working-tree content of `paths` to the index
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Reset the index entries of `paths` back to HEAD
    fn unstage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit the index on top of HEAD
    ///
    /// # Returns
    /// * `Ok(Oid)` - Object ID of the new commit, now HEAD
    /// * `Err(BumpError::Commit)` - If the repository refuses the commit
    fn commit(&self, message: &str) -> Result<Oid>;

    /// Whether `refs/tags/<name>` exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag pointing at `target`
    ///
    /// Never overwrites: an existing tag yields `BumpError::TagAlreadyExists`.
    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()>;
}
