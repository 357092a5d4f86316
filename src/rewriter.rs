//! Transactional rewrite of the version string across configured files.
//!
//! A rewrite happens in two phases. [FileRewriter::plan] reads every file and
//! computes every replacement in memory; any location that does not match
//! exactly once aborts the run before a byte is written. [RewritePlan::apply]
//! then writes each file through a temporary sibling and a rename, restoring
//! the already-written files if a later write fails.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use crate::boundary::BoundaryWarning;
use crate::domain::{Version, VersionLocation};
use crate::error::{BumpError, Result};
use crate::git::Repository;

/// New content for one file, plus what it replaces
#[derive(Debug, Clone, PartialEq)]
pub struct FileEdit {
    /// Path relative to the working directory
    pub path: PathBuf,
    /// Number of configured locations applied to this file
    pub locations: usize,
    absolute: PathBuf,
    original: String,
    updated: String,
}

impl FileEdit {
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn updated(&self) -> &str {
        &self.updated
    }
}

/// Rewrites version strings under a working directory
pub struct FileRewriter<'a> {
    workdir: &'a Path,
}

impl<'a> FileRewriter<'a> {
    pub fn new(workdir: &'a Path) -> Self {
        FileRewriter { workdir }
    }

    /// Paths the given locations would touch, relative to the working directory, without duplicates.
    pub fn touched_paths(&self, locations: &[VersionLocation]) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for location in locations {
            let path = relative_to(self.workdir, &location.path);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Read the raw version-of-record text at `location`.
    pub fn read_version(&self, location: &VersionLocation) -> Result<Version> {
        let path = location.resolve(self.workdir);
        let content = fs::read_to_string(&path).map_err(|e| {
            BumpError::rewrite(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let text = location.read_version(&content)?;
        tracing::debug!(path = %location.path.display(), version = text, "read version of record");
        Version::parse(text)
    }

    /// Compute every replacement in memory.
    ///
    /// Fails with `BumpError::Rewrite` if any location matches `old` zero or
    /// several times. Nothing on disk is touched.
    pub fn plan(
        &self,
        locations: &[VersionLocation],
        old: &Version,
        new: &Version,
    ) -> Result<RewritePlan> {
        let replacement = new.to_string();
        let mut edits: Vec<FileEdit> = Vec::new();

        for location in locations {
            let path = relative_to(self.workdir, &location.path);

            let index = match edits.iter().position(|e| e.path == path) {
                Some(index) => index,
                None => {
                    let absolute = self.workdir.join(&path);
                    let original = fs::read_to_string(&absolute).map_err(|e| {
                        BumpError::rewrite(format!("Cannot read {}: {}", absolute.display(), e))
                    })?;
                    edits.push(FileEdit {
                        path: path.clone(),
                        locations: 0,
                        absolute,
                        updated: original.clone(),
                        original,
                    });
                    edits.len() - 1
                }
            };

            let edit = &mut edits[index];
            let range = location.find(&edit.updated, old)?;
            tracing::debug!(
                path = %edit.path.display(),
                pattern = %location.pattern,
                offset = range.start,
                "version location matched"
            );
            edit.updated.replace_range(range, &replacement);
            edit.locations += 1;
        }

        Ok(RewritePlan { edits })
    }
}

/// Validated, not yet written, set of file edits
#[derive(Debug)]
pub struct RewritePlan {
    edits: Vec<FileEdit>,
}

impl RewritePlan {
    pub fn edits(&self) -> &[FileEdit] {
        &self.edits
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.edits.iter().map(|e| e.path.clone()).collect()
    }

    /// Write every edit, or none.
    ///
    /// If writing file k fails, files 0..k are restored to their original
    /// content before the error is returned.
    pub fn apply(self) -> Result<AppliedRewrite> {
        for (written, edit) in self.edits.iter().enumerate() {
            if let Err(e) = write_atomic(&edit.absolute, &edit.updated) {
                let restore = restore_originals(&self.edits[..written]);
                let mut message = format!("Cannot write {}: {}", edit.path.display(), e);
                if let Err(restore_err) = restore {
                    message.push_str(&format!("; restoring earlier files also failed: {}", restore_err));
                }
                return Err(BumpError::rewrite(message));
            }
            tracing::debug!(path = %edit.path.display(), "file rewritten");
        }

        tracing::info!(files = self.edits.len(), "version rewritten");
        Ok(AppliedRewrite { edits: self.edits })
    }
}

/// Edits that are now on disk, kept so they can be undone
#[derive(Debug)]
pub struct AppliedRewrite {
    edits: Vec<FileEdit>,
}

impl AppliedRewrite {
    pub fn edits(&self) -> &[FileEdit] {
        &self.edits
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.edits.iter().map(|e| e.path.clone()).collect()
    }

    /// Put every file back the way it was before [RewritePlan::apply].
    pub fn rollback(self) -> Result<()> {
        restore_originals(&self.edits).map_err(|e| {
            BumpError::rewrite(format!("Cannot restore original file contents: {}", e))
        })?;
        tracing::info!(files = self.edits.len(), "version rewrite rolled back");
        Ok(())
    }
}

/// Check that the working tree holds no tracked changes outside `touched`.
///
/// Returns warnings for conditions that do not block the release: touched
/// files that already carry local edits, and untracked files that will be
/// left out of the commit.
pub fn ensure_clean<R: Repository>(repo: &R, touched: &[PathBuf]) -> Result<Vec<BoundaryWarning>> {
    let mut dirty = Vec::new();
    let mut warnings = Vec::new();
    let mut untracked = 0;

    for change in repo.changed_paths()? {
        let path = relative_to(repo.workdir(), &change.path);
        if touched.contains(&path) {
            warnings.push(BoundaryWarning::TouchedFileHasLocalEdits { path });
        } else if change.untracked {
            untracked += 1;
        } else {
            dirty.push(path);
        }
    }

    if !dirty.is_empty() {
        dirty.sort();
        return Err(BumpError::DirtyWorkingTree(dirty));
    }

    if untracked > 0 {
        warnings.push(BoundaryWarning::UntrackedFilesIgnored { count: untracked });
    }

    Ok(warnings)
}

/// Normalize `path` to be relative to `workdir`, dropping `.` components.
fn relative_to(workdir: &Path, path: &Path) -> PathBuf {
    let path = path.strip_prefix(workdir).unwrap_or(path);
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn restore_originals(edits: &[FileEdit]) -> std::io::Result<()> {
    let mut first_error = None;
    for edit in edits.iter().rev() {
        if let Err(e) = write_atomic(&edit.absolute, &edit.original) {
            tracing::error!(path = %edit.path.display(), error = %e, "cannot restore file");
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Replace `path` with `content` through a temporary file in the same directory.
///
/// Symlinks are resolved first so the link itself survives and its target is
/// the file that gets replaced.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let path = fs::canonicalize(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&path)?.permissions();

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    fs::set_permissions(file.path(), permissions)?;
    file.persist(&path).map_err(|e| e.error)?;
    Ok(())
}
