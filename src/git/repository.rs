use crate::error::{BumpError, Result};
use crate::git::PathChange;
use git2::{ErrorCode, Oid, Repository as Git2Repo, Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| BumpError::config("Bare repositories have no working tree to rewrite"))?;

        Ok(Git2Repository { repo, workdir })
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn changed_paths(&self) -> Result<Vec<PathChange>> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        let mut changes = Vec::new();
        for entry in statuses.iter() {
            let status = entry.status();
            if status.is_ignored() || status == Status::CURRENT {
                continue;
            }
            let Some(path) = entry.path() else {
                continue;
            };
            changes.push(PathChange {
                path: PathBuf::from(path),
                untracked: status == Status::WT_NEW,
            });
        }

        Ok(changes)
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path).map_err(|e| {
                BumpError::commit(format!("Cannot stage {}: {}", path.display(), e))
            })?;
        }
        index
            .write()
            .map_err(|e| BumpError::commit(format!("Cannot write index: {}", e)))?;
        Ok(())
    }

    fn unstage(&self, paths: &[PathBuf]) -> Result<()> {
        let head = self.head_commit()?.map(|c| c.into_object());
        self.repo
            .reset_default(head.as_ref(), paths.iter().map(PathBuf::as_path))?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;
        let tree_id = index
            .write_tree()
            .map_err(|e| BumpError::commit(format!("Cannot write tree: {}", e)))?;
        let tree = self.repo.find_tree(tree_id)?;

        let signature = self
            .repo
            .signature()
            .map_err(|e| BumpError::commit(format!("No committer identity configured: {}", e)))?;

        let parent = self.head_commit()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .map_err(|e| BumpError::commit(format!("Cannot create commit: {}", e)))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let object = self.repo.find_object(target, None)?;
        let signature = self.repo.signature()?;

        match self.repo.tag(name, &object, &signature, message, false) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == ErrorCode::Exists => {
                Err(BumpError::TagAlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
