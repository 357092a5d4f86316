use crate::error::{BumpError, Result};
use crate::git::{PathChange, Repository};
use git2::Oid;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCommit {
    pub oid: Oid,
    pub message: String,
    pub paths: Vec<PathBuf>,
}

/// A tag recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockTag {
    pub target: Oid,
    pub message: String,
}

#[derive(Default)]
struct State {
    changes: Vec<PathChange>,
    staged: Vec<PathBuf>,
    commits: Vec<MockCommit>,
    tags: HashMap<String, MockTag>,
}

/// Mock repository for testing without actual git operations
///
/// Files are never read; the working tree state is whatever the test
/// declares through [MockRepository::add_change].
pub struct MockRepository {
    workdir: PathBuf,
    state: RefCell<State>,
    commit_rejection: Option<String>,
}

impl MockRepository {
    /// Create a new empty mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            state: RefCell::new(State::default()),
            commit_rejection: None,
        }
    }

    /// Declare an uncommitted change in the working tree
    pub fn add_change(&mut self, change: PathChange) {
        self.state.get_mut().changes.push(change);
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.state.get_mut().tags.insert(
            name.into(),
            MockTag {
                target,
                message: String::new(),
            },
        );
    }

    /// Make every commit attempt fail with `reason`
    pub fn reject_commits(&mut self, reason: impl Into<String>) {
        self.commit_rejection = Some(reason.into());
    }

    pub fn commits(&self) -> Vec<MockCommit> {
        self.state.borrow().commits.clone()
    }

    pub fn staged(&self) -> Vec<PathBuf> {
        self.state.borrow().staged.clone()
    }

    pub fn tag(&self, name: &str) -> Option<MockTag> {
        self.state.borrow().tags.get(name).cloned()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn changed_paths(&self) -> Result<Vec<PathChange>> {
        Ok(self.state.borrow().changes.clone())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for path in paths {
            if !state.staged.contains(path) {
                state.staged.push(path.clone());
            }
        }
        Ok(())
    }

    fn unstage(&self, paths: &[PathBuf]) -> Result<()> {
        self.state
            .borrow_mut()
            .staged
            .retain(|staged| !paths.contains(staged));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Oid> {
        if let Some(reason) = &self.commit_rejection {
            return Err(BumpError::commit(reason.clone()));
        }

        let mut state = self.state.borrow_mut();
        let oid = Oid::hash_object(git2::ObjectType::Commit, message.as_bytes())?;
        let paths = std::mem::take(&mut state.staged);
        state.commits.push(MockCommit {
            oid,
            message: message.to_string(),
            paths,
        });
        Ok(oid)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().tags.contains_key(name))
    }

    fn create_tag(&self, name: &str, target: Oid, message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.tags.contains_key(name) {
            return Err(BumpError::TagAlreadyExists(name.to_string()));
        }
        state.tags.insert(
            name.to_string(),
            MockTag {
                target,
                message: message.to_string(),
            },
        );
        Ok(())
    }
}
