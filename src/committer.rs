use std::path::PathBuf;

use git2::Oid;

use crate::config::ReleaseConfig;
use crate::domain::{ReleaseRecord, Stage, TagPattern};
use crate::error::{BumpError, ReleaseFailure, Result};
use crate::git::Repository;

/// The commit and tag produced by a release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCommit {
    pub commit: Oid,
    pub tag: String,
}

/// Stages the rewritten files, commits them and tags the commit
pub struct ReleaseCommitter<'r, R: Repository> {
    repo: &'r R,
    tag_pattern: TagPattern,
    commit_message: String,
    tag_message: String,
}

impl<'r, R: Repository> ReleaseCommitter<'r, R> {
    pub fn new(repo: &'r R, config: &ReleaseConfig) -> Result<Self> {
        Ok(ReleaseCommitter {
            repo,
            tag_pattern: TagPattern::new(config.tag_pattern.as_str())?,
            commit_message: config.commit_message.clone(),
            tag_message: config.tag_message.clone(),
        })
    }

    /// Name of the tag this committer creates for `record`
    pub fn tag_name(&self, record: &ReleaseRecord) -> String {
        self.tag_pattern.format(&record.new_version)
    }

    pub fn commit_message(&self, record: &ReleaseRecord) -> String {
        record.render(&self.commit_message)
    }

    /// Stage exactly `paths`, commit, then create the annotated tag.
    ///
    /// A failure before the commit exists is reported at
    /// [`Stage::Rewritten`] with the paths unstaged again; a failure while
    /// tagging is reported at [`Stage::Committed`] with the commit id. Never
    /// pushes.
    pub fn commit_and_tag(
        &self,
        record: &ReleaseRecord,
        paths: &[PathBuf],
    ) -> std::result::Result<ReleaseCommit, ReleaseFailure> {
        let commit = self
            .commit(record, paths)
            .map_err(|error| ReleaseFailure::new(Stage::Rewritten, error))?;

        let tag = self.tag_name(record);
        self.tag(record, &tag, commit).map_err(|error| {
            ReleaseFailure::new(Stage::Committed, error).with_commit(commit)
        })?;

        Ok(ReleaseCommit { commit, tag })
    }

    fn commit(&self, record: &ReleaseRecord, paths: &[PathBuf]) -> Result<Oid> {
        let result = self
            .repo
            .stage(paths)
            .and_then(|()| self.repo.commit(&self.commit_message(record)));

        match result {
            Ok(commit) => {
                tracing::info!(%commit, "release commit created");
                Ok(commit)
            }
            Err(error) => {
                if let Err(unstage_error) = self.repo.unstage(paths) {
                    tracing::warn!(error = %unstage_error, "cannot unstage release files");
                }
                Err(as_commit_error(error))
            }
        }
    }

    fn tag(&self, record: &ReleaseRecord, tag: &str, commit: Oid) -> Result<()> {
        if self.repo.tag_exists(tag)? {
            return Err(BumpError::TagAlreadyExists(tag.to_string()));
        }

        self.repo.create_tag(tag, commit, &record.render(&self.tag_message))?;
        tracing::info!(tag, %commit, "release tag created");
        Ok(())
    }
}

/// Anything the repository throws at staging or commit time is a rejected commit.
fn as_commit_error(error: BumpError) -> BumpError {
    match error {
        BumpError::Commit(_) => error,
        other => BumpError::commit(other.to_string()),
    }
}
