//! Release workflow orchestration
//!
//! Runs one invocation through `Idle → Parsed → Computed → Rewritten →
//! Committed → Tagged → Done`. The version travels as a value from stage to
//! stage; files are only read when the version of record is parsed and only
//! written by the rewrite. Any error stops the run and is returned together
//! with the last stage reached.

use std::path::PathBuf;

use git2::Oid;

use crate::boundary::BoundaryWarning;
use crate::committer::ReleaseCommitter;
use crate::config::Config;
use crate::domain::{BumpRule, ReleaseRecord, Stage};
use crate::error::{BumpError, ReleaseFailure};
use crate::git::Repository;
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::rewriter::{ensure_clean, AppliedRewrite, FileRewriter};

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub record: ReleaseRecord,
    /// Files rewritten (or, for a dry run, that would be)
    pub files: Vec<PathBuf>,
    pub tag: String,
    /// `None` for a dry run
    pub commit: Option<Oid>,
    pub stage: Stage,
    pub warnings: Vec<BoundaryWarning>,
    pub dry_run: bool,
}

/// Runs releases against one repository with one configuration
pub struct BumpEngine<'a, R: Repository> {
    repo: &'a R,
    config: &'a Config,
}

impl<'a, R: Repository> BumpEngine<'a, R> {
    pub fn new(repo: &'a R, config: &'a Config) -> Self {
        BumpEngine { repo, config }
    }

    /// Bump the version of record by `rule`, rewrite every location, commit and tag.
    ///
    /// With `dry_run` the run stops after the rewrite has been planned and
    /// validated; nothing is written.
    pub fn run(&self, rule: BumpRule, dry_run: bool) -> Result<ReleaseOutcome, ReleaseFailure> {
        let span = tracing::info_span!("release", %rule, dry_run);
        let _guard = span.enter();

        let at = |stage: Stage| move |error: BumpError| ReleaseFailure::new(stage, error);

        let committer = ReleaseCommitter::new(self.repo, &self.config.release).map_err(at(Stage::Idle))?;
        let rewriter = FileRewriter::new(self.repo.workdir());

        let primary = self.config.primary_location().map_err(at(Stage::Idle))?;
        let old_version = rewriter.read_version(primary).map_err(at(Stage::Idle))?;
        tracing::info!(version = %old_version, "parsed version of record");

        let new_version = old_version.bump(rule).map_err(at(Stage::Parsed))?;
        let record = ReleaseRecord::new(old_version, new_version, rule);
        let tag = committer.tag_name(&record);
        tracing::info!(from = %old_version, to = %new_version, %tag, "computed next version");

        let touched = rewriter.touched_paths(&self.config.locations);
        let mut warnings = ensure_clean(self.repo, &touched).map_err(at(Stage::Computed))?;
        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        let plan = rewriter
            .plan(&self.config.locations, &old_version, &new_version)
            .map_err(at(Stage::Computed))?;

        if dry_run {
            return Ok(ReleaseOutcome {
                record,
                files: plan.paths(),
                tag,
                commit: None,
                stage: Stage::Computed,
                warnings,
                dry_run: true,
            });
        }

        let applied = plan.apply().map_err(at(Stage::Computed))?;
        let files = applied.paths();

        if let Some(script) = &self.config.hooks.pre_commit {
            let context = HookContext::new(HookType::PreCommit, record, tag.as_str());
            if let Err(e) = HookExecutor::execute(script, self.repo.workdir(), &context) {
                let failure = ReleaseFailure::new(
                    Stage::Rewritten,
                    BumpError::commit(format!("pre-commit hook rejected the release: {}", e)),
                );
                return Err(self.roll_back(applied, failure));
            }
        }

        let release = match committer.commit_and_tag(&record, &files) {
            Ok(release) => release,
            Err(failure) if !failure.stage.has_commit() => {
                return Err(self.roll_back(applied, failure));
            }
            Err(failure) => {
                tracing::error!(commit = ?failure.commit, "release commit exists but tagging failed");
                return Err(failure);
            }
        };

        // A failed post-tag hook leaves the run at Tagged; the release itself stands.
        let mut stage = Stage::Done;
        if let Some(script) = &self.config.hooks.post_tag {
            let context = HookContext::new(HookType::PostTag, record, release.tag.as_str());
            if let Err(e) = HookExecutor::execute(script, self.repo.workdir(), &context) {
                let warning = BoundaryWarning::PostTagHookFailed {
                    reason: e.to_string(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                stage = Stage::Tagged;
            }
        }

        tracing::info!(tag = %release.tag, commit = %release.commit, "release complete");

        Ok(ReleaseOutcome {
            record,
            files,
            tag: release.tag,
            commit: Some(release.commit),
            stage,
            warnings,
            dry_run: false,
        })
    }

    fn roll_back(&self, applied: AppliedRewrite, failure: ReleaseFailure) -> ReleaseFailure {
        match applied.rollback() {
            Ok(()) => failure.rolled_back(),
            Err(e) => {
                tracing::error!(error = %e, "working tree could not be restored");
                failure
            }
        }
    }
}
