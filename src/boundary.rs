use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions noticed while preparing a release.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A file that will be rewritten already had uncommitted edits; they become part of the release commit.
    /// If the commit is rejected the file content is restored but its index entry is reset to HEAD.
    TouchedFileHasLocalEdits { path: PathBuf },
    /// Untracked files exist; they are left out of the release commit
    UntrackedFilesIgnored { count: usize },
    /// The post-tag hook failed after the release was complete
    PostTagHookFailed { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::TouchedFileHasLocalEdits { path } => {
                write!(
                    f,
                    "'{}' has uncommitted edits that will be included in the release commit \
                     (if the commit fails they are kept in the working tree but unstaged)",
                    path.display()
                )
            }
            BoundaryWarning::UntrackedFilesIgnored { count } => {
                let noun = if *count == 1 { "file" } else { "files" };
                write!(
                    f,
                    "{} untracked {} left out of the release commit",
                    count, noun
                )
            }
            BoundaryWarning::PostTagHookFailed { reason } => {
                write!(f, "post-tag hook failed: {}", reason)
            }
        }
    }
}
