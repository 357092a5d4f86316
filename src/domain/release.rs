use std::fmt;

use crate::domain::{BumpRule, Version};

/// The outcome of computing one release: where we were, where we go, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub old_version: Version,
    pub new_version: Version,
    pub rule: BumpRule,
}

impl ReleaseRecord {
    pub fn new(old_version: Version, new_version: Version, rule: BumpRule) -> Self {
        ReleaseRecord {
            old_version,
            new_version,
            rule,
        }
    }

    /// Substitute `{version}`, `{old_version}` and `{rule}` in a message template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{old_version}", &self.old_version.to_string())
            .replace("{version}", &self.new_version.to_string())
            .replace("{rule}", &self.rule.to_string())
    }
}

/// Progress of a single invocation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Parsed,
    Computed,
    Rewritten,
    Committed,
    Tagged,
    Done,
}

impl Stage {
    /// Whether anything durable exists in the repository at this stage.
    pub fn has_commit(&self) -> bool {
        *self >= Stage::Committed
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Parsed => "parsed",
            Stage::Computed => "computed",
            Stage::Rewritten => "rewritten",
            Stage::Committed => "committed",
            Stage::Tagged => "tagged",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}
