use std::collections::HashMap;

use crate::domain::ReleaseRecord;

/// Points in the release where a hook script may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreCommit,
    PostTag,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreCommit => "pre-commit",
            HookType::PostTag => "post-tag",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// The release being made
    pub record: ReleaseRecord,
    /// Tag name that is or will be created
    pub tag: String,
}

impl HookContext {
    pub fn new(hook_type: HookType, record: ReleaseRecord, tag: impl Into<String>) -> Self {
        HookContext {
            hook_type,
            record,
            tag: tag.into(),
        }
    }

    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to GIT_BUMP_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("GIT_BUMP_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert(
            "GIT_BUMP_OLD_VERSION".to_string(),
            self.record.old_version.to_string(),
        );
        env.insert(
            "GIT_BUMP_NEW_VERSION".to_string(),
            self.record.new_version.to_string(),
        );
        env.insert("GIT_BUMP_RULE".to_string(), self.record.rule.to_string());
        env.insert("GIT_BUMP_TAG".to_string(), self.tag.clone());

        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BumpRule, Version};

    #[test]
    fn test_hook_type_names() {
        assert_eq!(HookType::PreCommit.name(), "pre-commit");
        assert_eq!(HookType::PostTag.name(), "post-tag");
    }

    #[test]
    fn test_hook_context_to_env_vars() {
        let record = ReleaseRecord::new(Version::new(1, 4, 9), Version::new(1, 4, 10), BumpRule::Patch);
        let ctx = HookContext::new(HookType::PreCommit, record, "v1.4.10");

        let env = ctx.to_env_vars();
        assert_eq!(env.len(), 5);
        assert_eq!(env.get("GIT_BUMP_HOOK"), Some(&"pre-commit".to_string()));
        assert_eq!(env.get("GIT_BUMP_OLD_VERSION"), Some(&"1.4.9".to_string()));
        assert_eq!(env.get("GIT_BUMP_NEW_VERSION"), Some(&"1.4.10".to_string()));
        assert_eq!(env.get("GIT_BUMP_RULE"), Some(&"patch".to_string()));
        assert_eq!(env.get("GIT_BUMP_TAG"), Some(&"v1.4.10".to_string()));
    }
}
