//! Hook scripts run around the release commit
//!
//! - pre-commit: after the rewrite, before staging; failure rejects the release
//! - post-tag: after the tag exists; failure is only reported

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
