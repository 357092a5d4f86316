//! Domain logic - pure release rules independent of git operations

pub mod location;
pub mod release;
pub mod tag;
pub mod version;

pub use location::VersionLocation;
pub use release::{ReleaseRecord, Stage};
pub use tag::TagPattern;
pub use version::{BumpRule, Version};
