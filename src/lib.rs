pub mod boundary;
pub mod committer;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod git;
pub mod hooks;
pub mod logging;
pub mod rewriter;
pub mod ui;

pub use error::{BumpError, ReleaseFailure, Result};
