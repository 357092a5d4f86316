//! User interface module - terminal output for a release run.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_failure, display_manual_push_instruction,
    display_release, display_status, display_success, format_version_change,
};
