//! Pure formatting functions for UI output.
//!
//! Everything the user is meant to read goes through here; diagnostics go
//! through `tracing` instead.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::ReleaseRecord;
use crate::engine::ReleaseOutcome;
use crate::error::ReleaseFailure;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One-line summary of the version change, e.g. `1.4.9 → 1.4.10 (patch)`.
pub fn format_version_change(record: &ReleaseRecord) -> String {
    format!(
        "{} → {} ({})",
        record.old_version, record.new_version, record.rule
    )
}

/// Display the planned or completed release.
pub fn display_release(outcome: &ReleaseOutcome) {
    let heading = if outcome.dry_run {
        "Release plan (dry run):"
    } else {
        "Release:"
    };
    println!("\n{}", style(heading).bold());
    println!("  Version: {}", format_version_change(&outcome.record));
    println!("  Tag:     {}", style(&outcome.tag).green());
    if let Some(commit) = outcome.commit {
        println!("  Commit:  {}", commit);
    }
    println!("  Files:");
    for file in &outcome.files {
        println!("    - {}", file.display());
    }
}

/// Display a failed run, including what is left behind.
pub fn display_failure(failure: &ReleaseFailure) {
    display_error(&failure.error.to_string());
    eprintln!("  Last completed stage: {}", failure.stage);
    if failure.rolled_back {
        eprintln!("  Rewritten files were restored.");
    }
    if let Some(commit) = failure.commit {
        eprintln!(
            "  Release commit {} exists without its tag: create the tag by hand or revert the commit.",
            commit
        );
    }
}

/// Display manual push instruction for a release.
///
/// Shows the git command that publishes the release commit and tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To publish this release, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} HEAD {}", remote, tag)).cyan()
    );
}
