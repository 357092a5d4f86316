use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use git_bump::config::{self, Config};
use git_bump::domain::{BumpRule, Stage};
use git_bump::engine::{BumpEngine, ReleaseOutcome};
use git_bump::git::{Git2Repository, Repository};
use git_bump::{logging, ui, ReleaseFailure};

#[derive(clap::Parser)]
#[command(
    name = "git-bump",
    version,
    about = "Bump the project version, commit it and tag the release"
)]
struct Args {
    #[arg(help = "Which part of the version to bump: patch, minor or major")]
    rule: String,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Repository to release (discovered upwards from this path)"
    )]
    repo: PathBuf,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("{}", e);
    }

    match run(&args) {
        Ok((outcome, config)) => {
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_release(&outcome);

            if outcome.dry_run {
                ui::display_status("Dry run: no files written, nothing committed or tagged");
            } else {
                ui::display_success(&format!(
                    "Released {}",
                    ui::format_version_change(&outcome.record)
                ));
                ui::display_manual_push_instruction(&outcome.tag, &config.release.remote);
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            ui::display_failure(&failure);
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(ReleaseOutcome, Config), ReleaseFailure> {
    let idle = |error| ReleaseFailure::new(Stage::Idle, error);

    let rule: BumpRule = args.rule.parse().map_err(idle)?;
    let repo = Git2Repository::open(&args.repo).map_err(idle)?;
    let config = config::load_config(args.config.as_deref(), repo.workdir()).map_err(idle)?;

    let outcome = BumpEngine::new(&repo, &config).run(rule, args.dry_run)?;
    Ok((outcome, config))
}
