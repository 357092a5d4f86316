// tests/integration_test.rs
use git2::Repository;
use git_bump::config::{Config, CONFIG_FILE_NAME};
use git_bump::domain::{BumpRule, Stage, Version};
use git_bump::engine::BumpEngine;
use git_bump::git::{Git2Repository, Repository as _};
use git_bump::BumpError;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const CARGO: &str = "[package]\nname = \"demo\"\nversion = \"1.4.9\"\n\n[dependencies]\nserde = \"1.0\"\n";

const CONFIG: &str = r#"
[[locations]]
path = "Cargo.toml"
pattern = '^version = "{version}"$'

[[locations]]
path = "VERSION"
pattern = "^{version}$"
"#;

// Helper function to setup a temporary git repo with a committed version of record
fn setup_test_repo(cargo: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    fs::write(temp_dir.path().join("Cargo.toml"), cargo).unwrap();
    fs::write(temp_dir.path().join("VERSION"), "1.4.9\n").unwrap();
    fs::write(temp_dir.path().join("README.md"), "# demo\n").unwrap();
    fs::write(temp_dir.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();

    let mut index = repo.index().expect("Could not get index");
    for name in ["Cargo.toml", "VERSION", "README.md", CONFIG_FILE_NAME] {
        index
            .add_path(Path::new(name))
            .expect("Could not add file to index");
    }
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let signature = repo.signature().expect("Could not get sig");
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "Initial commit",
        &tree,
        &[],
    )
    .expect("Could not create commit");

    temp_dir
}

fn load(dir: &TempDir) -> Config {
    Config::from_toml(&fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap()).unwrap()
}

fn head_message(dir: &TempDir) -> String {
    let repo = Repository::open(dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    head.message().unwrap().to_string()
}

#[test]
fn test_patch_release_end_to_end() {
    let dir = setup_test_repo(CARGO);
    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(&dir);

    let outcome = BumpEngine::new(&repo, &config)
        .run(BumpRule::Patch, false)
        .expect("release should succeed");

    assert_eq!(outcome.stage, Stage::Done);
    assert_eq!(outcome.record.old_version, Version::new(1, 4, 9));
    assert_eq!(outcome.record.new_version, Version::new(1, 4, 10));
    assert_eq!(outcome.tag, "v1.4.10");

    let cargo = fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
    assert!(cargo.contains("version = \"1.4.10\""));
    assert!(cargo.contains("serde = \"1.0\""));
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.4.10\n");

    assert_eq!(head_message(&dir), "chore(release): 1.4.10");
    assert!(repo.changed_paths().unwrap().is_empty());

    // The tag is annotated and points at the release commit
    let git = Repository::open(dir.path()).unwrap();
    let reference = git.find_reference("refs/tags/v1.4.10").unwrap();
    let tag = reference.peel_to_tag().expect("tag should be annotated");
    assert_eq!(tag.message(), Some("Release 1.4.10"));
    assert_eq!(Some(tag.target_id()), outcome.commit);
}

#[test]
fn test_major_release_from_zero() {
    let dir = setup_test_repo("[package]\nname = \"demo\"\nversion = \"0.0.1\"\n");
    fs::write(dir.path().join("VERSION"), "0.0.1\n").unwrap();
    {
        let git = Repository::open(dir.path()).unwrap();
        let mut index = git.index().unwrap();
        index.add_path(Path::new("VERSION")).unwrap();
        index.write().unwrap();
        let tree = git.find_tree(index.write_tree().unwrap()).unwrap();
        let parent = git.head().unwrap().peel_to_commit().unwrap();
        let signature = git.signature().unwrap();
        git.commit(Some("HEAD"), &signature, &signature, "Set 0.0.1", &tree, &[&parent])
            .unwrap();
    }

    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(&dir);
    let outcome = BumpEngine::new(&repo, &config)
        .run(BumpRule::Major, false)
        .unwrap();

    assert_eq!(outcome.record.new_version, Version::new(1, 0, 0));
    assert!(repo.tag_exists("v1.0.0").unwrap());
}

#[test]
fn test_dirty_working_tree_blocks_release() {
    let dir = setup_test_repo(CARGO);
    fs::write(dir.path().join("README.md"), "# demo\n\nwork in progress\n").unwrap();

    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(&dir);
    let failure = BumpEngine::new(&repo, &config)
        .run(BumpRule::Minor, false)
        .unwrap_err();

    match &failure.error {
        BumpError::DirtyWorkingTree(paths) => {
            assert_eq!(paths, &vec![std::path::PathBuf::from("README.md")])
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(), CARGO);
    assert_eq!(head_message(&dir), "Initial commit");
}

fn head_id(dir: &TempDir) -> git2::Oid {
    let repo = Repository::open(dir.path()).unwrap();
    let id = repo.head().unwrap().target().unwrap();
    id
}

fn stage_file(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
    let git = Repository::open(dir.path()).unwrap();
    let mut index = git.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
}

fn assert_blocked_by(dir: &TempDir, expected: &str) {
    let before = head_id(dir);
    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(dir);
    let failure = BumpEngine::new(&repo, &config)
        .run(BumpRule::Patch, false)
        .unwrap_err();

    match &failure.error {
        BumpError::DirtyWorkingTree(paths) => {
            assert_eq!(paths, &vec![std::path::PathBuf::from(expected)])
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(failure.stage, Stage::Computed);
    assert_eq!(head_id(dir), before);
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.4.9\n");
}

#[test]
fn test_staged_edit_blocks_release() {
    let dir = setup_test_repo(CARGO);
    stage_file(&dir, "README.md", "# demo\n\nstaged change\n");
    assert_blocked_by(&dir, "README.md");
}

#[test]
fn test_staged_new_file_blocks_release() {
    let dir = setup_test_repo(CARGO);
    stage_file(&dir, "NOTES.md", "draft\n");
    assert_blocked_by(&dir, "NOTES.md");
}

#[test]
fn test_untracked_file_does_not_block_release() {
    let dir = setup_test_repo(CARGO);
    fs::write(dir.path().join("scratch.txt"), "notes\n").unwrap();

    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(&dir);
    let outcome = BumpEngine::new(&repo, &config)
        .run(BumpRule::Patch, false)
        .unwrap();

    assert_eq!(outcome.stage, Stage::Done);
    assert_eq!(
        outcome.warnings,
        vec![git_bump::boundary::BoundaryWarning::UntrackedFilesIgnored { count: 1 }]
    );
    // The untracked file stays out of the release commit
    let git = Repository::open(dir.path()).unwrap();
    let tree = git.head().unwrap().peel_to_tree().unwrap();
    assert!(tree.get_name("scratch.txt").is_none());
}

#[test]
fn test_existing_tag_reports_commit() {
    let dir = setup_test_repo(CARGO);
    {
        let git = Repository::open(dir.path()).unwrap();
        let head = git.head().unwrap().peel(git2::ObjectType::Commit).unwrap();
        git.tag_lightweight("v1.4.10", &head, false).unwrap();
    }

    let repo = Git2Repository::open(dir.path()).unwrap();
    let config = load(&dir);
    let failure = BumpEngine::new(&repo, &config)
        .run(BumpRule::Patch, false)
        .unwrap_err();

    assert!(matches!(failure.error, BumpError::TagAlreadyExists(_)));
    assert_eq!(failure.stage, Stage::Committed);

    let git = Repository::open(dir.path()).unwrap();
    let head = git.head().unwrap().target().unwrap();
    assert_eq!(failure.commit, Some(head));
    assert_eq!(head_message(&dir), "chore(release): 1.4.10");
}

#[test]
fn test_unmatched_location_leaves_files_untouched() {
    let dir = setup_test_repo(CARGO);
    let repo = Git2Repository::open(dir.path()).unwrap();
    let mut config = load(&dir);
    config
        .locations
        .push(git_bump::domain::VersionLocation::new("Cargo.toml", "1.{version}"));

    let failure = BumpEngine::new(&repo, &config)
        .run(BumpRule::Patch, false)
        .unwrap_err();

    assert!(matches!(failure.error, BumpError::Rewrite(_)));
    assert_eq!(fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(), CARGO);
    assert_eq!(fs::read_to_string(dir.path().join("VERSION")).unwrap(), "1.4.9\n");
    assert!(repo.changed_paths().unwrap().is_empty());
}

mod binary {
    use super::*;

    fn git_bump(dir: &Path, args: &[&str]) -> std::process::Output {
        Command::new(env!("CARGO_BIN_EXE_git-bump"))
            .arg("-C")
            .arg(dir)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute git-bump")
    }

    #[test]
    fn test_help() {
        let output = Command::new(env!("CARGO_BIN_EXE_git-bump"))
            .arg("--help")
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("git-bump"));
        assert!(stdout.contains("patch, minor or major"));
    }

    #[test]
    fn test_invalid_rule_exit_code() {
        let dir = setup_test_repo(CARGO);
        let output = git_bump(dir.path(), &["prerelease"]);
        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Invalid bump rule"));
    }

    #[test]
    fn test_malformed_version_exit_code() {
        let dir = setup_test_repo("[package]\nversion = \"1.4\"\n");
        let output = git_bump(dir.path(), &["patch"]);
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(
            fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(),
            "[package]\nversion = \"1.4\"\n"
        );
    }

    #[test]
    fn test_dirty_tree_exit_code() {
        let dir = setup_test_repo(CARGO);
        fs::write(dir.path().join("README.md"), "edited\n").unwrap();
        let output = git_bump(dir.path(), &["patch"]);
        assert_eq!(output.status.code(), Some(4));
    }

    #[test]
    fn test_dry_run_succeeds_without_changes() {
        let dir = setup_test_repo(CARGO);
        let output = git_bump(dir.path(), &["minor", "--dry-run"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("1.4.9 → 1.5.0 (minor)"));
        assert!(stdout.contains("v1.5.0"));
        assert_eq!(fs::read_to_string(dir.path().join("Cargo.toml")).unwrap(), CARGO);
        assert_eq!(head_message(&dir), "Initial commit");
    }

    #[test]
    fn test_release_prints_push_instruction() {
        let dir = setup_test_repo(CARGO);
        let output = git_bump(dir.path(), &["major"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("git push origin HEAD v2.0.0"));
        assert_eq!(head_message(&dir), "chore(release): 2.0.0");
    }
}
