use ark::Error;
use ark::areas::repository::Repository;
use ark::artifacts::branch::branch_name::BranchName;
use assert_fs::TempDir;
use assert_fs::prelude::PathCreateDir;
use assert_fs::fixture::PathChild;
use pretty_assertions::assert_eq;

mod common;

#[test]
fn init_creates_marker_layout_and_symbolic_head() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository();

    assert!(repository.database().objects_path().is_dir());
    assert!(repository.refs().heads_path().is_dir());

    let head = std::fs::read_to_string(repository.refs().head_path())?;
    assert_eq!(head, "ref: refs/heads/master");

    assert_eq!(
        repository.refs().current_branch()?,
        BranchName::try_parse("master".to_string())?
    );

    Ok(())
}

#[test]
fn init_on_an_initialized_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, repository) = common::init_repository();

    let result = Repository::init(dir.path());
    assert!(matches!(result, Err(Error::AlreadyInitialized(_))));

    // the existing repository state is untouched
    let head = std::fs::read_to_string(repository.refs().head_path())?;
    assert_eq!(head, "ref: refs/heads/master");

    Ok(())
}

#[test]
fn a_freshly_initialized_branch_is_unborn() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository();

    let branch = repository.refs().current_branch()?;
    let result = repository.refs().head_of(&branch);

    assert!(matches!(result, Err(Error::UnbornBranch(_))));
    Ok(())
}

#[test]
fn locate_finds_the_root_from_a_nested_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, repository) = common::init_repository();

    let nested = dir.child("src/deeply/nested");
    nested.create_dir_all()?;

    let located = Repository::locate(nested.path())?;
    assert_eq!(located.root(), repository.root());

    Ok(())
}

#[test]
fn locate_outside_any_repository_fails() {
    let dir = TempDir::new().expect("failed to create temp directory");

    let result = Repository::locate(dir.path());
    assert!(matches!(result, Err(Error::NotARepository(_))));
}
