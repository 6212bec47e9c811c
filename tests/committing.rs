use ark::Error;
use ark::artifacts::index::index_entry::IndexEntry;
use ark::artifacts::objects::blob::Blob;
use ark::artifacts::objects::object::Object;
use ark::artifacts::objects::tree::{EntryKind, Tree};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

mod common;

#[test]
fn first_commit_records_the_snapshot_and_advances_the_branch()
-> Result<(), Box<dyn std::error::Error>> {
    let (dir, mut repository) = common::init_repository();

    common::create_file(&dir, "a.txt", "hello");
    repository.stage(&[PathBuf::from("a.txt")])?;

    let commit_oid = repository.commit("first", common::random_author())?;

    // the staged content is stored under its content-derived id
    let blob_oid = Blob::new(Bytes::from("hello")).object_id()?;
    assert!(repository.database().contains(&blob_oid));

    // the commit links the tree and has no parent on a fresh branch
    let commit = repository
        .database()
        .parse_object_as_commit(&commit_oid)?
        .expect("stored object is not a commit");
    assert!(commit.parents().is_empty());
    assert_eq!(commit.message(), "first");

    let tree = repository
        .database()
        .parse_object_as_tree(commit.tree_oid())?
        .expect("stored object is not a tree");
    assert_eq!(tree.len(), 1);
    let entry = tree.entry_by_path("a.txt").expect("a.txt missing from tree");
    assert_eq!(entry.oid, blob_oid);
    assert_eq!(entry.kind, EntryKind::Blob);

    // the branch ref now names the commit
    let ref_content = std::fs::read_to_string(repository.refs().heads_path().join("master"))?;
    assert_eq!(ref_content.trim(), commit_oid.as_ref());

    let branch = repository.refs().current_branch()?;
    assert_eq!(repository.refs().head_of(&branch)?, commit_oid);

    // the staging index no longer exists
    assert!(!repository.index().path().exists());

    Ok(())
}

#[test]
fn committing_with_nothing_staged_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, mut repository) = common::init_repository();

    let result = repository.commit("nothing to see", common::random_author());
    assert!(matches!(result, Err(Error::EmptyCommit)));

    // neither the branch ref nor HEAD was touched
    let branch = repository.refs().current_branch()?;
    assert!(matches!(
        repository.refs().head_of(&branch),
        Err(Error::UnbornBranch(_))
    ));
    let head = std::fs::read_to_string(repository.refs().head_path())?;
    assert_eq!(head, "ref: refs/heads/master");

    Ok(())
}

#[test]
fn committing_twice_chains_the_second_commit_to_the_first()
-> Result<(), Box<dyn std::error::Error>> {
    let (dir, mut repository) = common::init_repository();

    let first_path = common::create_file(&dir, "first.txt", "first content");
    repository.stage(&[first_path])?;
    let first_oid = repository.commit("first", common::random_author())?;

    let second_path = common::create_file(&dir, "second.txt", "second content");
    repository.stage(&[second_path])?;
    let second_oid = repository.commit("second", common::random_author())?;

    let second = repository
        .database()
        .parse_object_as_commit(&second_oid)?
        .expect("stored object is not a commit");
    assert_eq!(second.parents(), &[first_oid]);

    let branch = repository.refs().current_branch()?;
    assert_eq!(repository.refs().head_of(&branch)?, second_oid);

    Ok(())
}

#[test]
fn a_committed_file_round_trips_its_content() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, mut repository) = common::init_repository();
    let (path, content) = common::create_random_file(&dir);

    repository.stage(&[path.clone()])?;
    let commit_oid = repository.commit("snapshot", common::random_author())?;

    let commit = repository
        .database()
        .parse_object_as_commit(&commit_oid)?
        .expect("stored object is not a commit");
    let tree = repository
        .database()
        .parse_object_as_tree(commit.tree_oid())?
        .expect("stored object is not a tree");
    let entry = tree
        .entry_by_path(&path.display().to_string())
        .expect("staged path missing from tree");

    let blob = repository
        .database()
        .parse_object_as_blob(&entry.oid)?
        .expect("tree entry does not reference a blob");
    assert_eq!(blob.content(), &Bytes::from(content.into_bytes()));

    Ok(())
}

#[test]
fn the_index_is_cleared_only_by_a_successful_commit() -> Result<(), Box<dyn std::error::Error>> {
    let (dir, mut repository) = common::init_repository();
    let (path, _) = common::create_random_file(&dir);

    repository.stage(&[path])?;
    assert!(repository.index().path().exists());

    repository.commit("snapshot", common::random_author())?;
    assert!(!repository.index().path().exists());

    // with the index gone, the next commit has nothing to record
    let result = repository.commit("again", common::random_author());
    assert!(matches!(result, Err(Error::EmptyCommit)));

    Ok(())
}

#[rstest]
#[case::sorted_order(vec!["a.txt", "b.txt", "c.txt"])]
#[case::reverse_order(vec!["c.txt", "b.txt", "a.txt"])]
#[case::interleaved_order(vec!["b.txt", "c.txt", "a.txt"])]
fn staging_order_does_not_change_the_tree_id(
    #[case] order: Vec<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (dir, mut repository) = common::init_repository();

    // one stage call per path, in the case's order
    for name in &order {
        common::create_file(&dir, name, &format!("content of {name}"));
        repository.stage(&[PathBuf::from(name)])?;
    }

    let commit_oid = repository.commit("snapshot", common::random_author())?;
    let commit = repository
        .database()
        .parse_object_as_commit(&commit_oid)?
        .expect("stored object is not a commit");

    // the tree id is a pure function of the staged content
    let mut expected_entries = Vec::new();
    for name in ["a.txt", "b.txt", "c.txt"] {
        let content = Bytes::from(format!("content of {name}").into_bytes());
        expected_entries.push(IndexEntry::new(
            PathBuf::from(name),
            Blob::new(content).object_id()?,
        ));
    }
    let expected_tree_oid = Tree::build(expected_entries.iter())?.object_id()?;

    assert_eq!(commit.tree_oid(), &expected_tree_oid);

    Ok(())
}
