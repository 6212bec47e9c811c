#![allow(dead_code)]

use ark::areas::repository::Repository;
use ark::artifacts::objects::commit::Author;
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::lorem::en::{Word, Words};
use fake::faker::name::en::Name;
use std::path::PathBuf;

/// Initialize a repository in a fresh temp directory.
///
/// The temp dir must be kept alive for the duration of the test.
pub fn init_repository() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("failed to create temp directory");
    let repository = Repository::init(dir.path()).expect("failed to initialize repository");

    (dir, repository)
}

pub fn random_author() -> Author {
    Author::new(Name().fake::<String>(), FreeEmail().fake::<String>())
}

/// Create a randomly named file with random content in the working tree.
pub fn create_random_file(dir: &TempDir) -> (PathBuf, String) {
    let file_name = format!("{}-{}.txt", Word().fake::<String>(), fake::rand::random::<u16>());
    let content = Words(5..10).fake::<Vec<String>>().join(" ");

    dir.child(&file_name)
        .write_str(&content)
        .expect("failed to write file");

    (PathBuf::from(file_name), content)
}

/// Create a file with the given name and content in the working tree.
///
/// Intermediate directories are created as needed.
pub fn create_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let child = dir.child(name);
    if let Some(parent) = child.path().parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directories");
    }
    child.write_str(content).expect("failed to write file");

    PathBuf::from(name)
}
