//! Shared test utilities for integration tests.
//!
//! Provides `TestRepos` - a temporary repository directory laid out the way
//! `LocalBackend` expects it (one bare repository per child directory), with
//! helpers to write commits at fixed timestamps.

#![allow(dead_code)]

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use git2::{Oid, Repository, Signature, Time};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use gitdeck::app::App;
use gitdeck::backend::LocalBackend;
use gitdeck::config::Config;

pub const SETTLE: Duration = Duration::from_secs(10);

/// Temporary `repos_dir`, removed when dropped.
pub struct TestRepos {
    temp_dir: TempDir,
}

impl TestRepos {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn backend(&self) -> LocalBackend {
        LocalBackend::new(self.repos_dir())
    }

    /// Create a bare repository with an origin remote and a description.
    pub fn init(&self, name: &str, remote: Option<&str>, description: &str) -> Repository {
        let repo = Repository::init_bare(self.path().join(name)).expect("failed to init repo");
        if let Some(url) = remote {
            repo.remote("origin", url).expect("failed to add remote");
        }
        if !description.is_empty() {
            std::fs::write(repo.path().join("description"), format!("{}\n", description))
                .expect("failed to write description");
        }
        repo
    }

    /// App over this directory with every pending request applied.
    pub fn app(&self) -> App {
        let config = Config {
            repos_dir: self.repos_dir(),
            ..Config::default()
        };
        let backend = Arc::new(self.backend());
        let mut app = App::new(config, self.path().join("config.toml"), backend)
            .expect("failed to create app");
        app.settle(SETTLE).expect("initial listing failed");
        app
    }
}

/// Build a tree from `path -> content`; one directory level is supported
/// (`src/main.rs`).
pub fn write_tree(repo: &Repository, files: &[(&str, &str)]) -> Oid {
    let mut root = repo.treebuilder(None).unwrap();
    let mut dirs: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();

    for &(path, content) in files {
        match path.split_once('/') {
            Some((dir, file)) => dirs.entry(dir).or_default().push((file, content)),
            None => {
                let blob = repo.blob(content.as_bytes()).unwrap();
                root.insert(path, blob, 0o100_644).unwrap();
            }
        }
    }
    for (dir, entries) in dirs {
        let mut sub = repo.treebuilder(None).unwrap();
        for (file, content) in entries {
            let blob = repo.blob(content.as_bytes()).unwrap();
            sub.insert(file, blob, 0o100_644).unwrap();
        }
        let sub_id = sub.write().unwrap();
        root.insert(dir, sub_id, 0o040_000).unwrap();
    }
    root.write().unwrap()
}

/// Commit `files` on top of `parents`, moving HEAD to the new commit.
pub fn commit(
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    time: i64,
    parents: &[Oid],
) -> Oid {
    let tree = repo.find_tree(write_tree(repo, files)).unwrap();
    let sig = Signature::new("Tim Caswell", "tim@creationix.com", &Time::new(time, 0)).unwrap();
    let parents: Vec<git2::Commit> = parents.iter().map(|id| repo.find_commit(*id).unwrap()).collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    let id = repo
        .commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap();
    repo.reference("refs/heads/master", id, true, "test commit").unwrap();
    repo.set_head("refs/heads/master").unwrap();
    id
}

/// A linear history A <- B <- C, returned oldest first.
pub fn linear_history(repo: &Repository) -> [Oid; 3] {
    let a = commit(repo, &[("README.md", "# demo\n")], "Initial commit", 1_000, &[]);
    let b = commit(
        repo,
        &[("README.md", "# demo\n"), ("src/main.rs", "fn main() {}\n")],
        "Add main",
        2_000,
        &[a],
    );
    let c = commit(
        repo,
        &[("README.md", "# demo\nNow with docs.\n"), ("src/main.rs", "fn main() {}\n")],
        "Document the demo",
        3_000,
        &[b],
    );
    [a, b, c]
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn press(app: &mut App, code: KeyCode) {
    app.handle_event(key(code)).expect("event handling failed");
}

pub fn short(id: Oid) -> String {
    id.to_string()[..10].to_string()
}
