mod common;

use common::{commit, linear_history, TestRepos};
use gitdeck::backend::{Backend, CloneProgress, CloneRequest, EntryKind, Repository};

#[test]
fn test_lists_sorted_with_remote_info() {
    let repos = TestRepos::new();
    repos.init("zeta", None, "");
    repos.init(
        "conquest",
        Some("https://github.com/creationix/conquest.git"),
        "Lords of Conquest remake",
    );
    std::fs::write(repos.path().join("notes.txt"), "not a repository").unwrap();

    let listed = repos.backend().get_repos().unwrap();
    let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["conquest", "zeta"]);
    assert_eq!(listed[0].remote_display(), "github.com/creationix/conquest.git");
    assert_eq!(listed[0].description, "Lords of Conquest remake");
    assert!(listed[1].hostname.is_empty());
}

#[test]
fn test_history_is_newest_first_and_lazy() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    let [a, b, c] = linear_history(&repo);
    let backend = repos.backend();
    let demo = Repository::new("demo", "");

    let mut stream = backend.get_history_stream(&demo).unwrap();
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first.hash, c.to_string());
    assert_eq!(first.message, "Document the demo");
    assert_eq!(first.parents, vec![b.to_string()]);
    assert!(first.author.starts_with("Tim Caswell <tim@creationix.com> 1970-01-01"));

    let rest: Vec<String> = stream.map(|c| c.unwrap().hash).collect();
    assert_eq!(rest, vec![b.to_string(), a.to_string()]);

    // A fresh stream starts over
    let again = backend.get_history_stream(&demo).unwrap().count();
    assert_eq!(again, 3);
}

#[test]
fn test_merge_history_visits_each_commit_once() {
    let repos = TestRepos::new();
    let repo = repos.init("merge", None, "");
    let base = commit(&repo, &[("a", "1")], "base", 100, &[]);
    let left = commit(&repo, &[("a", "2")], "left", 200, &[base]);
    let right = commit(&repo, &[("a", "3")], "right", 300, &[base]);
    let merge = commit(&repo, &[("a", "4")], "merge", 400, &[left, right]);

    let history: Vec<String> = repos
        .backend()
        .get_history_stream(&Repository::new("merge", ""))
        .unwrap()
        .map(|c| c.unwrap().message)
        .collect();
    assert_eq!(history, vec!["merge", "right", "left", "base"]);

    let merge_commit = repos
        .backend()
        .get_commit(&Repository::new("merge", ""), &merge.to_string())
        .unwrap();
    assert!(merge_commit.is_merge());
}

#[test]
fn test_empty_repository_has_no_history() {
    let repos = TestRepos::new();
    repos.init("empty", None, "");
    let mut stream = repos
        .backend()
        .get_history_stream(&Repository::new("empty", ""))
        .unwrap();
    assert!(stream.next().is_none());
}

#[test]
fn test_tree_lists_one_level() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    let [_, _, c] = linear_history(&repo);
    let backend = repos.backend();
    let demo = Repository::new("demo", "");

    let head = backend.get_commit(&demo, &c.to_string()).unwrap();
    let entries = backend.get_tree(&demo, &head.tree).unwrap();
    let listing: Vec<(&str, EntryKind)> = entries.iter().map(|e| (e.name.as_str(), e.kind)).collect();
    assert_eq!(listing, vec![("README.md", EntryKind::Blob), ("src", EntryKind::Tree)]);

    let src = backend.get_tree(&demo, &entries[1].hash).unwrap();
    assert_eq!(src.len(), 1);
    assert_eq!(src[0].name, "main.rs");
}

#[test]
fn test_unknown_ids_are_errors() {
    let repos = TestRepos::new();
    let repo = repos.init("demo", None, "");
    linear_history(&repo);
    let backend = repos.backend();
    let demo = Repository::new("demo", "");

    assert!(backend.get_commit(&demo, "not-a-hash").is_err());
    assert!(backend
        .get_tree(&demo, "0000000000000000000000000000000000000000")
        .is_err());
    assert!(backend
        .get_history_stream(&Repository::new("missing", ""))
        .is_err());
}

#[test]
fn test_clone_refuses_existing_directory() {
    let repos = TestRepos::new();
    repos.init("conquest", None, "");
    let backend = repos.backend();
    assert!(backend.supports_add());

    let request = CloneRequest {
        hostname: "github.com".to_string(),
        pathname: "/creationix/conquest.git".to_string(),
        description: String::new(),
    };
    let mut updates = Vec::new();
    let mut progress = |update: CloneProgress| {
        updates.push(update);
        true
    };
    let err = backend.add_repo(&request, &mut progress).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert!(updates.is_empty());
}
