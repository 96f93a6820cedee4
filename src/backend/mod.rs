//! Backend adapter for repository access.
//!
//! The UI layer never touches git directly. Everything it shows comes through
//! the [`Backend`] trait: listing repositories, cloning a new one, streaming
//! history, and resolving trees and commits by id.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          Screens (via RequestService)        │
//! └──────────────────────┬───────────────────────┘
//!                        │ Backend trait
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//! ┌──────────────────┐       ┌──────────────────┐
//! │   LocalBackend   │       │  MemoryBackend   │
//! │ (git2, on disk)  │       │   (fixtures)     │
//! └──────────────────┘       └──────────────────┘
//! ```
//!
//! All methods are blocking. Callers that must stay responsive run them on
//! the tokio blocking pool (see `services::request_service`).

pub mod local;
pub mod memory;

pub use local::LocalBackend;
pub use memory::MemoryBackend;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A repository known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Display name, always non-empty
    pub name: String,
    /// Short description (may be empty)
    #[serde(default)]
    pub description: String,
    /// Remote host the repository was cloned from (e.g. "github.com")
    #[serde(default)]
    pub hostname: String,
    /// Remote path on the host (e.g. "/creationix/conquest.git")
    #[serde(default)]
    pub pathname: String,
}

impl Repository {
    /// Create a repository with no remote information.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            hostname: String::new(),
            pathname: String::new(),
        }
    }

    /// Attach remote host and path.
    pub fn with_remote(mut self, hostname: impl Into<String>, pathname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self.pathname = pathname.into();
        self
    }

    /// Remote location for display ("github.com/creationix/conquest.git").
    pub fn remote_display(&self) -> String {
        format!("{}{}", self.hostname, self.pathname)
    }
}

/// A single commit as displayed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub tree: String,
    /// Empty for a root commit, more than one for a merge
    pub parents: Vec<String>,
    pub author: String,
    pub committer: String,
}

impl Commit {
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// What a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Blob,
    Tree,
    Submodule,
    Other,
}

impl EntryKind {
    /// Marker shown in front of the entry name
    pub fn marker(&self) -> &'static str {
        match self {
            EntryKind::Blob => " ",
            EntryKind::Tree => "/",
            EntryKind::Submodule => "@",
            EntryKind::Other => "?",
        }
    }
}

/// One entry of a single directory level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub hash: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn new(name: impl Into<String>, hash: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            kind,
        }
    }
}

/// Parameters for cloning a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRequest {
    pub hostname: String,
    pub pathname: String,
    #[serde(default)]
    pub description: String,
}

impl CloneRequest {
    /// HTTPS URL to clone from.
    pub fn url(&self) -> String {
        let host = self.hostname.trim().trim_end_matches('/');
        let path = self.pathname.trim();
        if path.starts_with('/') {
            format!("https://{}{}", host, path)
        } else {
            format!("https://{}/{}", host, path)
        }
    }

    /// Local repository name derived from the last path segment.
    ///
    /// `/creationix/conquest.git` becomes `conquest`.
    pub fn repo_name(&self) -> Option<String> {
        let segment = self
            .pathname
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()?;
        let name = segment.strip_suffix(".git").unwrap_or(segment);
        if name.is_empty() || name == "." || name == ".." {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Incremental progress reported while cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneProgress {
    pub label: String,
    pub value: usize,
    pub max: usize,
}

impl CloneProgress {
    pub fn new(label: impl Into<String>, value: usize, max: usize) -> Self {
        Self {
            label: label.into(),
            value,
            max,
        }
    }

    /// Completion ratio clamped to 0.0..=1.0 (0.0 while `max` is unknown).
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            (self.value as f64 / self.max as f64).clamp(0.0, 1.0)
        }
    }
}

/// Lazily pulled commit history, newest first. `None` means exhausted.
pub type HistoryStream = Box<dyn Iterator<Item = Result<Commit>> + Send>;

/// Repository access consumed by the UI.
pub trait Backend: Send + Sync {
    /// List every repository the backend knows about.
    fn get_repos(&self) -> Result<Vec<Repository>>;

    /// Whether [`Backend::add_repo`] is available.
    ///
    /// Toggles the "clone repository" affordance in the repository list.
    fn supports_add(&self) -> bool {
        false
    }

    /// Clone a new repository.
    ///
    /// `progress` is called with incremental updates; returning `false`
    /// from it aborts the clone.
    fn add_repo(
        &self,
        request: &CloneRequest,
        progress: &mut dyn FnMut(CloneProgress) -> bool,
    ) -> Result<Repository> {
        let _ = (request, progress);
        bail!("This backend cannot add repositories")
    }

    /// Open a fresh history stream starting at the repository's HEAD.
    fn get_history_stream(&self, repo: &Repository) -> Result<HistoryStream>;

    /// List one level of the tree with the given id.
    fn get_tree(&self, repo: &Repository, tree_id: &str) -> Result<Vec<TreeEntry>>;

    /// Resolve a commit by id.
    fn get_commit(&self, repo: &Repository, commit_id: &str) -> Result<Commit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hostname: &str, pathname: &str) -> CloneRequest {
        CloneRequest {
            hostname: hostname.to_string(),
            pathname: pathname.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_clone_url() {
        assert_eq!(
            request("github.com", "/creationix/conquest.git").url(),
            "https://github.com/creationix/conquest.git"
        );
        assert_eq!(
            request("github.com/", "creationix/conquest").url(),
            "https://github.com/creationix/conquest"
        );
    }

    #[test]
    fn test_clone_repo_name() {
        assert_eq!(
            request("github.com", "/creationix/conquest.git").repo_name(),
            Some("conquest".to_string())
        );
        assert_eq!(
            request("github.com", "/creationix/js-git/").repo_name(),
            Some("js-git".to_string())
        );
        assert_eq!(request("github.com", "/").repo_name(), None);
        assert_eq!(request("github.com", "/foo/.git").repo_name(), None);
    }

    #[test]
    fn test_progress_ratio() {
        assert!((CloneProgress::new("Receiving objects", 5, 10).ratio() - 0.5).abs() < f64::EPSILON);
        assert!(CloneProgress::new("Counting", 3, 0).ratio().abs() < f64::EPSILON);
        assert!((CloneProgress::new("Overshoot", 12, 10).ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_commit_shape() {
        let commit = Commit {
            hash: "abc".to_string(),
            message: "msg".to_string(),
            tree: "t".to_string(),
            parents: vec!["p1".to_string(), "p2".to_string()],
            author: "a".to_string(),
            committer: "a".to_string(),
        };
        assert!(commit.is_merge());
        assert!(!commit.is_root());
    }

    #[test]
    fn test_repository_serialization() {
        let repo = Repository::new("conquest", "A remake")
            .with_remote("github.com", "/creationix/conquest.git");
        let json = serde_json::to_string(&repo).unwrap();
        let back: Repository = serde_json::from_str(&json).unwrap();
        assert_eq!(repo, back);
        assert_eq!(back.remote_display(), "github.com/creationix/conquest.git");
    }
}
