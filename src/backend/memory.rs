use super::{Backend, CloneProgress, CloneRequest, Commit, HistoryStream, Repository, TreeEntry};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// In-memory backend built from fixtures.
///
/// Histories are stored newest first, exactly in the order the stream
/// yields them. Cloning (when enabled) fabricates an empty repository from
/// the request after reporting a couple of progress steps.
///
/// # Example
/// ```
/// use gitdeck::backend::{Backend, MemoryBackend, Repository};
///
/// let backend = MemoryBackend::new()
///     .with_repository(Repository::new("conquest", "A remake"), Vec::new());
/// assert_eq!(backend.get_repos().unwrap().len(), 1);
/// assert!(!backend.supports_add());
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    repos: Mutex<Vec<Repository>>,
    histories: HashMap<String, Vec<Commit>>,
    trees: HashMap<(String, String), Vec<TreeEntry>>,
    add_support: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository and its history (newest first).
    pub fn with_repository(mut self, repo: Repository, history: Vec<Commit>) -> Self {
        self.histories.insert(repo.name.clone(), history);
        self.repos
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push(repo);
        self
    }

    /// Register a tree listing for a repository.
    pub fn with_tree(
        mut self,
        repo_name: impl Into<String>,
        tree_id: impl Into<String>,
        entries: Vec<TreeEntry>,
    ) -> Self {
        self.trees.insert((repo_name.into(), tree_id.into()), entries);
        self
    }

    /// Toggle the add (clone) capability.
    pub fn with_add_support(mut self, enabled: bool) -> Self {
        self.add_support = enabled;
        self
    }

    fn history(&self, repo: &Repository) -> Result<&Vec<Commit>> {
        self.histories
            .get(&repo.name)
            .ok_or_else(|| anyhow!("Unknown repository '{}'", repo.name))
    }
}

impl Backend for MemoryBackend {
    fn get_repos(&self) -> Result<Vec<Repository>> {
        let repos = self
            .repos
            .lock()
            .map_err(|_| anyhow!("Repository list lock poisoned"))?;
        Ok(repos.clone())
    }

    fn supports_add(&self) -> bool {
        self.add_support
    }

    fn add_repo(
        &self,
        request: &CloneRequest,
        progress: &mut dyn FnMut(CloneProgress) -> bool,
    ) -> Result<Repository> {
        if !self.add_support {
            bail!("This backend cannot add repositories");
        }
        let name = request
            .repo_name()
            .with_context(|| format!("Path '{}' does not name a repository", request.pathname))?;

        for step in 0..=2 {
            if !progress(CloneProgress::new("Receiving objects", step, 2)) {
                bail!("Clone of {} was cancelled", request.url());
            }
        }

        let repo = Repository::new(name, request.description.trim())
            .with_remote(request.hostname.trim(), request.pathname.trim());
        let mut repos = self
            .repos
            .lock()
            .map_err(|_| anyhow!("Repository list lock poisoned"))?;
        if repos.iter().any(|r| r.name == repo.name) {
            bail!("Repository '{}' already exists", repo.name);
        }
        repos.push(repo.clone());
        Ok(repo)
    }

    fn get_history_stream(&self, repo: &Repository) -> Result<HistoryStream> {
        let history = self.history(repo)?.clone();
        Ok(Box::new(history.into_iter().map(Ok)))
    }

    fn get_tree(&self, repo: &Repository, tree_id: &str) -> Result<Vec<TreeEntry>> {
        self.trees
            .get(&(repo.name.clone(), tree_id.to_string()))
            .cloned()
            .ok_or_else(|| anyhow!("Tree {} not found in '{}'", tree_id, repo.name))
    }

    fn get_commit(&self, repo: &Repository, commit_id: &str) -> Result<Commit> {
        self.history(repo)?
            .iter()
            .find(|c| c.hash == commit_id)
            .cloned()
            .ok_or_else(|| anyhow!("Commit {} not found in '{}'", commit_id, repo.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::EntryKind;

    fn commit(hash: &str, parents: &[&str]) -> Commit {
        Commit {
            hash: hash.to_string(),
            message: format!("Commit {}", hash),
            tree: format!("tree-{}", hash),
            parents: parents.iter().map(|p| (*p).to_string()).collect(),
            author: "a".to_string(),
            committer: "a".to_string(),
        }
    }

    #[test]
    fn test_history_and_commit_lookup() {
        let repo = Repository::new("demo", "");
        let backend = MemoryBackend::new()
            .with_repository(repo.clone(), vec![commit("c2", &["c1"]), commit("c1", &[])]);

        let hashes: Vec<String> = backend
            .get_history_stream(&repo)
            .unwrap()
            .map(|c| c.unwrap().hash)
            .collect();
        assert_eq!(hashes, vec!["c2", "c1"]);

        assert_eq!(backend.get_commit(&repo, "c1").unwrap().hash, "c1");
        assert!(backend.get_commit(&repo, "nope").is_err());
        assert!(backend
            .get_history_stream(&Repository::new("other", ""))
            .is_err());
    }

    #[test]
    fn test_tree_lookup() {
        let repo = Repository::new("demo", "");
        let backend = MemoryBackend::new()
            .with_repository(repo.clone(), Vec::new())
            .with_tree("demo", "t1", vec![TreeEntry::new("src", "h1", EntryKind::Tree)]);

        assert_eq!(backend.get_tree(&repo, "t1").unwrap().len(), 1);
        assert!(backend.get_tree(&repo, "t2").is_err());
    }

    #[test]
    fn test_add_repo_requires_support() {
        let backend = MemoryBackend::new();
        let request = CloneRequest {
            hostname: "github.com".to_string(),
            pathname: "/creationix/conquest.git".to_string(),
            description: String::new(),
        };
        assert!(backend.add_repo(&request, &mut |_| true).is_err());
    }

    #[test]
    fn test_add_repo_reports_progress_and_registers() {
        let backend = MemoryBackend::new().with_add_support(true);
        let request = CloneRequest {
            hostname: "github.com".to_string(),
            pathname: "/creationix/conquest.git".to_string(),
            description: "Lords of Conquest".to_string(),
        };

        let mut updates = Vec::new();
        let repo = backend
            .add_repo(&request, &mut |p| {
                updates.push(p);
                true
            })
            .unwrap();

        assert_eq!(repo.name, "conquest");
        assert_eq!(updates.last().unwrap().value, 2);
        assert_eq!(backend.get_repos().unwrap(), vec![repo]);
        assert!(backend.add_repo(&request, &mut |_| true).is_err());
    }

    #[test]
    fn test_add_repo_can_be_aborted() {
        let backend = MemoryBackend::new().with_add_support(true);
        let request = CloneRequest {
            hostname: "github.com".to_string(),
            pathname: "/creationix/conquest.git".to_string(),
            description: String::new(),
        };
        let err = backend.add_repo(&request, &mut |_| false).unwrap_err();
        assert!(err.to_string().contains("cancelled"));
        assert!(backend.get_repos().unwrap().is_empty());
    }
}
