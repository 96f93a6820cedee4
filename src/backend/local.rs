use super::{
    Backend, CloneProgress, CloneRequest, Commit, EntryKind, HistoryStream, Repository, TreeEntry,
};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{build::RepoBuilder, ErrorCode, FetchOptions, ObjectType, Oid, RemoteCallbacks, Sort};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Text git writes into `description` for fresh repositories
const PLACEHOLDER_DESCRIPTION: &str = "Unnamed repository";

/// Backend over bare clones stored in a single directory.
///
/// Every direct child of `repos_dir` that opens as a git repository is listed.
/// The directory name is the repository name, the `origin` remote supplies
/// host and path, and git's own `description` file supplies the description.
pub struct LocalBackend {
    repos_dir: PathBuf,
}

impl LocalBackend {
    pub fn new(repos_dir: impl Into<PathBuf>) -> Self {
        Self {
            repos_dir: repos_dir.into(),
        }
    }

    pub fn repos_dir(&self) -> &Path {
        &self.repos_dir
    }

    fn open(&self, repo: &Repository) -> Result<git2::Repository> {
        let path = self.repos_dir.join(&repo.name);
        git2::Repository::open(&path)
            .with_context(|| format!("Failed to open repository '{}' at {:?}", repo.name, path))
    }

    /// Build the display record for an opened repository.
    fn describe(name: &str, repo: &git2::Repository) -> Repository {
        let description = std::fs::read_to_string(repo.path().join("description"))
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        let description = if description.starts_with(PLACEHOLDER_DESCRIPTION) {
            String::new()
        } else {
            description
        };

        let (hostname, pathname) = repo
            .find_remote("origin")
            .ok()
            .and_then(|remote| remote.url().map(split_remote_url))
            .unwrap_or_default();

        Repository {
            name: name.to_string(),
            description,
            hostname,
            pathname,
        }
    }
}

impl Backend for LocalBackend {
    fn get_repos(&self) -> Result<Vec<Repository>> {
        if !self.repos_dir.exists() {
            debug!("Repository directory {:?} does not exist yet", self.repos_dir);
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.repos_dir)
            .with_context(|| format!("Failed to read repository directory {:?}", self.repos_dir))?;

        let mut repos = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            match git2::Repository::open(&path) {
                Ok(repo) => repos.push(Self::describe(&name, &repo)),
                Err(e) => debug!("Skipping {:?}: {}", path, e.message()),
            }
        }

        repos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(repos)
    }

    fn supports_add(&self) -> bool {
        true
    }

    fn add_repo(
        &self,
        request: &CloneRequest,
        progress: &mut dyn FnMut(CloneProgress) -> bool,
    ) -> Result<Repository> {
        let name = request
            .repo_name()
            .with_context(|| format!("Path '{}' does not name a repository", request.pathname))?;
        let dest = self.repos_dir.join(&name);
        if dest.exists() {
            bail!("Repository '{}' already exists at {:?}", name, dest);
        }
        std::fs::create_dir_all(&self.repos_dir)
            .with_context(|| format!("Failed to create repository directory {:?}", self.repos_dir))?;

        let url = request.url();
        info!("Cloning {} into {:?}", url, dest);

        let aborted = Cell::new(false);
        let result = {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.transfer_progress(|stats| {
                let update = if stats.received_objects() < stats.total_objects() {
                    CloneProgress::new(
                        "Receiving objects",
                        stats.received_objects(),
                        stats.total_objects(),
                    )
                } else {
                    CloneProgress::new(
                        "Resolving deltas",
                        stats.indexed_deltas(),
                        stats.total_deltas(),
                    )
                };
                let keep_going = progress(update);
                if !keep_going {
                    aborted.set(true);
                }
                keep_going
            });

            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(callbacks);

            let mut builder = RepoBuilder::new();
            builder.bare(true);
            builder.fetch_options(fetch_options);
            builder.clone(&url, &dest)
        };

        let repo = match result {
            Ok(repo) => repo,
            Err(e) => {
                // Partial clones would show up as broken repositories
                if dest.exists() {
                    if let Err(cleanup) = std::fs::remove_dir_all(&dest) {
                        warn!("Failed to remove partial clone {:?}: {}", dest, cleanup);
                    }
                }
                if aborted.get() {
                    bail!("Clone of {} was cancelled", url);
                }
                return Err(e).with_context(|| format!("Failed to clone repository from {}", url));
            }
        };

        let description = request.description.trim();
        if !description.is_empty() {
            std::fs::write(repo.path().join("description"), format!("{}\n", description))
                .context("Failed to write repository description")?;
        }

        progress(CloneProgress::new("Done", 1, 1));
        info!("Cloned {} as '{}'", url, name);
        Ok(Self::describe(&name, &repo))
    }

    fn get_history_stream(&self, repo: &Repository) -> Result<HistoryStream> {
        let git_repo = self.open(repo)?;
        Ok(Box::new(HistoryWalk::from_head(git_repo)?))
    }

    fn get_tree(&self, repo: &Repository, tree_id: &str) -> Result<Vec<TreeEntry>> {
        let git_repo = self.open(repo)?;
        let oid = Oid::from_str(tree_id).with_context(|| format!("Invalid tree id '{}'", tree_id))?;
        let tree = git_repo
            .find_tree(oid)
            .with_context(|| format!("Tree {} not found in '{}'", tree_id, repo.name))?;

        Ok(tree
            .iter()
            .map(|entry| {
                let kind = match entry.kind() {
                    Some(ObjectType::Blob) => EntryKind::Blob,
                    Some(ObjectType::Tree) => EntryKind::Tree,
                    Some(ObjectType::Commit) => EntryKind::Submodule,
                    _ => EntryKind::Other,
                };
                TreeEntry {
                    name: String::from_utf8_lossy(entry.name_bytes()).into_owned(),
                    hash: entry.id().to_string(),
                    kind,
                }
            })
            .collect())
    }

    fn get_commit(&self, repo: &Repository, commit_id: &str) -> Result<Commit> {
        let git_repo = self.open(repo)?;
        let oid =
            Oid::from_str(commit_id).with_context(|| format!("Invalid commit id '{}'", commit_id))?;
        let commit = git_repo
            .find_commit(oid)
            .with_context(|| format!("Commit {} not found in '{}'", commit_id, repo.name))?;
        Ok(to_commit(&commit))
    }
}

/// Newest-first history from HEAD.
///
/// The ids are walked up front; each commit is loaded only when pulled.
struct HistoryWalk {
    repo: git2::Repository,
    ids: std::vec::IntoIter<Oid>,
}

impl HistoryWalk {
    fn from_head(repo: git2::Repository) -> Result<Self> {
        let ids = Self::walk_ids(&repo)?;
        Ok(Self {
            repo,
            ids: ids.into_iter(),
        })
    }

    fn walk_ids(repo: &git2::Repository) -> Result<Vec<Oid>> {
        match repo.head() {
            Ok(_) => {}
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context("Failed to resolve HEAD"),
        }

        let mut revwalk = repo.revwalk().context("Failed to create revwalk")?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .context("Failed to set sorting")?;
        revwalk.push_head().context("Failed to push HEAD")?;

        revwalk
            .map(|oid| oid.context("Failed to walk history"))
            .collect()
    }
}

impl Iterator for HistoryWalk {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.ids.next()?;
        Some(
            self.repo
                .find_commit(oid)
                .map(|commit| to_commit(&commit))
                .with_context(|| format!("Failed to load commit {}", oid)),
        )
    }
}

fn to_commit(commit: &git2::Commit) -> Commit {
    Commit {
        hash: commit.id().to_string(),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        tree: commit.tree_id().to_string(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        author: format_signature(&commit.author()),
        committer: format_signature(&commit.committer()),
    }
}

/// "Name <email> 2024-01-31 09:15:00 +0100"
fn format_signature(signature: &git2::Signature) -> String {
    let name = String::from_utf8_lossy(signature.name_bytes());
    let email = String::from_utf8_lossy(signature.email_bytes());
    let when = signature.when();

    let timestamp = FixedOffset::east_opt(when.offset_minutes() * 60)
        .zip(DateTime::from_timestamp(when.seconds(), 0))
        .map(|(offset, utc)| utc.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S %z").to_string());

    match timestamp {
        Some(ts) => format!("{} <{}> {}", name, email, ts),
        None => format!("{} <{}>", name, email),
    }
}

/// Split a remote URL into (hostname, pathname).
///
/// Handles `scheme://[user@]host/path` and scp-like `user@host:path`.
/// Anything else (local paths) is returned as a path with no host.
fn split_remote_url(url: &str) -> (String, String) {
    if let Some((_, rest)) = url.split_once("://") {
        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
        return (host.to_string(), path.to_string());
    }

    if let Some((authority, path)) = url.split_once(':') {
        if !authority.contains('/') && !authority.is_empty() {
            let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
            let path = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            };
            return (host.to_string(), path);
        }
    }

    (String::new(), url.to_string())
}
