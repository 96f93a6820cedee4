//! Backend requests dispatched from the UI loop.
//!
//! Each request runs its blocking backend call on tokio's blocking pool and
//! delivers the result through a oneshot channel that the UI loop polls
//! with [`RequestHandle::try_recv`]. Clone requests also stream progress
//! updates through an unbounded channel.
//!
//! Every handle remembers the screen that issued it and carries that
//! screen's [`CancellationToken`]. When the screen is popped or replaced the
//! token is cancelled: a clone in progress aborts at its next progress
//! callback, and the app discards any result that still arrives.

use crate::backend::{Backend, CloneProgress, CloneRequest, Commit, HistoryStream, Repository, TreeEntry};
use anyhow::{anyhow, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Identifies a screen instance for the lifetime of the app
pub type ScreenId = u64;

/// A backend operation requested by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Repos,
    History(Repository),
    Tree(Repository, String),
    Commit(Repository, String),
    Clone(CloneRequest),
}

impl Request {
    /// Short description used for logs and the loading toast
    pub fn label(&self) -> String {
        match self {
            Request::Repos => "Loading repositories...".to_string(),
            Request::History(repo) => format!("Loading history of {}...", repo.name),
            Request::Tree(_, id) => format!("Loading tree {}...", crate::utils::short_hash(id)),
            Request::Commit(_, id) => format!("Loading commit {}...", crate::utils::short_hash(id)),
            Request::Clone(request) => format!("Cloning {}...", request.url()),
        }
    }
}

/// Result of a completed request
pub enum Response {
    Repos(Vec<Repository>),
    History {
        repo: Repository,
        stream: HistoryStream,
    },
    Tree {
        repo: Repository,
        tree_id: String,
        entries: Vec<TreeEntry>,
    },
    Commit {
        repo: Repository,
        commit: Commit,
    },
    Cloned(Repository),
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Repos(repos) => f.debug_tuple("Repos").field(repos).finish(),
            Response::History { repo, .. } => f
                .debug_struct("History")
                .field("repo", &repo.name)
                .finish_non_exhaustive(),
            Response::Tree { repo, tree_id, entries } => f
                .debug_struct("Tree")
                .field("repo", &repo.name)
                .field("tree_id", tree_id)
                .field("entries", &entries.len())
                .finish(),
            Response::Commit { repo, commit } => f
                .debug_struct("Commit")
                .field("repo", &repo.name)
                .field("hash", &commit.hash)
                .finish(),
            Response::Cloned(repo) => f.debug_tuple("Cloned").field(repo).finish(),
        }
    }
}

/// Handle for polling a request from the UI loop
pub struct RequestHandle {
    origin: ScreenId,
    label: String,
    token: CancellationToken,
    receiver: oneshot::Receiver<Result<Response>>,
    progress: Option<mpsc::UnboundedReceiver<CloneProgress>>,
}

impl RequestHandle {
    /// Screen that issued the request
    pub fn origin(&self) -> ScreenId {
        self.origin
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True once the issuing screen has left the stack
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Try to receive the result without blocking
    pub fn try_recv(&mut self) -> Option<Result<Response>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(Err(anyhow!("Request channel closed unexpectedly")))
            }
        }
    }

    /// Progress updates received since the last call
    pub fn drain_progress(&mut self) -> Vec<CloneProgress> {
        let mut updates = Vec::new();
        if let Some(rx) = self.progress.as_mut() {
            while let Ok(update) = rx.try_recv() {
                updates.push(update);
            }
        }
        updates
    }
}

/// Dispatches [`Request`]s to a [`Backend`]
pub struct RequestService;

impl RequestService {
    /// Start a request on `runtime`.
    ///
    /// `origin` and `token` belong to the screen issuing the request.
    pub fn start(
        runtime: &tokio::runtime::Runtime,
        backend: Arc<dyn Backend>,
        request: Request,
        origin: ScreenId,
        token: CancellationToken,
    ) -> RequestHandle {
        let (sender, receiver) = oneshot::channel();
        let label = request.label();
        info!("Request from screen {}: {}", origin, label);

        let (progress_tx, progress) = match request {
            Request::Clone(_) => {
                let (tx, rx) = mpsc::unbounded_channel();
                (Some(tx), Some(rx))
            }
            _ => (None, None),
        };

        let worker_token = token.clone();
        runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || {
                Self::execute(backend.as_ref(), request, &worker_token, progress_tx)
            })
            .await
            .map_err(|e| anyhow!("Backend task failed: {}", e))
            .and_then(|result| result);
            let _ = sender.send(result);
        });

        RequestHandle {
            origin,
            label,
            token,
            receiver,
            progress,
        }
    }

    fn execute(
        backend: &dyn Backend,
        request: Request,
        token: &CancellationToken,
        progress_tx: Option<mpsc::UnboundedSender<CloneProgress>>,
    ) -> Result<Response> {
        match request {
            Request::Repos => backend.get_repos().map(Response::Repos),
            Request::History(repo) => {
                let stream = backend.get_history_stream(&repo)?;
                Ok(Response::History { repo, stream })
            }
            Request::Tree(repo, tree_id) => {
                let entries = backend.get_tree(&repo, &tree_id)?;
                Ok(Response::Tree {
                    repo,
                    tree_id,
                    entries,
                })
            }
            Request::Commit(repo, commit_id) => {
                let commit = backend.get_commit(&repo, &commit_id)?;
                Ok(Response::Commit { repo, commit })
            }
            Request::Clone(clone) => {
                let mut report = |update: CloneProgress| {
                    if token.is_cancelled() {
                        debug!("Clone cancelled at '{}'", update.label);
                        return false;
                    }
                    if let Some(tx) = &progress_tx {
                        // The receiver only disappears together with the handle
                        let _ = tx.send(update);
                    }
                    true
                };
                backend.add_repo(&clone, &mut report).map(Response::Cloned)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use std::time::{Duration, Instant};

    fn wait(handle: &mut RequestHandle) -> Result<Response> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = handle.try_recv() {
                return result;
            }
            assert!(Instant::now() < deadline, "request did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn clone_request() -> CloneRequest {
        CloneRequest {
            hostname: "github.com".to_string(),
            pathname: "/creationix/conquest.git".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_repos_request() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let backend: Arc<dyn Backend> = Arc::new(
            MemoryBackend::new().with_repository(Repository::new("conquest", ""), Vec::new()),
        );
        let mut handle =
            RequestService::start(&runtime, backend, Request::Repos, 7, CancellationToken::new());

        assert_eq!(handle.origin(), 7);
        match wait(&mut handle).unwrap() {
            Response::Repos(repos) => assert_eq!(repos[0].name, "conquest"),
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn test_backend_error_is_delivered() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let request = Request::History(Repository::new("missing", ""));
        let mut handle =
            RequestService::start(&runtime, backend, request, 1, CancellationToken::new());

        let err = wait(&mut handle).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_clone_streams_progress() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new().with_add_support(true));
        let mut handle = RequestService::start(
            &runtime,
            backend,
            Request::Clone(clone_request()),
            1,
            CancellationToken::new(),
        );

        let response = wait(&mut handle).unwrap();
        assert!(matches!(response, Response::Cloned(ref r) if r.name == "conquest"));
        let updates = handle.drain_progress();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[2].value, updates[2].max);
    }

    #[test]
    fn test_cancelled_clone_aborts() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let backend = Arc::new(MemoryBackend::new().with_add_support(true));
        let token = CancellationToken::new();
        token.cancel();

        let mut handle = RequestService::start(
            &runtime,
            backend.clone(),
            Request::Clone(clone_request()),
            1,
            token,
        );

        assert!(handle.is_cancelled());
        assert!(wait(&mut handle).is_err());
        assert!(backend.get_repos().unwrap().is_empty());
    }

    #[test]
    fn test_labels() {
        let repo = Repository::new("conquest", "");
        assert_eq!(Request::Repos.label(), "Loading repositories...");
        assert_eq!(
            Request::Tree(repo, "0123456789abcdef".to_string()).label(),
            "Loading tree 0123456789..."
        );
        assert_eq!(
            Request::Clone(clone_request()).label(),
            "Cloning https://github.com/creationix/conquest.git..."
        );
    }
}
