//! Services that run backend work off the UI thread.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │  UI loop (App, Screens)       │
//! └──────────────┬────────────────┘
//!                │ Request / try_recv()
//!                ▼
//! ┌───────────────────────────────┐
//! │  RequestService               │
//! │  tokio spawn + spawn_blocking │
//! └──────────────┬────────────────┘
//!                ▼
//! ┌───────────────────────────────┐
//! │  Backend (git2 / memory)      │
//! └───────────────────────────────┘
//! ```

pub mod request_service;

pub use request_service::{Request, RequestHandle, RequestService, Response, ScreenId};
