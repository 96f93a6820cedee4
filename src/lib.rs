//! gitdeck - a stack-navigated terminal browser for git repositories
//!
//! This library provides the screens, the navigation stack and the backend
//! abstraction behind the `gitdeck` binary: a repository list, paged commit
//! history, commit details and tree listings, plus cloning over https.

// Core modules
pub mod app;
pub mod backend;
pub mod cli;
pub mod components;
pub mod config;
pub mod keymap;
pub mod navigation;
pub mod screens;
pub mod services;
pub mod styles;
pub mod tui;
pub mod utils;
pub mod widgets;

// Re-exports for convenience
pub use app::App;
pub use backend::{Backend, LocalBackend, MemoryBackend};
pub use config::Config;
pub use navigation::NavigationStack;
pub use utils::truncate;

// Keymap re-exports (used by Config and for external API)
pub use keymap::{Action, KeyBinding, Keymap, KeymapPreset};
