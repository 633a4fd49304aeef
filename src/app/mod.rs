//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{is_markdown_path, Model, Prompt, PromptKind, ToastLevel, ViewMode};
pub use update::{update, Message};

use std::path::PathBuf;

use crate::autosave;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    startup_file: Option<PathBuf>,
    storage_root: Option<PathBuf>,
    autosave_delay_ms: Option<u64>,
    view_mode: Option<ViewMode>,
}

impl App {
    /// Create a new application with default settings.
    pub const fn new() -> Self {
        Self {
            startup_file: None,
            storage_root: None,
            autosave_delay_ms: Some(autosave::DEFAULT_DELAY_MS),
            view_mode: None,
        }
    }

    /// Open this file at startup instead of the saved session.
    #[must_use]
    pub fn with_startup_file(mut self, file: Option<PathBuf>) -> Self {
        self.startup_file = file;
        self
    }

    /// Override the storage directory.
    #[must_use]
    pub fn with_storage_root(mut self, root: Option<PathBuf>) -> Self {
        self.storage_root = root;
        self
    }

    /// Set the autosave delay; `None` disables implicit saves.
    #[must_use]
    pub const fn with_autosave_delay_ms(mut self, delay: Option<u64>) -> Self {
        self.autosave_delay_ms = delay;
        self
    }

    /// Set the initial view mode.
    #[must_use]
    pub const fn with_view_mode(mut self, mode: Option<ViewMode>) -> Self {
        self.view_mode = mode;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
