// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. storage::StorageError)
    clippy::module_name_repetitions
)]

//! # Markpad
//!
//! A terminal markdown editor with live preview.
//!
//! Markpad keeps a single working document, renders it to sanitized HTML
//! as you type, and persists it automatically:
//! - One-keystroke formatting actions (bold, lists, tables, links, ...)
//! - Live HTML preview with syntax-highlighted code fences
//! - Autosave a few seconds after the last edit, plus explicit save
//! - Export to `document.md`, import from disk, attach images inline
//!
//! ## Architecture
//!
//! Markpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer, selection, and formatting actions
//! - [`render`]: Markdown to sanitized HTML
//! - [`storage`]: Document persistence
//! - [`autosave`]: Debounced save timer
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persisted flag defaults

pub mod app;
pub mod autosave;
pub mod config;
pub mod editor;
pub mod render;
pub mod storage;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{ActionKind, TextBuffer};
    pub use crate::render::render;
    pub use crate::storage::DocumentStore;
}
