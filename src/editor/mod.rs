//! Editing core: the document buffer and the formatting transforms.
//!
//! A rope-backed text buffer with a char-offset selection, designed for
//! integration into the TEA architecture, plus the toolbar-style markdown
//! transforms that operate on it.

mod buffer;
pub mod transform;

pub use buffer::{BufferError, CursorPosition, Direction, Selection, TextBuffer};
pub use transform::{apply_action, ActionKind, Snippet};
