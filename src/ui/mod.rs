//! Terminal UI components.
//!
//! This module contains all UI-related code:
//! - [`render`]: the full-frame renderer (editor pane, preview pane)
//! - [`status`]: status, toast, and prompt bars
//! - [`overlays`]: the format picker popup

mod overlays;
mod render;
mod status;

pub use render::render;

pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;
