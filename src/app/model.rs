use std::path::Path;
use std::time::{Duration, Instant};

use crate::editor::TextBuffer;
use crate::render;

/// Severity of a transient status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which panes are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    Edit,
    #[default]
    Split,
    Preview,
}

impl ViewMode {
    /// Next mode in the F2 cycle.
    pub const fn cycled(self) -> Self {
        match self {
            Self::Edit => Self::Split,
            Self::Split => Self::Preview,
            Self::Preview => Self::Edit,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "EDIT",
            Self::Split => "SPLIT",
            Self::Preview => "PREVIEW",
        }
    }
}

/// What an open prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path of a markdown file to import.
    ImportPath,
    /// Path of an image file to attach as a data URL.
    AttachImagePath,
    /// New word-count goal.
    WordCountGoal,
}

impl PromptKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ImportPath => "Import file",
            Self::AttachImagePath => "Attach image",
            Self::WordCountGoal => "Word goal",
        }
    }
}

/// A one-line input prompt shown in place of the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Default word-count goal for a fresh session.
pub const DEFAULT_WORD_COUNT_GOAL: u32 = 500;

/// The complete application state.
///
/// All state lives here - no global or scattered state. `preview_html` is
/// derived: it is recomputed from the buffer on every document change, so
/// `preview_html == render(document)` holds whenever a message has finished
/// processing.
pub struct Model {
    /// The document being edited.
    pub buffer: TextBuffer,
    /// Rendered HTML of the current document.
    pub preview_html: String,
    /// Which panes are shown.
    pub view_mode: ViewMode,
    /// Word-count goal for the progress readout (session-only).
    pub word_count_goal: u32,
    /// Open input prompt, if any.
    pub prompt: Option<Prompt>,
    /// Whether the format picker overlay is open.
    pub format_picker_open: bool,
    toast: Option<Toast>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// First visible buffer line in the editor pane.
    pub editor_scroll: usize,
    /// First visible HTML line in the preview pane.
    pub preview_scroll: usize,
    /// Terminal size (cols, rows).
    pub terminal_size: (u16, u16),
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("buffer", &self.buffer)
            .field("view_mode", &self.view_mode)
            .field("prompt", &self.prompt)
            .field("should_quit", &self.should_quit)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model around an initial document.
    pub fn new(document: &str, terminal_size: (u16, u16)) -> Self {
        let buffer = TextBuffer::from_text(document);
        let preview_html = render::render(document);
        Self {
            buffer,
            preview_html,
            view_mode: ViewMode::default(),
            word_count_goal: DEFAULT_WORD_COUNT_GOAL,
            prompt: None,
            format_picker_open: false,
            toast: None,
            should_quit: false,
            editor_scroll: 0,
            preview_scroll: 0,
            terminal_size,
        }
    }

    /// Recompute the preview from the buffer. Call after any document change.
    pub fn sync_preview(&mut self) {
        self.preview_html = render::render(&self.buffer.text());
        let max = self.preview_html.lines().count().saturating_sub(1);
        self.preview_scroll = self.preview_scroll.min(max);
    }

    /// Replace the document wholesale (import). Selection collapses to the
    /// start and both panes scroll back to the top.
    pub fn import(&mut self, contents: &str) {
        self.buffer.replace_all(contents);
        self.editor_scroll = 0;
        self.preview_scroll = 0;
        self.sync_preview();
    }

    /// Rows available to the editor pane's text (inside its border, above
    /// the status bar).
    pub fn editor_view_rows(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(1).saturating_sub(2))
    }

    /// Scroll the editor pane so the cursor line is visible.
    pub fn ensure_cursor_visible(&mut self) {
        let rows = self.editor_view_rows();
        if rows == 0 {
            return;
        }
        let line = self.buffer.cursor_position().line - 1;
        if line < self.editor_scroll {
            self.editor_scroll = line;
        } else if line >= self.editor_scroll + rows {
            self.editor_scroll = line + 1 - rows;
        }
    }

    /// Progress toward the word-count goal, capped at 100.
    pub fn goal_progress_percent(&self) -> u32 {
        if self.word_count_goal == 0 {
            return 100;
        }
        let words = u32::try_from(self.buffer.word_count()).unwrap_or(u32::MAX);
        words
            .saturating_mul(100)
            .checked_div(self.word_count_goal)
            .unwrap_or(100)
            .min(100)
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24))
    }
}

/// Whether a path looks like a markdown file by extension.
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// MIME type for an image file, by extension. `None` for non-image files.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
