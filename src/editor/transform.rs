//! Formatting transforms: the toolbar actions that wrap or insert
//! markdown syntax at the current selection.

use super::buffer::{BufferError, TextBuffer};

/// The fixed table inserted by [`ActionKind::Table`], regardless of selection.
const TABLE_TEMPLATE: &str =
    "| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |";

/// The closed set of formatting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Bold,
    Italic,
    Strikethrough,
    /// Heading level 1 through 3. Levels outside that range are clamped.
    Heading(u8),
    BulletList,
    NumberedList,
    TaskList,
    Quote,
    Code,
    Link,
    Image,
    Table,
}

impl ActionKind {
    /// All actions in picker order.
    pub const ALL: [Self; 14] = [
        Self::Bold,
        Self::Italic,
        Self::Strikethrough,
        Self::Heading(1),
        Self::Heading(2),
        Self::Heading(3),
        Self::BulletList,
        Self::NumberedList,
        Self::TaskList,
        Self::Quote,
        Self::Code,
        Self::Link,
        Self::Image,
        Self::Table,
    ];

    /// Human-readable label for pickers and the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::Heading(1) => "Heading 1",
            Self::Heading(2) => "Heading 2",
            Self::Heading(_) => "Heading 3",
            Self::BulletList => "Bullet list",
            Self::NumberedList => "Numbered list",
            Self::TaskList => "Task list",
            Self::Quote => "Quote",
            Self::Code => "Code",
            Self::Link => "Link",
            Self::Image => "Image",
            Self::Table => "Table",
        }
    }
}

/// The text an action produces, plus where the caret lands.
///
/// `cursor_back` counts chars back from the end of `text`; the caret is
/// placed at `insert_offset + text.chars().count() - cursor_back`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub cursor_back: usize,
}

/// Build the snippet for `action` applied to `selected`.
///
/// An empty selection inserts a placeholder and, for the delimiter-wrapping
/// actions, parks the caret inside the closing delimiter. With a non-empty
/// selection the caret always lands at the end of the inserted text.
pub fn transform(action: ActionKind, selected: &str) -> Snippet {
    let has_selection = !selected.is_empty();
    let or_default = |placeholder: &str| -> String {
        if has_selection {
            selected.to_string()
        } else {
            placeholder.to_string()
        }
    };
    let back = |n: usize| if has_selection { 0 } else { n };

    match action {
        ActionKind::Bold => Snippet {
            text: format!("**{}**", or_default("bold text")),
            cursor_back: back(2),
        },
        ActionKind::Italic => Snippet {
            text: format!("*{}*", or_default("italic text")),
            cursor_back: back(1),
        },
        ActionKind::Strikethrough => Snippet {
            text: format!("~~{}~~", or_default("strikethrough text")),
            cursor_back: back(2),
        },
        ActionKind::Heading(level) => {
            let level = level.clamp(1, 3) as usize;
            let placeholder = match level {
                1 => "Heading 1",
                2 => "Heading 2",
                _ => "Heading 3",
            };
            Snippet {
                text: format!("{} {}", "#".repeat(level), or_default(placeholder)),
                cursor_back: 0,
            }
        }
        ActionKind::BulletList => Snippet {
            text: format!("- {}", or_default("List item")),
            cursor_back: 0,
        },
        ActionKind::NumberedList => Snippet {
            text: format!("1. {}", or_default("List item")),
            cursor_back: 0,
        },
        ActionKind::TaskList => Snippet {
            text: format!("- [ ] {}", or_default("Task item")),
            cursor_back: 0,
        },
        ActionKind::Quote => Snippet {
            text: format!("> {}", or_default("Blockquote")),
            cursor_back: 0,
        },
        ActionKind::Code => {
            let body = or_default("Code");
            if body.contains('\n') {
                Snippet {
                    text: format!("```\n{body}\n```"),
                    cursor_back: back(4),
                }
            } else {
                Snippet {
                    text: format!("`{body}`"),
                    cursor_back: back(1),
                }
            }
        }
        ActionKind::Link => Snippet {
            text: format!("[{}](url)", or_default("Link text")),
            cursor_back: back(1),
        },
        ActionKind::Image => Snippet {
            text: format!("![{}](url)", or_default("Image alt text")),
            cursor_back: back(1),
        },
        ActionKind::Table => Snippet {
            text: TABLE_TEMPLATE.to_string(),
            cursor_back: 0,
        },
    }
}

/// Apply a formatting action at the buffer's current selection.
///
/// The selection is replaced by the snippet and the caret collapses at the
/// snippet's cursor position.
///
/// # Errors
///
/// Propagates [`BufferError`] from the underlying edit.
pub fn apply_action(buffer: &mut TextBuffer, action: ActionKind) -> Result<(), BufferError> {
    let sel = buffer.selection();
    let snippet = transform(action, &buffer.selected_text());
    let caret = sel.start + snippet.text.chars().count() - snippet.cursor_back;
    buffer.apply_with_cursor(sel, &snippet.text, caret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::Selection;

    fn caret_after(action: ActionKind, text: &str, sel: Selection) -> (String, usize) {
        let mut buf = TextBuffer::from_text(text);
        buf.set_selection(sel);
        apply_action(&mut buf, action).unwrap();
        (buf.text(), buf.selection().start)
    }

    // --- Placeholder insertion (empty selection) ---

    #[test]
    fn test_bold_placeholder_lands_inside_markers() {
        let (text, caret) = caret_after(ActionKind::Bold, "ab", Selection::caret(1));
        assert_eq!(text, "a**bold text**b");
        // 1 + len("**bold text**") - 2
        assert_eq!(caret, 1 + 13 - 2);
    }

    #[test]
    fn test_italic_placeholder() {
        let snippet = transform(ActionKind::Italic, "");
        assert_eq!(snippet.text, "*italic text*");
        assert_eq!(snippet.cursor_back, 1);
    }

    #[test]
    fn test_strikethrough_placeholder() {
        let snippet = transform(ActionKind::Strikethrough, "");
        assert_eq!(snippet.text, "~~strikethrough text~~");
        assert_eq!(snippet.cursor_back, 2);
    }

    #[test]
    fn test_heading_levels_and_clamping() {
        assert_eq!(transform(ActionKind::Heading(1), "").text, "# Heading 1");
        assert_eq!(transform(ActionKind::Heading(2), "").text, "## Heading 2");
        assert_eq!(transform(ActionKind::Heading(3), "").text, "### Heading 3");
        assert_eq!(transform(ActionKind::Heading(0), "").text, "# Heading 1");
        assert_eq!(transform(ActionKind::Heading(9), "").text, "### Heading 3");
    }

    #[test]
    fn test_list_and_quote_placeholders() {
        assert_eq!(transform(ActionKind::BulletList, "").text, "- List item");
        assert_eq!(transform(ActionKind::NumberedList, "").text, "1. List item");
        assert_eq!(transform(ActionKind::TaskList, "").text, "- [ ] Task item");
        assert_eq!(transform(ActionKind::Quote, "").text, "> Blockquote");
        assert_eq!(transform(ActionKind::Quote, "").cursor_back, 0);
    }

    #[test]
    fn test_code_placeholder_is_inline() {
        let snippet = transform(ActionKind::Code, "");
        assert_eq!(snippet.text, "`Code`");
        assert_eq!(snippet.cursor_back, 1);
    }

    #[test]
    fn test_link_and_image_placeholders() {
        let link = transform(ActionKind::Link, "");
        assert_eq!(link.text, "[Link text](url)");
        assert_eq!(link.cursor_back, 1);
        let image = transform(ActionKind::Image, "");
        assert_eq!(image.text, "![Image alt text](url)");
        assert_eq!(image.cursor_back, 1);
    }

    // --- Selection wrapping ---

    #[test]
    fn test_bold_wraps_selection() {
        let (text, caret) = caret_after(ActionKind::Bold, "say hello now", Selection::span(4, 9));
        assert_eq!(text, "say **hello** now");
        assert_eq!(caret, 4 + "**hello**".chars().count());
    }

    #[test]
    fn test_selection_always_lands_at_snippet_end() {
        // Non-empty selections land the caret at the end for every
        // single-segment action, link and image included.
        for action in [
            ActionKind::Bold,
            ActionKind::Italic,
            ActionKind::Strikethrough,
            ActionKind::Link,
            ActionKind::Image,
        ] {
            let snippet = transform(action, "abc");
            assert_eq!(snippet.cursor_back, 0, "{action:?}");
        }
    }

    #[test]
    fn test_code_selection_spanning_lines_uses_fence() {
        let snippet = transform(ActionKind::Code, "let x = 1;\nlet y = 2;");
        assert_eq!(snippet.text, "```\nlet x = 1;\nlet y = 2;\n```");
        assert_eq!(snippet.cursor_back, 0);
    }

    #[test]
    fn test_code_single_line_selection_stays_inline() {
        let snippet = transform(ActionKind::Code, "x + y");
        assert_eq!(snippet.text, "`x + y`");
        assert_eq!(snippet.cursor_back, 0);
    }

    #[test]
    fn test_table_ignores_selection() {
        let empty = transform(ActionKind::Table, "");
        let selected = transform(ActionKind::Table, "anything at all");
        assert_eq!(empty, selected);
        assert_eq!(
            empty.text,
            "| Header 1 | Header 2 |\n|----------|----------|\n| Cell 1   | Cell 2   |"
        );
    }

    #[test]
    fn test_table_replaces_selection_with_template() {
        let (text, _) = caret_after(ActionKind::Table, "abcdef", Selection::span(1, 5));
        assert!(text.starts_with("a| Header 1 | Header 2 |"));
        assert!(text.ends_with("| Cell 1   | Cell 2   |f"));
    }

    #[test]
    fn test_transform_preserves_surrounding_text() {
        let (text, _) = caret_after(ActionKind::Quote, "pre post", Selection::span(4, 8));
        assert_eq!(text, "pre > post");
    }

    #[test]
    fn test_multibyte_selection_offsets() {
        let (text, caret) = caret_after(ActionKind::Bold, "héllo", Selection::span(0, 5));
        assert_eq!(text, "**héllo**");
        assert_eq!(caret, "**héllo**".chars().count());
    }

    #[test]
    fn test_label_covers_all_actions() {
        for action in ActionKind::ALL {
            assert!(!action.label().is_empty());
        }
    }
}
