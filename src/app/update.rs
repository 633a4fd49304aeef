use crate::app::model::{Prompt, PromptKind};
use crate::app::{Model, ToastLevel};
use crate::editor::transform::{apply_action, ActionKind};
use crate::editor::Direction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character at the selection
    InsertChar(char),
    /// Insert a line break
    InsertNewline,
    /// Insert an indent (two spaces)
    InsertTab,
    /// Delete selection or char before cursor (Backspace)
    DeleteBack,
    /// Delete selection or char at cursor (Delete)
    DeleteForward,
    /// Move the cursor; extend selection when the flag is set
    MoveCursor(Direction, bool),
    /// Move to beginning of line (Home)
    MoveHome(bool),
    /// Move to end of line (End)
    MoveEnd(bool),
    /// Move to start of document (Ctrl+Home)
    MoveDocStart,
    /// Move to end of document (Ctrl+End)
    MoveDocEnd,
    /// Select the whole document
    SelectAll,

    // Formatting
    /// Apply a formatting action at the selection
    Format(ActionKind),
    /// Open the format picker overlay
    OpenFormatPicker,
    /// Apply the picker entry at a 1-based index
    SelectFormat(u8),
    /// Close the format picker
    CancelFormatPicker,

    // View
    /// Cycle Edit -> Split -> Preview
    CycleViewMode,
    /// Scroll the preview pane up by n lines
    PreviewScrollUp(usize),
    /// Scroll the preview pane down by n lines
    PreviewScrollDown(usize),

    // Prompts
    /// Open an input prompt
    OpenPrompt(PromptKind),
    /// Replace the prompt input text
    PromptInput(String),
    /// Dismiss the prompt without acting
    PromptCancel,
    /// Submit the prompt input
    PromptSubmit,

    // Persistence (state changes here, I/O in effects)
    /// Explicit save (Ctrl+S)
    Save,
    /// The autosave debounce elapsed
    AutosaveFired,
    /// Export the document to document.md
    Export,
    /// Copy the whole document to the clipboard
    CopyDocument,
    /// Render to a file and open it in the browser
    OpenBrowserPreview,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    let revision_before = model.buffer.revision();

    match msg {
        // Editing
        Message::InsertChar(c) => {
            model.buffer.insert_char(c);
        }
        Message::InsertNewline => {
            model.buffer.insert("\n");
        }
        Message::InsertTab => {
            model.buffer.insert("  ");
        }
        Message::DeleteBack => {
            model.buffer.delete_back();
        }
        Message::DeleteForward => {
            model.buffer.delete_forward();
        }
        Message::MoveCursor(direction, extend) => {
            model.buffer.move_cursor(direction, extend);
            model.ensure_cursor_visible();
        }
        Message::MoveHome(extend) => {
            model.buffer.move_home(extend);
        }
        Message::MoveEnd(extend) => {
            model.buffer.move_end(extend);
        }
        Message::MoveDocStart => {
            model.buffer.move_doc_start(false);
            model.ensure_cursor_visible();
        }
        Message::MoveDocEnd => {
            model.buffer.move_doc_end(false);
            model.ensure_cursor_visible();
        }
        Message::SelectAll => {
            model.buffer.select_all();
        }

        // Formatting
        Message::Format(action) => {
            model.format_picker_open = false;
            if let Err(err) = apply_action(&mut model.buffer, action) {
                model.show_toast(ToastLevel::Warning, format!("Formatting failed: {err}"));
            }
            model.ensure_cursor_visible();
        }
        Message::OpenFormatPicker => {
            model.format_picker_open = true;
        }
        Message::SelectFormat(index) => {
            model.format_picker_open = false;
            if let Some(action) = picker_action(index) {
                if let Err(err) = apply_action(&mut model.buffer, action) {
                    model.show_toast(ToastLevel::Warning, format!("Formatting failed: {err}"));
                }
                model.ensure_cursor_visible();
            }
        }
        Message::CancelFormatPicker => {
            model.format_picker_open = false;
        }

        // View
        Message::CycleViewMode => {
            model.view_mode = model.view_mode.cycled();
        }
        Message::PreviewScrollUp(n) => {
            model.preview_scroll = model.preview_scroll.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            let max = model.preview_html.lines().count().saturating_sub(1);
            model.preview_scroll = (model.preview_scroll + n).min(max);
        }

        // Prompts
        Message::OpenPrompt(kind) => {
            model.format_picker_open = false;
            model.prompt = Some(Prompt {
                kind,
                input: String::new(),
            });
        }
        Message::PromptInput(input) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input = input;
            }
        }
        Message::PromptCancel => {
            model.prompt = None;
        }
        Message::PromptSubmit => {
            // Only the goal prompt is pure; file prompts are handled in
            // effects, which consumes the prompt itself.
            if model
                .prompt
                .as_ref()
                .is_some_and(|p| p.kind == PromptKind::WordCountGoal)
            {
                let prompt = model.prompt.take().unwrap_or(Prompt {
                    kind: PromptKind::WordCountGoal,
                    input: String::new(),
                });
                match prompt.input.trim().parse::<u32>() {
                    Ok(goal) if goal > 0 => {
                        model.word_count_goal = goal;
                        model.show_toast(ToastLevel::Info, format!("Goal set to {goal} words"));
                    }
                    _ => {
                        model.show_toast(ToastLevel::Warning, "Goal must be a positive number");
                    }
                }
            }
        }

        // Persistence: I/O handled in effects
        Message::Save
        | Message::AutosaveFired
        | Message::Export
        | Message::CopyDocument
        | Message::OpenBrowserPreview => {}

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.ensure_cursor_visible();
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    if model.buffer.revision() != revision_before {
        model.sync_preview();
        model.ensure_cursor_visible();
    }
    model
}

/// Map a 1-based picker index onto [`ActionKind::ALL`].
pub(super) fn picker_action(index: u8) -> Option<ActionKind> {
    let idx = usize::from(index.checked_sub(1)?);
    ActionKind::ALL.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_action_maps_indices() {
        assert_eq!(picker_action(1), Some(ActionKind::Bold));
        assert_eq!(
            picker_action(u8::try_from(ActionKind::ALL.len()).unwrap()),
            Some(ActionKind::Table)
        );
        assert_eq!(picker_action(0), None);
        assert_eq!(picker_action(99), None);
    }
}
