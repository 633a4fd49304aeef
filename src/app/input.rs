use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::model::{PromptKind, ViewMode};
use crate::app::{Message, Model};
use crate::editor::{ActionKind, Direction};

/// Translate a terminal event into a message, given the current model.
pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, model),
        Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
        _ => None,
    }
}

fn handle_key(key: &KeyEvent, model: &Model) -> Option<Message> {
    if model.format_picker_open {
        return Some(match key.code {
            KeyCode::Char(c @ '1'..='9') => Message::SelectFormat(c as u8 - b'0'),
            KeyCode::Char(c @ 'a'..='e') => Message::SelectFormat(c as u8 - b'a' + 10),
            _ => Message::CancelFormatPicker,
        });
    }

    if let Some(prompt) = model.prompt.as_ref() {
        return match key.code {
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::PromptSubmit),
            KeyCode::Backspace => {
                let mut next = prompt.input.clone();
                next.pop();
                Some(Message::PromptInput(next))
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = prompt.input.clone();
                next.push(c);
                Some(Message::PromptInput(next))
            }
            _ => None,
        };
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match key.code {
            KeyCode::Char('s') => Some(Message::Save),
            KeyCode::Char('e') => Some(Message::Export),
            KeyCode::Char('o') => Some(Message::OpenPrompt(PromptKind::ImportPath)),
            KeyCode::Char('n') => Some(Message::OpenPrompt(PromptKind::AttachImagePath)),
            KeyCode::Char('g') => Some(Message::OpenPrompt(PromptKind::WordCountGoal)),
            KeyCode::Char('y') => Some(Message::CopyDocument),
            KeyCode::Char('b') => Some(Message::Format(ActionKind::Bold)),
            KeyCode::Char('k') => Some(Message::Format(ActionKind::Link)),
            KeyCode::Char('f') => Some(Message::OpenFormatPicker),
            KeyCode::Char('p') => Some(Message::OpenBrowserPreview),
            KeyCode::Char('a') => Some(Message::SelectAll),
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Home => Some(Message::MoveDocStart),
            KeyCode::End => Some(Message::MoveDocEnd),
            _ => None,
        };
    }

    if key.code == KeyCode::F(2) {
        return Some(Message::CycleViewMode);
    }

    // In preview-only mode the keyboard drives the preview pane.
    if model.view_mode == ViewMode::Preview {
        return match key.code {
            KeyCode::Up => Some(Message::PreviewScrollUp(1)),
            KeyCode::Down => Some(Message::PreviewScrollDown(1)),
            KeyCode::PageUp => Some(Message::PreviewScrollUp(10)),
            KeyCode::PageDown => Some(Message::PreviewScrollDown(10)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up, shift)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down, shift)),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left, shift)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right, shift)),
        KeyCode::Home => Some(Message::MoveHome(shift)),
        KeyCode::End => Some(Message::MoveEnd(shift)),
        KeyCode::PageUp if model.view_mode == ViewMode::Split => {
            Some(Message::PreviewScrollUp(10))
        }
        KeyCode::PageDown if model.view_mode == ViewMode::Split => {
            Some(Message::PreviewScrollDown(10))
        }
        KeyCode::Enter => Some(Message::InsertNewline),
        KeyCode::Tab => Some(Message::InsertTab),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Char(c) => Some(Message::InsertChar(c)),
        _ => None,
    }
}
