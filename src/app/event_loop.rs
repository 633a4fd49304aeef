use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;

use crate::app::{effects, input, update, App, Message, Model, ToastLevel};
use crate::autosave::AutosaveTimer;
use crate::storage::{DirStore, DocumentStore, Store};

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails, the startup file
    /// cannot be read, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let root = self
            .storage_root
            .clone()
            .unwrap_or_else(DirStore::default_root);
        let mut docs = DocumentStore::new(DirStore::new(root));

        // Startup document: an explicit file wins over the saved session.
        let document = match self.startup_file.take() {
            Some(path) => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                String::from_utf8(bytes)
                    .with_context(|| format!("{} is not UTF-8 text", path.display()))?
            }
            None => docs.load_or_sample(),
        };

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - markpad requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(&document, (size.width, size.height));
        if let Some(mode) = self.view_mode {
            model.view_mode = mode;
        }

        if docs.welcome_pending() {
            model.show_toast(
                ToastLevel::Info,
                "Welcome to markpad! Ctrl+F formats, F2 cycles views, Ctrl+Q quits",
            );
            if let Err(err) = docs.mark_welcome_shown() {
                tracing::warn!("failed to record welcome flag: {err}");
            }
        }

        let timer = self.autosave_delay_ms.map(AutosaveTimer::new);
        let result = event_loop(&mut terminal, &mut model, &mut docs, timer);

        ratatui::restore();
        result
    }
}

/// Arm or cancel the autosave timer for one processed message.
fn update_autosave_timer(
    timer: &mut Option<AutosaveTimer>,
    msg: &Message,
    document_changed: bool,
    now_ms: u64,
) {
    let Some(timer) = timer.as_mut() else {
        return;
    };
    // An explicit save makes the pending implicit one redundant.
    if matches!(msg, Message::Save) {
        timer.cancel();
        return;
    }
    if document_changed {
        timer.arm(now_ms);
    }
}

fn event_loop<S: Store>(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    docs: &mut DocumentStore<S>,
    mut timer: Option<AutosaveTimer>,
) -> Result<()> {
    let start = Instant::now();
    let mut needs_render = true;

    loop {
        if model.expire_toast(Instant::now()) {
            needs_render = true;
        }

        let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        if timer.as_mut().is_some_and(|t| t.take_ready(now_ms)) {
            *model = update(std::mem::take(model), Message::AutosaveFired);
            effects::handle_message_side_effects(model, docs, &Message::AutosaveFired);
            needs_render = true;
        }

        let poll_ms = if needs_render {
            0
        } else if timer.as_ref().is_some_and(AutosaveTimer::is_pending) {
            50
        } else {
            250
        };
        if event::poll(Duration::from_millis(poll_ms))? {
            let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some(msg) = input::handle_event(&event::read()?, model) {
                process_message(model, docs, &mut timer, msg, event_ms);
                needs_render = true;
            }

            // Coalesce key repeat bursts into a single render.
            while event::poll(Duration::from_millis(0))? {
                let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) = input::handle_event(&event::read()?, model) {
                    process_message(model, docs, &mut timer, msg, drain_ms);
                    needs_render = true;
                }
            }
        }

        if needs_render {
            terminal.draw(|frame| crate::ui::render(model, frame))?;
            needs_render = false;
        }

        if model.should_quit {
            break;
        }
    }
    Ok(())
}

fn process_message<S: Store>(
    model: &mut Model,
    docs: &mut DocumentStore<S>,
    timer: &mut Option<AutosaveTimer>,
    msg: Message,
    now_ms: u64,
) {
    let revision_before = model.buffer.revision();
    let side_msg = msg.clone();
    *model = update(std::mem::take(model), msg);
    effects::handle_message_side_effects(model, docs, &side_msg);
    let changed = model.buffer.revision() != revision_before;
    update_autosave_timer(timer, &side_msg, changed, now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_save_cancels_pending_autosave() {
        let mut timer = Some(AutosaveTimer::new(5000));
        update_autosave_timer(&mut timer, &Message::InsertChar('a'), true, 0);
        assert!(timer.as_ref().unwrap().is_pending());
        update_autosave_timer(&mut timer, &Message::Save, false, 100);
        assert!(!timer.as_ref().unwrap().is_pending());
    }

    #[test]
    fn test_cursor_moves_do_not_arm_autosave() {
        let mut timer = Some(AutosaveTimer::new(5000));
        update_autosave_timer(
            &mut timer,
            &Message::MoveCursor(crate::editor::Direction::Left, false),
            false,
            0,
        );
        assert!(!timer.as_ref().unwrap().is_pending());
    }

    #[test]
    fn test_disabled_autosave_is_a_noop() {
        let mut timer = None;
        update_autosave_timer(&mut timer, &Message::InsertChar('a'), true, 0);
        assert!(timer.is_none());
    }
}
