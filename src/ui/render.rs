use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{Model, ViewMode};

use super::{overlays, status, EDITOR_WIDTH_PERCENT, PREVIEW_WIDTH_PERCENT};

fn split_main_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(toast_active);
    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let bottom_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    match model.view_mode {
        ViewMode::Edit => render_editor_pane(model, frame, main_area),
        ViewMode::Preview => render_preview_pane(model, frame, main_area),
        ViewMode::Split => {
            let chunks = split_main_columns(main_area);
            render_editor_pane(model, frame, chunks[0]);
            render_preview_pane(model, frame, chunks[1]);
        }
    }

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    if model.prompt.is_some() {
        status::render_prompt_bar(model, frame, bottom_area);
    } else {
        status::render_status_bar(model, frame, bottom_area);
    }

    if model.format_picker_open {
        overlays::render_format_picker_overlay(frame, area);
    }
}

fn render_editor_pane(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default().title("Edit").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines) as usize;
    let visible = inner.height as usize;
    let start = model.editor_scroll;
    let end = (start + visible).min(total_lines);
    let sel = buf.selection();
    let cursor = buf.cursor_position();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);

        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];
        let line_start = buf.line_start(line_idx);
        let line_len = line_text.chars().count();

        if sel.is_empty() {
            if line_idx == cursor.line - 1 {
                // Split the line at the caret and paint a block cursor.
                let col = (cursor.column - 1).min(line_len);
                let before: String = line_text.chars().take(col).collect();
                let at: String = line_text.chars().skip(col).take(1).collect();
                let after: String = line_text.chars().skip(col + 1).collect();
                if !before.is_empty() {
                    spans.push(Span::raw(before));
                }
                spans.push(Span::styled(
                    if at.is_empty() { " ".to_string() } else { at },
                    Style::default().bg(Color::White).fg(Color::Black),
                ));
                if !after.is_empty() {
                    spans.push(Span::raw(after));
                }
            } else {
                spans.push(Span::raw(line_text));
            }
        } else {
            // Highlight the slice of the selection that falls on this line.
            let sel_from = sel.start.saturating_sub(line_start).min(line_len);
            let sel_to = sel.end.saturating_sub(line_start).min(line_len);
            if sel.start > line_start + line_len || sel.end < line_start {
                spans.push(Span::raw(line_text));
            } else {
                let before: String = line_text.chars().take(sel_from).collect();
                let selected: String = line_text
                    .chars()
                    .skip(sel_from)
                    .take(sel_to - sel_from)
                    .collect();
                let after: String = line_text.chars().skip(sel_to).collect();
                if !before.is_empty() {
                    spans.push(Span::raw(before));
                }
                spans.push(Span::styled(
                    selected,
                    Style::default().bg(Color::Blue).fg(Color::White),
                ));
                if !after.is_empty() {
                    spans.push(Span::raw(after));
                }
            }
        }

        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content), inner);
}

fn render_preview_pane(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default().title("Preview").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = model
        .preview_html
        .lines()
        .skip(model.preview_scroll)
        .take(inner.height as usize)
        .map(Line::raw)
        .collect();

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        inner,
    );
}

/// Calculate the width needed for line numbers.
const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else {
        6
    }
}
