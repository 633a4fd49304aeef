use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::editor::ActionKind;

/// Keys shown next to the picker entries: 1-9, then a-e.
fn picker_key(index: usize) -> char {
    if index < 9 {
        char::from(b'1' + u8::try_from(index).unwrap_or(0))
    } else {
        char::from(b'a' + u8::try_from(index - 9).unwrap_or(0))
    }
}

pub fn render_format_picker_overlay(frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(16).max(36).min(area.width);
    // Entries plus border, padding, and the hint line.
    #[allow(clippy::cast_possible_truncation)]
    let needed_rows = ActionKind::ALL.len() as u16 + 6;
    let popup_height = needed_rows.min(area.height);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, action) in ActionKind::ALL.iter().enumerate() {
        let number = format!("{}: ", picker_key(idx));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                number,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(action.label()),
        ]));
    }
    lines.push(Line::raw(" "));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(
            "1-9/a-e apply · any other key cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ]));

    let block = Block::default()
        .title("Format")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_keys_match_input_mapping() {
        assert_eq!(picker_key(0), '1');
        assert_eq!(picker_key(8), '9');
        assert_eq!(picker_key(9), 'a');
        assert_eq!(picker_key(13), 'e');
    }

    #[test]
    fn test_centered_popup_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_popup_rect(40, 10, area);
        assert!(popup.x + popup.width <= 80);
        assert!(popup.y + popup.height <= 24);
    }
}
