//! Header: app title, toggle-all indicator and the new-todo field.

use crate::app::{App, Mode};
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const INPUT_HINT: &str = "What needs to be done?";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let focused = app.mode == Mode::Compose && app.editor.is_none();
    let mut spans = Vec::with_capacity(3);

    // Toggle-all is meaningful only when there is something to toggle
    if !app.store.is_empty() {
        let (mark, role) = if app.store.all_completed() {
            ("[✓] ", "toggle_all_on")
        } else {
            ("[ ] ", "toggle_all_off")
        };
        spans.push(Span::styled(mark, app.style(role)));
    }

    // 2 border columns + 4 for the toggle mark + 1 for the cursor
    let room = (area.width as usize).saturating_sub(7);
    if app.new_todo_input.is_empty() && !focused {
        spans.push(Span::styled(INPUT_HINT, app.style("input_hint")));
    } else {
        let text = tail_to_width(&app.new_todo_input, room);
        spans.push(Span::styled(text.to_string(), app.style("input_text")));
        if focused && !app.creating {
            spans.push(Span::styled("_", app.style("input_text")));
        }
    }

    let title = if app.creating {
        " todos · adding... "
    } else {
        " todos "
    };
    let border = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(title, app.style("title"))),
    );
    f.render_widget(paragraph, area);
}

/// The end of `s` that fits in `width` columns, so the cursor stays visible.
fn tail_to_width(s: &str, width: usize) -> &str {
    s.char_indices()
        .map(|(idx, _)| &s[idx..])
        .find(|tail| display_width(tail) <= width)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{test_app, todo};
    use crate::ui::render::tests::{contains, draw};

    #[test]
    fn test_tail_to_width() {
        assert_eq!(tail_to_width("hello", 10), "hello");
        assert_eq!(tail_to_width("hello world", 5), "world");
        assert_eq!(tail_to_width("你好世界", 5), "世界");
        assert_eq!(tail_to_width("abc", 0), "");
    }

    #[test]
    fn test_hint_when_idle() {
        let app = test_app(vec![]);
        assert!(contains(&draw(&app, 60, 12), INPUT_HINT));
    }

    #[test]
    fn test_toggle_all_mark_follows_state() {
        let app = test_app(vec![todo(1, "a", true)]);
        assert!(contains(&draw(&app, 60, 12), "[✓]"));

        let app = test_app(vec![todo(1, "a", true), todo(2, "b", false)]);
        let rows = draw(&app, 60, 12);
        assert!(!contains(&rows[..3], "[✓]"));
    }

    #[test]
    fn test_typed_input_shown_with_cursor() {
        let mut app = test_app(vec![]);
        app.mode = Mode::Compose;
        app.new_todo_input = "buy milk".into();
        assert!(contains(&draw(&app, 60, 12), "buy milk_"));
    }
}
