//! Todo list: one row per visible todo, the inline editor, and the
//! placeholder row for a create still in flight.

use crate::app::App;
use crate::util::{display_width, sanitize_for_display, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Columns used before the title: highlight symbol, checkbox, busy marker.
const ROW_PREFIX_WIDTH: usize = 8;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(format!(" {} ", app.filter.label()));

    let visible = app.visible_todos();

    if visible.is_empty() && app.placeholder.is_none() {
        let msg = if app.loading_list {
            "Loading todos..."
        } else if app.store.is_empty() {
            "Nothing to do. Press n to add a todo."
        } else {
            "No todos match this filter."
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(app.style("input_hint"))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let title_width = (area.width as usize).saturating_sub(ROW_PREFIX_WIDTH + 2);
    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];

    let mut items: Vec<ListItem> = visible
        .iter()
        .map(|todo| {
            let checkbox = Span::styled(
                if todo.completed { "[x] " } else { "[ ] " },
                app.style("checkbox"),
            );

            let editing = app.editor.as_ref().filter(|e| e.id == todo.id);
            let busy = app.is_busy(todo.id);
            let marker = if busy { spinner } else { " " };

            let mut spans = vec![checkbox];
            if let Some(editor) = editing {
                let shown = tail_fit(&editor.buffer, title_width.saturating_sub(12));
                spans.push(Span::styled(shown, app.style("editor")));
                if editor.saving {
                    spans.push(Span::styled(" (saving...)", app.style("todo_busy")));
                } else {
                    spans.push(Span::styled("_", app.style("editor")));
                }
            } else {
                let clean = sanitize_for_display(&todo.title);
                let title = truncate_to_width(&clean, title_width).into_owned();
                let style = if busy {
                    app.style("todo_busy")
                } else if todo.completed {
                    app.style("todo_completed")
                } else {
                    app.style("todo_active")
                };
                spans.push(Span::styled(title, style));
            }
            spans.push(Span::raw(format!(" {}", marker)));

            ListItem::new(Line::from(spans))
        })
        .collect();

    if let Some(placeholder) = &app.placeholder {
        let clean = sanitize_for_display(&placeholder.title);
        let title = truncate_to_width(&clean, title_width).into_owned();
        items.push(
            ListItem::new(Line::from(vec![
                Span::styled("[ ] ", app.style("checkbox")),
                Span::styled(title, app.style("todo_placeholder")),
                Span::raw(format!(" {}", spinner)),
            ]))
            .style(app.style("todo_placeholder")),
        );
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight(app))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected.min(visible.len() - 1)));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn highlight(app: &App) -> Style {
    if app.editor.is_some() {
        Style::default()
    } else {
        app.style("todo_selected")
    }
}

/// Keep the end of the editor buffer visible as it grows.
fn tail_fit(s: &str, width: usize) -> String {
    let start = s
        .char_indices()
        .map(|(idx, _)| idx)
        .find(|&idx| display_width(&s[idx..]) <= width)
        .unwrap_or(s.len());
    sanitize_for_display(&s[start..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{test_app, todo};
    use crate::app::EditorState;
    use crate::filter::Filter;
    use crate::todo::Todo;
    use crate::ui::render::tests::{contains, draw};

    #[test]
    fn test_rows_show_checkbox_state() {
        let app = test_app(vec![todo(1, "buy milk", false), todo(2, "walk dog", true)]);
        let rows = draw(&app, 60, 14);
        assert!(contains(&rows, "[ ] buy milk"));
        assert!(contains(&rows, "[x] walk dog"));
    }

    #[test]
    fn test_filter_hides_rows() {
        let mut app = test_app(vec![todo(1, "buy milk", false), todo(2, "walk dog", true)]);
        app.set_filter(Filter::Completed);
        let rows = draw(&app, 60, 14);
        assert!(!contains(&rows, "buy milk"));
        assert!(contains(&rows, "walk dog"));
    }

    #[test]
    fn test_placeholder_row_appended() {
        let mut app = test_app(vec![todo(1, "first", false)]);
        app.placeholder = Some(Todo::placeholder("second", 1346));
        let rows = draw(&app, 60, 14);
        let first = rows.iter().position(|r| r.contains("first"));
        let second = rows.iter().position(|r| r.contains("second"));
        assert!(first < second);
    }

    #[test]
    fn test_busy_row_shows_spinner() {
        let mut app = test_app(vec![todo(1, "buy milk", false)]);
        app.in_flight.insert(1);
        let rows = draw(&app, 60, 14);
        assert!(contains(&rows, SPINNER[0]));
    }

    #[test]
    fn test_editor_row_shows_buffer() {
        let mut app = test_app(vec![todo(1, "buy milk", false)]);
        app.editor = Some(EditorState {
            id: 1,
            buffer: "buy oat milk".into(),
            original: "buy milk".into(),
            saving: true,
        });
        let rows = draw(&app, 60, 14);
        assert!(contains(&rows, "buy oat milk (saving...)"));
    }

    #[test]
    fn test_empty_state_message() {
        let app = test_app(vec![]);
        assert!(contains(&draw(&app, 60, 14), "Nothing to do"));
    }

    #[test]
    fn test_tail_fit_keeps_end() {
        assert_eq!(tail_fit("abcdef", 3), "def");
        assert_eq!(tail_fit("abc", 10), "abc");
    }
}
