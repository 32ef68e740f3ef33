//! Footer: items left, filter selector and the clear-completed hint.

use crate::app::App;
use crate::filter::Filter;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 || app.store.is_empty() {
        return;
    }

    let active = app.store.active_count();
    let noun = if active == 1 { "item" } else { "items" };

    let mut spans = vec![
        Span::styled(format!(" {} {} left", active, noun), app.style("footer_count")),
        Span::raw("   "),
    ];

    for (i, filter) in Filter::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let role = if *filter == app.filter {
            "filter_selected"
        } else {
            "filter_normal"
        };
        spans.push(Span::styled(format!("[{}]", filter.label()), app.style(role)));
    }

    if app.store.has_completed() {
        let key = app
            .keybindings
            .key_hint(Action::ClearCompleted, Context::List)
            .unwrap_or_default();
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} clear completed", key),
            app.style("footer_hint"),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use crate::app::tests::{test_app, todo};
    use crate::ui::render::tests::{contains, draw};

    #[test]
    fn test_items_left_pluralizes() {
        let app = test_app(vec![todo(1, "a", false), todo(2, "b", true)]);
        assert!(contains(&draw(&app, 80, 12), "1 item left"));

        let app = test_app(vec![todo(1, "a", false), todo(2, "b", false)]);
        assert!(contains(&draw(&app, 80, 12), "2 items left"));
    }

    #[test]
    fn test_clear_hint_only_with_completed() {
        let app = test_app(vec![todo(1, "a", false)]);
        assert!(!contains(&draw(&app, 80, 12), "clear completed"));

        let app = test_app(vec![todo(1, "a", true)]);
        assert!(contains(&draw(&app, 80, 12), "C clear completed"));
    }

    #[test]
    fn test_lists_all_filters() {
        let app = test_app(vec![todo(1, "a", false)]);
        let rows = draw(&app, 80, 12);
        assert!(contains(&rows, "[All] [Active] [Completed]"));
    }
}
