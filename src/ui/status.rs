use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Hints shown per context when no status message is set.
const LIST_HINTS: [(Action, Context, &str); 7] = [
    (Action::NewTodo, Context::List, "new"),
    (Action::ToggleTodo, Context::List, "toggle"),
    (Action::EditTodo, Context::List, "edit"),
    (Action::DeleteTodo, Context::List, "delete"),
    (Action::CycleFilter, Context::List, "filter"),
    (Action::ShowHelp, Context::Global, "help"),
    (Action::Quit, Context::Global, "quit"),
];
const COMPOSE_HINTS: [(Action, Context, &str); 2] = [
    (Action::Submit, Context::Compose, "add"),
    (Action::Cancel, Context::Compose, "back"),
];
const EDITING_HINTS: [(Action, Context, &str); 3] = [
    (Action::CommitEdit, Context::Editing, "save"),
    (Action::CancelEdit, Context::Editing, "discard"),
    (Action::Blur, Context::Editing, "save and move"),
];

/// Render the error line; empty when no error is shown.
pub fn render_error(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let Some(error) = app.current_error() else {
        return;
    };

    let dismiss = app
        .keybindings
        .key_hint(Action::DismissError, Context::List)
        .map(|key| format!("  ({} to dismiss)", key))
        .unwrap_or_default();

    let paragraph = Paragraph::new(format!(" {}{}", error, dismiss)).style(app.style("error_line"));
    f.render_widget(paragraph, area);
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        let hints: &[(Action, Context, &str)] = match app.input_context() {
            Context::Editing => &EDITING_HINTS[..],
            Context::Compose => &COMPOSE_HINTS[..],
            Context::List | Context::Global => &LIST_HINTS[..],
        };
        Cow::Owned(format_hints(app, hints))
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

/// "[n]new [Space]toggle ..." from the live bindings, skipping unbound actions.
fn format_hints(app: &App, hints: &[(Action, Context, &str)]) -> String {
    hints
        .iter()
        .filter_map(|(action, ctx, label)| {
            app.keybindings
                .key_hint(*action, *ctx)
                .map(|key| format!("[{}]{}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
