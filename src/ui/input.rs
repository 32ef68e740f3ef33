//! Input handling for the TUI.
//!
//! Resolves each key through the keybinding registry for the current input
//! context and dispatches to the app flows.

use crate::app::{App, AppEvent, Mode};
use crate::filter::Filter;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Longest new-todo input accepted from the keyboard, in characters.
const MAX_INPUT_CHARS: usize = 1024;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // The help overlay captures all keys while visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    // Shifted letters arrive with SHIFT set; bindings are stored by character.
    let modifiers = match code {
        KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
        _ => modifiers,
    };

    let context = app.input_context();
    let action = app.keybindings.action_for_key(code, modifiers, context);

    match context {
        KbContext::Editing => handle_editing_input(app, action, code, modifiers, event_tx),
        KbContext::Compose => handle_compose_input(app, action, code, modifiers, event_tx),
        KbContext::List | KbContext::Global => handle_list_input(app, action, event_tx),
    }
}

/// Help overlay: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_list_input(
    app: &mut App,
    action: Option<KbAction>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let selected_id = app.selected_todo().map(|t| t.id);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::ToggleTodo) => {
            if let Some(id) = selected_id {
                app.toggle_todo(id, event_tx);
            }
        }
        Some(KbAction::DeleteTodo) => {
            if let Some(id) = selected_id {
                app.delete_todo(id, event_tx);
            }
        }
        Some(KbAction::EditTodo) => {
            app.begin_edit();
        }
        Some(KbAction::NewTodo) => app.mode = Mode::Compose,
        Some(KbAction::ToggleAll) => {
            if app.is_loading() {
                app.set_status("Waiting for the server...");
            } else {
                app.toggle_all(event_tx);
            }
        }
        Some(KbAction::ClearCompleted) => {
            if app.clear_completed(event_tx) == 0 {
                app.set_status("No completed todos to clear");
            }
        }
        Some(KbAction::CycleFilter) => app.cycle_filter(),
        Some(KbAction::FilterAll) => app.set_filter(Filter::All),
        Some(KbAction::FilterActive) => app.set_filter(Filter::Active),
        Some(KbAction::FilterCompleted) => app.set_filter(Filter::Completed),
        Some(KbAction::Reload) => {
            app.load_todos(event_tx);
            app.set_status("Reloading...");
        }
        Some(KbAction::DismissError) => {
            app.dismiss_error();
        }
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_compose_input(
    app: &mut App,
    action: Option<KbAction>,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Submit) => app.submit_new_todo(event_tx),
        Some(KbAction::Cancel) => app.mode = Mode::Browse,
        // Input is locked while a create is in flight
        _ if app.creating => {}
        _ => match code {
            KeyCode::Char(c) if modifiers.is_empty() => {
                if app.new_todo_input.chars().count() < MAX_INPUT_CHARS {
                    app.new_todo_input.push(c);
                }
            }
            KeyCode::Backspace => {
                app.new_todo_input.pop();
            }
            _ => {}
        },
    }
    Action::Continue
}

fn handle_editing_input(
    app: &mut App,
    action: Option<KbAction>,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::CommitEdit) => {
            app.commit_edit(event_tx);
        }
        Some(KbAction::CancelEdit) => app.cancel_edit(),
        Some(KbAction::Blur) => {
            // Leaving the row commits, like losing focus.
            app.commit_edit(event_tx);
            match code {
                KeyCode::Up => app.nav_up(),
                KeyCode::Down => app.nav_down(),
                _ => {}
            }
        }
        _ => match code {
            KeyCode::Char(c) if modifiers.is_empty() => app.edit_insert(c),
            KeyCode::Backspace => app.edit_backspace(),
            _ => {}
        },
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{test_app, todo};
    use crate::todo::TodoError;

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn type_str(app: &mut App, tx: &mpsc::Sender<AppEvent>, s: &str) {
        for c in s.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_q_quits_from_list_but_types_in_compose() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![]);
        press(&mut app, &tx, KeyCode::Char('n'));
        assert_eq!(app.mode, Mode::Compose);

        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue));
        assert_eq!(app.new_todo_input, "q");

        press(&mut app, &tx, KeyCode::Esc);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_compose_submit_blank_shows_error() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![]);
        press(&mut app, &tx, KeyCode::Char('n'));
        type_str(&mut app, &tx, "   ");
        press(&mut app, &tx, KeyCode::Enter);
        assert_eq!(app.current_error(), Some(TodoError::TitleEmpty));
        assert!(!app.creating);
    }

    #[tokio::test]
    async fn test_compose_locked_while_creating() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![]);
        press(&mut app, &tx, KeyCode::Char('n'));
        type_str(&mut app, &tx, "milk");
        press(&mut app, &tx, KeyCode::Enter);
        assert!(app.creating);

        type_str(&mut app, &tx, "xyz");
        press(&mut app, &tx, KeyCode::Backspace);
        assert_eq!(app.new_todo_input, "milk");
    }

    #[tokio::test]
    async fn test_shifted_letter_resolves_binding() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false)]);
        handle_input(&mut app, KeyCode::Char('A'), KeyModifiers::SHIFT, &tx);
        assert!(app.is_busy(1));
    }

    #[tokio::test]
    async fn test_edit_via_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "ab", false), todo(2, "cd", false)]);
        press(&mut app, &tx, KeyCode::Char('e'));
        type_str(&mut app, &tx, "jq");
        assert_eq!(app.editor.as_ref().map(|e| e.buffer.as_str()), Some("abjq"));

        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.editor.is_none());
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_blur_with_unchanged_title_moves_selection() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false), todo(2, "b", false)]);
        press(&mut app, &tx, KeyCode::Enter);
        press(&mut app, &tx, KeyCode::Down);
        assert!(app.editor.is_none());
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_filter_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", true)]);
        press(&mut app, &tx, KeyCode::Char('2'));
        assert_eq!(app.filter, Filter::Active);
        press(&mut app, &tx, KeyCode::Char('f'));
        assert_eq!(app.filter, Filter::Completed);
        press(&mut app, &tx, KeyCode::Char('1'));
        assert_eq!(app.filter, Filter::All);
    }

    #[tokio::test]
    async fn test_esc_dismisses_error() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![]);
        app.set_error(TodoError::TodoLoad);
        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.error.is_none());
    }

    #[tokio::test]
    async fn test_help_captures_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false)]);
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, &tx, KeyCode::Char('d'));
        assert!(!app.is_loading());
        press(&mut app, &tx, KeyCode::Char('j'));
        assert_eq!(app.help_scroll_offset, 1);
        press(&mut app, &tx, KeyCode::Esc);
        assert!(!app.show_help);
        assert_eq!(app.help_scroll_offset, 0);
    }
}
