//! Inline title editor.
//!
//! At most one todo is edited at a time. Viewing → Editing on
//! [`App::begin_edit`]; a commit either closes the editor directly (title
//! unchanged), sends a rename, or, for an emptied title, deletes the todo.
//! While a save is outstanding the editor stays open and ignores input; it
//! closes when the save succeeds and unlocks when it fails.

use super::{App, AppEvent};
use crate::todo::normalize_title;
use tokio::sync::mpsc;

/// Longest buffer accepted from the keyboard, in characters.
pub const MAX_TITLE_CHARS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub id: i64,
    pub buffer: String,
    /// Title at the moment editing started.
    pub original: String,
    /// A rename or delete for this edit is in flight.
    pub saving: bool,
}

/// What a commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// No editor open, or a save is already running.
    Ignored,
    /// Title unchanged after normalization; editor closed without a request.
    Unchanged,
    /// Rename sent.
    Saving,
    /// Title emptied; delete sent.
    Deleting,
}

impl App {
    /// Start editing the selected todo.
    pub fn begin_edit(&mut self) -> bool {
        match self.selected_todo() {
            Some(todo) => {
                let id = todo.id;
                self.begin_edit_for(id)
            }
            None => false,
        }
    }

    /// Start editing `id`, seeded with its current title.
    ///
    /// Refused for the placeholder, for items with a request outstanding and
    /// while another edit is open.
    pub fn begin_edit_for(&mut self, id: i64) -> bool {
        if self.editor.is_some() || self.is_busy(id) {
            return false;
        }
        let Some(todo) = self.store.get(id).filter(|t| !t.is_placeholder()) else {
            return false;
        };

        tracing::debug!(id, "Editing title");
        self.editor = Some(EditorState {
            id,
            buffer: todo.title.clone(),
            original: todo.title.clone(),
            saving: false,
        });
        true
    }

    pub fn edit_insert(&mut self, c: char) {
        if let Some(editor) = self.editor.as_mut().filter(|e| !e.saving) {
            if editor.buffer.chars().count() < MAX_TITLE_CHARS {
                editor.buffer.push(c);
            }
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(editor) = self.editor.as_mut().filter(|e| !e.saving) {
            editor.buffer.pop();
        }
    }

    /// Commit the open edit.
    pub fn commit_edit(&mut self, tx: &mpsc::Sender<AppEvent>) -> CommitOutcome {
        let Some(editor) = self.editor.as_mut() else {
            return CommitOutcome::Ignored;
        };
        if editor.saving {
            return CommitOutcome::Ignored;
        }

        let id = editor.id;
        let title = normalize_title(&editor.buffer);
        if title == normalize_title(&editor.original) {
            self.editor = None;
            return CommitOutcome::Unchanged;
        }
        editor.saving = true;

        let (started, outcome) = if title.is_empty() {
            (self.delete_todo(id, tx), CommitOutcome::Deleting)
        } else {
            (self.save_title(id, title, tx), CommitOutcome::Saving)
        };

        if !started {
            // The todo disappeared or is busy elsewhere: nothing left to edit.
            self.editor = None;
            return CommitOutcome::Ignored;
        }
        outcome
    }

    /// Leave editing and discard the buffer.
    pub fn cancel_edit(&mut self) {
        if let Some(editor) = self.editor.take() {
            tracing::debug!(id = editor.id, saving = editor.saving, "Edit cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{test_app, todo};
    use super::*;
    use crate::api::ApiError;
    use crate::store::CollectionStore;
    use crate::todo::{Todo, TodoError};

    fn editing(app: &mut App, id: i64, buffer: &str) {
        assert!(app.begin_edit_for(id));
        if let Some(editor) = app.editor.as_mut() {
            editor.buffer = buffer.to_string();
        }
    }

    #[tokio::test]
    async fn test_begin_edit_seeds_title() {
        let mut app = test_app(vec![todo(1, "read book", false)]);
        assert!(app.begin_edit());
        let editor = app.editor.clone().unwrap();
        assert_eq!(editor.buffer, "read book");
        assert!(!editor.saving);
        // Only one editor at a time
        assert!(!app.begin_edit_for(1));
    }

    #[tokio::test]
    async fn test_begin_edit_refused_when_busy() {
        let mut app = test_app(vec![todo(1, "a", false)]);
        app.in_flight.insert(1);
        assert!(!app.begin_edit());
        assert!(!app.begin_edit_for(99));
    }

    #[tokio::test]
    async fn test_unchanged_title_closes_without_request() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "read book", false)]);
        editing(&mut app, 1, "  read    book ");
        assert_eq!(app.commit_edit(&tx), CommitOutcome::Unchanged);
        assert!(app.editor.is_none());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_new_title_saves_and_closes_on_success() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false)]);
        editing(&mut app, 1, " b  c ");
        assert_eq!(app.commit_edit(&tx), CommitOutcome::Saving);
        assert!(app.editor.as_ref().is_some_and(|e| e.saving));
        assert!(app.is_busy(1));

        // Input is ignored while saving
        app.edit_insert('x');
        assert_eq!(app.editor.as_ref().map(|e| e.buffer.as_str()), Some(" b  c "));

        app.handle_app_event(AppEvent::TitleChanged {
            id: 1,
            title: "b c".into(),
            result: Ok(()),
        });
        assert!(app.editor.is_none());
        assert_eq!(app.store.get(1).map(|t| t.title.as_str()), Some("b c"));
    }

    #[tokio::test]
    async fn test_failed_save_stays_editing() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false)]);
        editing(&mut app, 1, "b");
        app.commit_edit(&tx);

        app.handle_app_event(AppEvent::TitleChanged {
            id: 1,
            title: "b".into(),
            result: Err(ApiError::HttpStatus(500)),
        });
        assert_eq!(app.current_error(), Some(TodoError::TodoUpdate));
        let editor = app.editor.clone().unwrap();
        assert!(!editor.saving);
        assert_eq!(editor.buffer, "b");
        assert_eq!(app.store.get(1).map(|t| t.title.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn test_empty_title_routes_to_delete() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(vec![todo(1, "a", false), todo(2, "b", false)]);
        editing(&mut app, 1, "   ");
        assert_eq!(app.commit_edit(&tx), CommitOutcome::Deleting);
        assert!(app.is_busy(1));

        app.handle_app_event(AppEvent::TodoDeleted {
            id: 1,
            result: Ok(()),
        });
        assert!(app.editor.is_none());
        let ids: Vec<i64> = app.store.list().iter().map(|t: &Todo| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_cancel_discards_buffer() {
        let mut app = test_app(vec![todo(1, "a", false)]);
        editing(&mut app, 1, "changed");
        app.cancel_edit();
        assert!(app.editor.is_none());
        assert_eq!(app.store.get(1).map(|t| t.title.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn test_editing_and_backspace() {
        let mut app = test_app(vec![todo(1, "ab", false)]);
        app.begin_edit();
        app.edit_backspace();
        app.edit_insert('z');
        assert_eq!(app.editor.map(|e| e.buffer), Some("az".to_string()));
    }
}
