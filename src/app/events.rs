//! Reconciliation of background task results into local state.

use super::{App, AppEvent, TaskKind};
use crate::api::ApiError;
use crate::store::CollectionStore;
use crate::todo::{Todo, TodoError};

impl App {
    /// Apply one task result. Called only on the UI task.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        self.needs_redraw = true;
        match event {
            AppEvent::TodosLoaded(result) => self.handle_todos_loaded(result),
            AppEvent::TodoCreated(result) => self.handle_todo_created(result),
            AppEvent::TodoDeleted { id, result } => self.handle_todo_deleted(id, result),
            AppEvent::CompletionChanged {
                id,
                completed,
                result,
            } => self.handle_completion_changed(id, completed, result),
            AppEvent::TitleChanged { id, title, result } => {
                self.handle_title_changed(id, title, result)
            }
            AppEvent::TaskPanicked { task, error } => self.handle_task_panicked(task, &error),
        }
    }

    fn handle_todos_loaded(&mut self, result: Result<Vec<Todo>, ApiError>) {
        self.loading_list = false;
        match result {
            Ok(todos) => {
                tracing::info!(count = todos.len(), "Loaded todos");
                self.store.replace_all(todos);
                // Anything marked in flight that vanished no longer needs an overlay.
                let store = &self.store;
                self.in_flight.retain(|id| store.get(*id).is_some());
                if let Some(editor) = &self.editor {
                    if self.store.get(editor.id).is_none() {
                        self.editor = None;
                    }
                }
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load todos");
                self.set_error(TodoError::TodoLoad);
            }
        }
    }

    fn handle_todo_created(&mut self, result: Result<Todo, ApiError>) {
        match result {
            Ok(todo) => {
                tracing::info!(id = todo.id, "Todo created");
                self.store.add(todo);
                self.new_todo_input.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create todo");
                self.set_error(TodoError::TodoAdd);
            }
        }
        self.placeholder = None;
        self.creating = false;
    }

    fn handle_todo_deleted(&mut self, id: i64, result: Result<(), ApiError>) {
        self.in_flight.remove(&id);
        match result {
            Ok(()) => {
                tracing::info!(id, "Todo deleted");
                self.store.remove(id);
                if self.editor.as_ref().is_some_and(|e| e.id == id) {
                    self.editor = None;
                }
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to delete todo");
                self.set_error(TodoError::TodoDelete);
                self.release_editor(id);
            }
        }
    }

    fn handle_completion_changed(&mut self, id: i64, completed: bool, result: Result<(), ApiError>) {
        self.in_flight.remove(&id);
        match result {
            Ok(()) => {
                tracing::debug!(id, completed, "Completion updated");
                self.store.update_by_id(id, &|t| Todo {
                    completed,
                    ..t.clone()
                });
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to update completion");
                self.set_error(TodoError::TodoUpdate);
            }
        }
    }

    fn handle_title_changed(&mut self, id: i64, title: String, result: Result<(), ApiError>) {
        self.in_flight.remove(&id);
        match result {
            Ok(()) => {
                tracing::debug!(id, "Title updated");
                self.store.update_by_id(id, &|t| Todo {
                    title: title.clone(),
                    ..t.clone()
                });
                if self.editor.as_ref().is_some_and(|e| e.id == id) {
                    self.editor = None;
                }
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to update title");
                self.set_error(TodoError::TodoUpdate);
                self.release_editor(id);
            }
        }
    }

    fn handle_task_panicked(&mut self, task: TaskKind, error: &str) {
        tracing::error!(task = %task, error, "Background task panicked");
        match task {
            TaskKind::Load => {
                self.loading_list = false;
                self.set_error(TodoError::TodoLoad);
            }
            TaskKind::Create => {
                self.placeholder = None;
                self.creating = false;
                self.set_error(TodoError::TodoAdd);
            }
            TaskKind::Delete(id) => {
                self.in_flight.remove(&id);
                self.release_editor(id);
                self.set_error(TodoError::TodoDelete);
            }
            TaskKind::Toggle(id) => {
                self.in_flight.remove(&id);
                self.set_error(TodoError::TodoUpdate);
            }
            TaskKind::Rename(id) => {
                self.in_flight.remove(&id);
                self.release_editor(id);
                self.set_error(TodoError::TodoUpdate);
            }
        }
    }

    /// Let the user keep typing after a failed save of `id`.
    fn release_editor(&mut self, id: i64) {
        if let Some(editor) = self.editor.as_mut().filter(|e| e.id == id) {
            editor.saving = false;
        }
    }
}
