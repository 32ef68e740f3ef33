//! Mutation flows: each validates local state, marks what is loading and
//! hands the API call to a background task.
//!
//! Nothing here changes the collection; confirmed results are applied in
//! `events.rs` when the task reports back.

use super::tasks::spawn_api_task;
use super::{App, AppEvent, TaskKind};
use crate::store::CollectionStore;
use crate::todo::{normalize_title, NewTodo, Todo, TodoError, TodoPatch, PLACEHOLDER_ID};
use std::sync::Arc;
use tokio::sync::mpsc;

impl App {
    /// Fetch the full list for the configured owner.
    ///
    /// Used at startup and by the reload key. Ignored while a load is running.
    pub fn load_todos(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.loading_list {
            tracing::debug!("Load already in progress");
            return;
        }
        self.loading_list = true;

        let api = Arc::clone(&self.api);
        tracing::info!(owner_id = self.owner_id, "Loading todos");
        spawn_api_task(tx, TaskKind::Load, async move {
            AppEvent::TodosLoaded(api.list().await)
        });
    }

    /// Create a todo from the header input.
    ///
    /// A blank title sets `TitleEmpty` without a request. Otherwise a
    /// placeholder row is shown until the server answers. Further submits
    /// are ignored while a create is in flight.
    pub fn submit_new_todo(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.creating {
            tracing::debug!("Create in flight, input locked");
            return;
        }

        let title = normalize_title(&self.new_todo_input);
        if title.is_empty() {
            self.set_error(TodoError::TitleEmpty);
            return;
        }

        self.placeholder = Some(Todo::placeholder(title.clone(), self.owner_id));
        self.creating = true;

        let api = Arc::clone(&self.api);
        let new_todo = NewTodo::new(title, self.owner_id);
        tracing::debug!(title = %new_todo.title, "Submitting new todo");
        spawn_api_task(tx, TaskKind::Create, async move {
            AppEvent::TodoCreated(api.create(new_todo).await)
        });
    }

    /// Delete one todo. Returns false if no request was started because
    /// the id is the placeholder or already has a request outstanding.
    pub fn delete_todo(&mut self, id: i64, tx: &mpsc::Sender<AppEvent>) -> bool {
        if id == PLACEHOLDER_ID || !self.in_flight.insert(id) {
            tracing::debug!(id, "Delete skipped");
            return false;
        }

        let api = Arc::clone(&self.api);
        spawn_api_task(tx, TaskKind::Delete(id), async move {
            AppEvent::TodoDeleted {
                id,
                result: api.remove(id).await,
            }
        });
        true
    }

    /// Delete every todo that is completed right now, one request each.
    ///
    /// Returns the number of requests started. Each reply reconciles only
    /// its own id, so some items may survive if their request fails.
    pub fn clear_completed(&mut self, tx: &mpsc::Sender<AppEvent>) -> usize {
        let completed = self.store.completed();
        let mut started = 0;
        for todo in &completed {
            if self.delete_todo(todo.id, tx) {
                started += 1;
            }
        }
        tracing::info!(count = started, "Clearing completed todos");
        started
    }

    /// Flip the completion flag of one todo.
    pub fn toggle_todo(&mut self, id: i64, tx: &mpsc::Sender<AppEvent>) -> bool {
        let Some(todo) = self.store.get(id) else {
            self.set_error(TodoError::NotFound);
            return false;
        };
        let patch = TodoPatch::with_completed(todo, !todo.completed);
        self.spawn_completion_patch(id, patch, tx)
    }

    /// Make every todo completed, or every todo active if all already are.
    ///
    /// Only the items that need to change get a request. Ignored while
    /// anything is loading or the list is empty. Returns the number of
    /// requests started.
    pub fn toggle_all(&mut self, tx: &mpsc::Sender<AppEvent>) -> usize {
        if self.is_loading() || self.store.is_empty() {
            return 0;
        }

        let every_completed = self.store.all_completed();
        let patches: Vec<(i64, TodoPatch)> = self
            .store
            .list()
            .iter()
            .filter(|t| t.completed == every_completed)
            .map(|t| (t.id, TodoPatch::with_completed(t, !every_completed)))
            .collect();

        tracing::info!(
            count = patches.len(),
            completed = !every_completed,
            "Toggling all todos"
        );
        let mut started = 0;
        for (id, patch) in patches {
            if self.spawn_completion_patch(id, patch, tx) {
                started += 1;
            }
        }
        started
    }

    /// Send a new title for `id`. Used by the inline editor.
    pub(super) fn save_title(
        &mut self,
        id: i64,
        title: String,
        tx: &mpsc::Sender<AppEvent>,
    ) -> bool {
        let Some(todo) = self.store.get(id) else {
            self.set_error(TodoError::NotFound);
            return false;
        };
        let patch = TodoPatch::with_title(todo, title.clone());
        if !self.in_flight.insert(id) {
            return false;
        }

        let api = Arc::clone(&self.api);
        tracing::debug!(id, title = %title, "Saving title");
        spawn_api_task(tx, TaskKind::Rename(id), async move {
            let result = api.patch(id, patch).await;
            AppEvent::TitleChanged { id, title, result }
        });
        true
    }

    fn spawn_completion_patch(
        &mut self,
        id: i64,
        patch: TodoPatch,
        tx: &mpsc::Sender<AppEvent>,
    ) -> bool {
        if !self.in_flight.insert(id) {
            tracing::debug!(id, "Toggle skipped, request outstanding");
            return false;
        }

        let api = Arc::clone(&self.api);
        let completed = patch.completed;
        spawn_api_task(tx, TaskKind::Toggle(id), async move {
            let result = api.patch(id, patch).await;
            AppEvent::CompletionChanged {
                id,
                completed,
                result,
            }
        });
        true
    }
}
