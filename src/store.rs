//! Authoritative in-memory todo collection.
//!
//! The collection is held as `Arc<Vec<Todo>>`. Every mutation goes through
//! `Arc::make_mut`, so a snapshot taken with [`TodoStore::snapshot`] is never
//! changed underneath its holder: the first write after a snapshot copies the
//! vector and swaps in the new one.

use crate::todo::Todo;
use std::collections::HashSet;
use std::sync::Arc;

/// Collection capability consumed by the controller flows and the editor.
pub trait CollectionStore {
    /// Current items in creation order.
    fn list(&self) -> &[Todo];

    /// Append a confirmed item. Returns false if the id is already present.
    fn add(&mut self, todo: Todo) -> bool;

    /// Drop the item with `id`. Returns false if it was not present.
    fn remove(&mut self, id: i64) -> bool;

    /// Replace the item with `id` by `update(old)`. Returns false if absent.
    fn update_by_id(&mut self, id: i64, update: &dyn Fn(&Todo) -> Todo) -> bool;
}

/// Copy-on-write implementation of [`CollectionStore`].
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    todos: Arc<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection, dropping duplicate ids (first one wins).
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        let mut seen = HashSet::with_capacity(todos.len());
        let total = todos.len();
        let unique: Vec<Todo> = todos.into_iter().filter(|t| seen.insert(t.id)).collect();
        if unique.len() != total {
            tracing::warn!(
                dropped = total - unique.len(),
                "Server returned duplicate todo ids, keeping first occurrence"
            );
        }
        self.todos = Arc::new(unique);
    }

    /// Cheap shared handle to the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Todo>> {
        Arc::clone(&self.todos)
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of todos not yet completed.
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.todos.iter().any(|t| t.completed)
    }

    /// True when the collection is non-empty and every todo is completed.
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// Completed todos at this instant, for bulk deletion.
    pub fn completed(&self) -> Vec<Todo> {
        self.todos.iter().filter(|t| t.completed).cloned().collect()
    }
}

impl CollectionStore for TodoStore {
    fn list(&self) -> &[Todo] {
        &self.todos
    }

    fn add(&mut self, todo: Todo) -> bool {
        if self.get(todo.id).is_some() {
            tracing::warn!(id = todo.id, "Ignoring todo with duplicate id");
            return false;
        }
        Arc::make_mut(&mut self.todos).push(todo);
        true
    }

    fn remove(&mut self, id: i64) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        Arc::make_mut(&mut self.todos).retain(|t| t.id != id);
        true
    }

    fn update_by_id(&mut self, id: i64, update: &dyn Fn(&Todo) -> Todo) -> bool {
        let Some(pos) = self.todos.iter().position(|t| t.id == id) else {
            return false;
        };
        let todos = Arc::make_mut(&mut self.todos);
        let next = update(&todos[pos]);
        todos[pos] = next;
        true
    }
}
