//! Application controller: authoritative todo state and its mutation flows.
//!
//! Every network operation runs on a spawned task and reports back with an
//! [`AppEvent`]. Events are applied one at a time on the UI task by
//! [`App::handle_app_event`], so each reconciliation is a single step.

mod editor;
mod events;
mod flows;
mod tasks;

pub use editor::{CommitOutcome, EditorState};
pub use tasks::catch_task_panic;

use crate::api::{ApiError, TodoApi};
use crate::config::Config;
use crate::filter::{filter_todos, Filter};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::store::{CollectionStore, TodoStore};
use crate::theme::{StyleMap, ThemeVariant};
use crate::todo::{Todo, TodoError};
use ratatui::style::Style;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Mode and Event Types
// ============================================================================

/// Where keyboard input goes when no editor is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigating the list.
    #[default]
    Browse,
    /// Typing a new todo in the header field.
    Compose,
}

/// Which background operation a task performed, for panic reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Load,
    Create,
    Delete(i64),
    Toggle(i64),
    Rename(i64),
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Create => write!(f, "create"),
            Self::Delete(id) => write!(f, "delete #{}", id),
            Self::Toggle(id) => write!(f, "toggle #{}", id),
            Self::Rename(id) => write!(f, "rename #{}", id),
        }
    }
}

/// Results of background tasks, delivered over the app channel.
#[derive(Debug)]
pub enum AppEvent {
    TodosLoaded(Result<Vec<Todo>, ApiError>),
    TodoCreated(Result<Todo, ApiError>),
    TodoDeleted {
        id: i64,
        result: Result<(), ApiError>,
    },
    CompletionChanged {
        id: i64,
        completed: bool,
        result: Result<(), ApiError>,
    },
    TitleChanged {
        id: i64,
        title: String,
        result: Result<(), ApiError>,
    },
    /// A background task panicked instead of producing its event.
    TaskPanicked { task: TaskKind, error: String },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub api: Arc<dyn TodoApi>,
    pub owner_id: i64,

    // Data
    pub store: TodoStore,
    pub filter: Filter,
    /// Unsaved item shown at the end of the list while a create is in flight.
    pub placeholder: Option<Todo>,

    // Loading
    /// Ids with a delete or patch request outstanding.
    pub in_flight: HashSet<i64>,
    pub creating: bool,
    pub loading_list: bool,

    // Errors and messages
    /// Shared error slot: the latest failure and when it was raised.
    pub error: Option<(TodoError, Instant)>,
    /// `None` keeps errors until dismissed.
    pub error_ttl: Option<Duration>,
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    // Input
    pub mode: Mode,
    pub new_todo_input: String,
    pub editor: Option<EditorState>,
    /// Index into the filtered list.
    pub selected: usize,

    // Presentation
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub spinner_frame: usize,
    /// Skip rendering when nothing changed.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(api: Arc<dyn TodoApi>, config: &Config) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!("{}", warning);
        }

        Self {
            api,
            owner_id: config.owner_id,
            store: TodoStore::new(),
            filter: config.initial_filter(),
            placeholder: None,
            in_flight: HashSet::new(),
            creating: false,
            loading_list: false,
            error: None,
            error_ttl: config.error_display(),
            status_message: None,
            mode: Mode::Browse,
            new_todo_input: String::new(),
            editor: None,
            selected: 0,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    /// True while any request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.creating || self.loading_list || !self.in_flight.is_empty()
    }

    /// Whether the row for `id` should show a loading overlay.
    pub fn is_busy(&self, id: i64) -> bool {
        self.in_flight.contains(&id)
    }

    pub fn visible_todos(&self) -> Cow<'_, [Todo]> {
        filter_todos(self.store.list(), self.filter)
    }

    pub fn visible_len(&self) -> usize {
        self.store
            .list()
            .iter()
            .filter(|t| self.filter.matches(t))
            .count()
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.store
            .list()
            .iter()
            .filter(|t| self.filter.matches(t))
            .nth(self.selected)
    }

    /// Keybinding context for the current input target.
    pub fn input_context(&self) -> Context {
        if self.editor.is_some() {
            Context::Editing
        } else if self.mode == Mode::Compose {
            Context::Compose
        } else {
            Context::List
        }
    }

    // ------------------------------------------------------------------------
    // Navigation and filter
    // ------------------------------------------------------------------------

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = self.selected.saturating_add(1).min(len - 1);
        }
    }

    /// Keep the selection inside the filtered list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }

    pub fn set_filter(&mut self, filter: Filter) {
        if self.filter != filter {
            tracing::debug!(filter = filter.label(), "Filter changed");
            self.filter = filter;
            self.selected = 0;
        }
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.filter.next());
    }

    // ------------------------------------------------------------------------
    // Errors and status
    // ------------------------------------------------------------------------

    /// Show `error` in the error line, replacing any current one.
    pub fn set_error(&mut self, error: TodoError) {
        tracing::debug!(error = %error, "Showing error");
        self.error = Some((error, Instant::now()));
        self.needs_redraw = true;
    }

    pub fn dismiss_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn current_error(&self) -> Option<TodoError> {
        self.error.map(|(e, _)| e)
    }

    /// Set status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Drop an expired status message and error.
    /// Returns true if anything was cleared.
    pub fn clear_expired(&mut self) -> bool {
        let mut cleared = false;

        if let Some((_, at)) = &self.status_message {
            if at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                cleared = true;
            }
        }

        if let (Some((_, at)), Some(ttl)) = (&self.error, self.error_ttl) {
            if at.elapsed() >= ttl {
                self.error = None;
                cleared = true;
            }
        }

        cleared
    }

    // ------------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------------

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle Dark → Light → Dark, returning the new theme name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }
}

// ============================================================================
// Tests
// ============================================================================
