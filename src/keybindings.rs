//! Keybinding registry: maps actions to key events, with config overrides.
//!
//! Bindings are data, keyed by the input context they apply in, so the same
//! key can mean different things in the list and in a text field.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    ToggleTodo,
    DeleteTodo,
    EditTodo,
    NewTodo,
    ToggleAll,
    ClearCompleted,
    CycleFilter,
    FilterAll,
    FilterActive,
    FilterCompleted,
    Reload,
    DismissError,
    CycleTheme,
    ShowHelp,
    Submit,
    Cancel,
    CommitEdit,
    CancelEdit,
    Blur,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Select next todo",
            Self::NavUp => "Select previous todo",
            Self::ToggleTodo => "Toggle completed",
            Self::DeleteTodo => "Delete todo",
            Self::EditTodo => "Edit title",
            Self::NewTodo => "New todo",
            Self::ToggleAll => "Toggle all todos",
            Self::ClearCompleted => "Clear completed",
            Self::CycleFilter => "Cycle filter",
            Self::FilterAll => "Show all",
            Self::FilterActive => "Show active",
            Self::FilterCompleted => "Show completed",
            Self::Reload => "Reload from server",
            Self::DismissError => "Dismiss error",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::Submit => "Add todo",
            Self::Cancel => "Leave input",
            Self::CommitEdit => "Save title",
            Self::CancelEdit => "Discard edit",
            Self::Blur => "Save and move on",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context; determines which bindings are active.
///
/// `Compose` and `Editing` are text contexts: unbound printable keys there are
/// typed into the field instead of falling back to `Global`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    Compose,
    Editing,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::List => "List",
            Self::Compose => "New todo",
            Self::Editing => "Editing",
        }
    }

    fn is_text_input(self) -> bool {
        matches!(self, Self::Compose | Self::Editing)
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "x", "?"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Backspace", "Space", "Delete"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// Lookup is a single HashMap probe per context tried.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        let defaults = [
            // Available everywhere outside text fields
            (Global, KeySpec::ch('q'), Quit),
            (Global, KeySpec::ctrl('c'), Quit),
            (Global, KeySpec::ch('j'), NavDown),
            (Global, KeySpec::plain(KeyCode::Down), NavDown),
            (Global, KeySpec::ch('k'), NavUp),
            (Global, KeySpec::plain(KeyCode::Up), NavUp),
            (Global, KeySpec::ch('T'), CycleTheme),
            (Global, KeySpec::ch('?'), ShowHelp),
            // Todo list
            (List, KeySpec::ch(' '), ToggleTodo),
            (List, KeySpec::ch('x'), ToggleTodo),
            (List, KeySpec::ch('d'), DeleteTodo),
            (List, KeySpec::plain(KeyCode::Delete), DeleteTodo),
            (List, KeySpec::ch('e'), EditTodo),
            (List, KeySpec::plain(KeyCode::Enter), EditTodo),
            (List, KeySpec::ch('n'), NewTodo),
            (List, KeySpec::ch('i'), NewTodo),
            (List, KeySpec::ch('A'), ToggleAll),
            (List, KeySpec::ch('C'), ClearCompleted),
            (List, KeySpec::ch('f'), CycleFilter),
            (List, KeySpec::plain(KeyCode::Tab), CycleFilter),
            (List, KeySpec::ch('1'), FilterAll),
            (List, KeySpec::ch('2'), FilterActive),
            (List, KeySpec::ch('3'), FilterCompleted),
            (List, KeySpec::ch('r'), Reload),
            (List, KeySpec::plain(KeyCode::Esc), DismissError),
            // New todo input
            (Compose, KeySpec::plain(KeyCode::Enter), Submit),
            (Compose, KeySpec::plain(KeyCode::Esc), Cancel),
            (Compose, KeySpec::ctrl('c'), Quit),
            // Inline title editor
            (Editing, KeySpec::plain(KeyCode::Enter), CommitEdit),
            (Editing, KeySpec::plain(KeyCode::Esc), CancelEdit),
            (Editing, KeySpec::plain(KeyCode::Tab), Blur),
            (Editing, KeySpec::plain(KeyCode::Up), Blur),
            (Editing, KeySpec::plain(KeyCode::Down), Blur),
            (Editing, KeySpec::ctrl('c'), Quit),
        ];

        for (context, key, action) in defaults {
            self.bind(context, key, action);
        }
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "toggle_all").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            // Re-bind in the same contexts with the new key
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Non-text contexts fall back to `Global`. Text contexts only see their
    /// own bindings, so ordinary characters reach the input field.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global && !context.is_text_input() {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// First key bound to `action` in `context`, formatted for display hints.
    pub fn key_hint(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "toggle_todo" | "toggle" | "complete" => Some(Action::ToggleTodo),
        "delete_todo" | "delete" => Some(Action::DeleteTodo),
        "edit_todo" | "edit" | "rename" => Some(Action::EditTodo),
        "new_todo" | "new" | "add" => Some(Action::NewTodo),
        "toggle_all" | "toggleall" => Some(Action::ToggleAll),
        "clear_completed" | "clearcompleted" => Some(Action::ClearCompleted),
        "cycle_filter" | "cyclefilter" | "filter" => Some(Action::CycleFilter),
        "filter_all" | "show_all" => Some(Action::FilterAll),
        "filter_active" | "show_active" => Some(Action::FilterActive),
        "filter_completed" | "show_completed" => Some(Action::FilterCompleted),
        "reload" | "refresh" => Some(Action::Reload),
        "dismiss_error" | "dismiss" => Some(Action::DismissError),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        "submit" => Some(Action::Submit),
        "cancel" => Some(Action::Cancel),
        "commit_edit" | "save" => Some(Action::CommitEdit),
        "cancel_edit" => Some(Action::CancelEdit),
        "blur" => Some(Action::Blur),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
