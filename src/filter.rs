//! Status filter for the todo list.

use crate::todo::Todo;
use std::borrow::Cow;

/// Which todos the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// All filters in footer display order.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Parse a filter name (case-insensitive), as used in config.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Cycle All → Active → Completed → All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether `todo` passes this filter.
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

/// Select the todos visible under `filter`, preserving order.
///
/// `Filter::All` borrows the input untouched; the other filters allocate the
/// matching subsequence.
pub fn filter_todos(todos: &[Todo], filter: Filter) -> Cow<'_, [Todo]> {
    match filter {
        Filter::All => Cow::Borrowed(todos),
        _ => Cow::Owned(todos.iter().filter(|t| filter.matches(t)).cloned().collect()),
    }
}
