//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! selects between Dark and Light palettes and `StyleMap` resolves role
//! names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// Every semantic UI role of the todo screen mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub title: Style,
    pub input_text: Style,
    pub input_hint: Style,
    pub toggle_all_on: Style,
    pub toggle_all_off: Style,

    // -- List --
    pub todo_active: Style,
    pub todo_completed: Style,
    pub todo_selected: Style,
    pub todo_busy: Style,
    pub todo_placeholder: Style,
    pub checkbox: Style,
    pub editor: Style,

    // -- Footer --
    pub footer_count: Style,
    pub filter_normal: Style,
    pub filter_selected: Style,
    pub footer_hint: Style,

    // -- Chrome --
    pub error_line: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub help_key: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            input_text: Style::default().fg(Color::White),
            input_hint: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            toggle_all_on: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            toggle_all_off: Style::default().fg(Color::DarkGray),

            todo_active: Style::default(),
            todo_completed: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            todo_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            todo_busy: Style::default().fg(Color::Yellow),
            todo_placeholder: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            checkbox: Style::default().fg(Color::Green),
            editor: Style::default().fg(Color::Black).bg(Color::Cyan),

            footer_count: Style::default().fg(Color::Gray),
            filter_normal: Style::default().fg(Color::Gray),
            filter_selected: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            footer_hint: Style::default().fg(Color::DarkGray),

            error_line: Style::default().bg(Color::Red).fg(Color::White),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            help_key: Style::default().fg(Color::Yellow),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            input_text: Style::default().fg(Color::Black),
            input_hint: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            toggle_all_on: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            toggle_all_off: Style::default().fg(Color::Gray),

            todo_active: Style::default().fg(Color::Black),
            todo_completed: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::CROSSED_OUT),
            todo_selected: Style::default().bg(Color::Blue).fg(Color::White),
            todo_busy: Style::default().fg(Color::Magenta),
            todo_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            checkbox: Style::default().fg(Color::Blue),
            editor: Style::default().fg(Color::White).bg(Color::Blue),

            footer_count: Style::default().fg(Color::DarkGray),
            filter_normal: Style::default().fg(Color::DarkGray),
            filter_selected: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            footer_hint: Style::default().fg(Color::Gray),

            error_line: Style::default().bg(Color::Red).fg(Color::White),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            help_key: Style::default().fg(Color::Magenta),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 21] = [
    "title",
    "input_text",
    "input_hint",
    "toggle_all_on",
    "toggle_all_off",
    "todo_active",
    "todo_completed",
    "todo_selected",
    "todo_busy",
    "todo_placeholder",
    "checkbox",
    "editor",
    "footer_count",
    "filter_normal",
    "filter_selected",
    "footer_hint",
    "error_line",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "help_key",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 21] = [
            p.title,
            p.input_text,
            p.input_hint,
            p.toggle_all_on,
            p.toggle_all_off,
            p.todo_active,
            p.todo_completed,
            p.todo_selected,
            p.todo_busy,
            p.todo_placeholder,
            p.checkbox,
            p.editor,
            p.footer_count,
            p.filter_normal,
            p.filter_selected,
            p.footer_hint,
            p.error_line,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.help_key,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
