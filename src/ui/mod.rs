//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input dispatch to app flows
//! - `render` - Layout and overlay rendering
//! - `header` - New-todo input and toggle-all indicator
//! - `list` - Todo rows, placeholder and inline editor
//! - `footer` - Active count, filter selector, clear-completed hint
//! - `status` - Error line and status bar
//! - `help` - Keybinding overlay

mod footer;
mod header;
mod help;
mod input;
mod list;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
