//! Terminal client for a REST todos API.
//!
//! The binary wires [`config::Config`], an [`api::HttpTodoApi`] and the
//! [`app::App`] controller into the [`ui`] event loop. The library is split
//! out so integration tests can drive the controller against their own
//! [`api::TodoApi`].

pub mod api;
pub mod app;
pub mod config;
pub mod filter;
pub mod keybindings;
pub mod store;
pub mod theme;
pub mod todo;
pub mod ui;
pub mod util;
