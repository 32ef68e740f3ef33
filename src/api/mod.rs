//! REST client for the todos resource.
//!
//! - [`TodoApi`] - async trait the controller programs against
//! - [`HttpTodoApi`] - reqwest implementation talking to the real server
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request                        | Response        |
//! |-----------|--------------------------------|-----------------|
//! | list      | `GET todos?ownerId=<id>`       | `[Todo]`        |
//! | create    | `POST todos`                   | created `Todo`  |
//! | remove    | `DELETE todos/<id>`            | ignored         |
//! | patch     | `PATCH todos/<id>`             | ignored         |

mod client;

pub use client::{ApiError, HttpTodoApi, TodoApi};
