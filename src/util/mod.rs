//! Utility functions shared by the API client and the UI.
//!
//! - **URL validation**: checks and normalizes the todos API base URL
//! - **Text processing**: sanitizing server-supplied titles and fitting them
//!   to terminal columns
//!
//! # Examples
//!
//! ```
//! use todoterm::util::{sanitize_for_display, truncate_to_width, validate_base_url};
//!
//! let base = validate_base_url("https://example.com/api").unwrap();
//! assert_eq!(base.path(), "/api/");
//!
//! assert_eq!(sanitize_for_display("buy\x1b[31m milk"), "buy milk");
//! assert_eq!(truncate_to_width("Write the quarterly report", 12), "Write the...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, sanitize_for_display, truncate_to_width};
pub use url_validator::{validate_base_url, UrlValidationError};
