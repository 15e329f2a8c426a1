//! Web dashboard served at `/`
//!
//! The page and its assets are embedded in the binary. The page polls
//! `/api/widgets` for statistics and `/api/services` for bookmark links.

pub mod handler;

pub use handler::{assets_handler, dashboard_handler};
