//! Web layer for the bus journey finder.
//!
//! Serves the search, listing and detail pages plus a small JSON API for
//! stop autocomplete and schedules.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
