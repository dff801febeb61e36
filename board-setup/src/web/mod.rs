//! Web host for the setup and options flows.
//!
//! Serves each flow step as an HTML form or as JSON, depending on the
//! request's `Accept` header.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
