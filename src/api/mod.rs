//! HTTP API for the preflight engine.
//!
//! Exposes `POST /evaluate`, which runs the same validation and rules as the
//! command line against a JSON batch, using the configuration loaded at
//! startup.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::EvaluationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
