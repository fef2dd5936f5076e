//! HTTP API module for the payroll engine.
//!
//! This module exposes the batch entry point (`POST /runs`) and a statement
//! lookup (`GET /statements/{period_id}/{run_type}/{employee_id}`).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::RunRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
