//! HTTP API for the workflow service.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/assignments` - Auto-assign tasks across a roster
//! - `POST /api/plans` - Generate a task plan from a project goal
//! - `POST /api/analytics/workload` - Summarize roster utilization

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
