//! API Module
//!
//! HTTP handlers and routing for the course data API.
//!
//! Every `/v0` data endpoint answers through the response cache; `/stats`
//! and `/health` are served directly.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
