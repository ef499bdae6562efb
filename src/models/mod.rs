//! Request and Response models for the API
//!
//! Query argument parsing for the data endpoints and the JSON bodies of the
//! service endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CoursesArgs, InstructorArgs, QueryPairs, SectionsArgs};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
