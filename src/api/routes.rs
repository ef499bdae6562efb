//! API Routes
//!
//! Configures the Axum router with the data and service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    active_instructors_handler, courses_handler, courses_with_sections_handler,
    departments_handler, health_handler, instructors_handler, minified_courses_handler,
    not_found_handler, sections_handler, stats_handler, welcome_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /v0` - Welcome text
/// - `GET /v0/courses` - Courses
/// - `GET /v0/courses/minified` - Course codes and names only
/// - `GET /v0/courses/withSections` - Courses with embedded sections
/// - `GET /v0/sections` - Sections
/// - `GET /v0/instructors` - Instructors
/// - `GET /v0/instructors/active` - Instructors with current sections
/// - `GET /v0/deptList` - Departments
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v0", get(welcome_handler))
        .route("/v0/courses", get(courses_handler))
        .route("/v0/courses/minified", get(minified_courses_handler))
        .route("/v0/courses/withSections", get(courses_with_sections_handler))
        .route("/v0/sections", get(sections_handler))
        .route("/v0/instructors", get(instructors_handler))
        .route("/v0/instructors/active", get(active_instructors_handler))
        .route("/v0/deptList", get(departments_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
