//! API Handlers
//!
//! HTTP request handlers for each endpoint. Data endpoints validate their
//! arguments, then hand off to the response cache with an upstream fetch.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Method, Uri},
    response::Response,
    Json,
};
use tracing::info;

use crate::cache::{CacheStore, RequestDescriptor, ResponseCache};
use crate::config::{Config, TtlPolicy};
use crate::error::{ApiError, Result};
use crate::models::{
    CoursesArgs, HealthResponse, InstructorArgs, QueryPairs, SectionsArgs, StatsResponse,
};
use crate::upstream::query::{
    courses_params, departments_params, instructors_params, sections_params,
    ACTIVE_INSTRUCTORS_TABLE, COURSES_TABLE, DEPARTMENTS_TABLE, INSTRUCTORS_TABLE, SECTIONS_TABLE,
};
use crate::upstream::{Params, RestClient, Upstream};

/// Raw query pairs with repeated keys preserved.
type QueryList = Query<Vec<(String, String)>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Response cache over the shared store
    pub cache: ResponseCache,
    /// Backend queried on cache misses
    pub upstream: Arc<dyn Upstream>,
    /// Cache lifetime per resource class
    pub ttl: TtlPolicy,
}

impl AppState {
    /// Creates a new AppState around the given store and upstream.
    pub fn new(store: CacheStore, upstream: Arc<dyn Upstream>, ttl: TtlPolicy) -> Self {
        Self {
            cache: ResponseCache::new(Arc::new(store)),
            upstream,
            ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::new(config.cache_capacity)
            .with_max_entry_bytes(config.cache_max_entry_bytes);
        let upstream = Arc::new(RestClient::new(&config.database_url, &config.database_key));
        Self::new(store, upstream, config.ttl)
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        self.cache.store()
    }
}

// == Shared Plumbing ==
fn log_invalid<T>(uri: &Uri, parsed: Result<T>) -> Result<T> {
    parsed.map_err(|err| {
        info!("Received GET {} with invalid arguments: {}", uri.path(), err);
        err
    })
}

/// Serves `table` through the cache, querying upstream only on a miss.
async fn serve_table(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    table: &'static str,
    params: Params,
    ttl: Duration,
) -> Result<Response> {
    let request = RequestDescriptor::from_parts(method, uri);
    let upstream = Arc::clone(&state.upstream);
    let mut response = Response::new(Body::empty());

    state
        .cache
        .serve(&request, ttl, &mut response, move || async move {
            upstream.query(table, &params).await
        })
        .await?;

    Ok(response)
}

async fn serve_courses(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    pairs: &[(String, String)],
    columns: &[&str],
    ttl: Duration,
) -> Result<Response> {
    let args = log_invalid(uri, CoursesArgs::from_query(QueryPairs::new(pairs)))?;
    let params = courses_params(&args, columns);
    serve_table(state, method, uri, COURSES_TABLE, params, ttl).await
}

async fn serve_instructors(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    pairs: &[(String, String)],
    table: &'static str,
) -> Result<Response> {
    let args = log_invalid(uri, InstructorArgs::from_query(QueryPairs::new(pairs)))?;
    let params = instructors_params(&args);
    serve_table(state, method, uri, table, params, state.ttl.instructors).await
}

// == Data Endpoints ==

/// Handler for GET /v0
pub async fn welcome_handler() -> &'static str {
    "Welcome to the Jupiterp API!"
}

/// Handler for GET /v0/courses
///
/// Full course rows without sections.
pub async fn courses_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    serve_courses(&state, &method, &uri, &pairs, &["*"], state.ttl.courses).await
}

/// Handler for GET /v0/courses/minified
///
/// Only course code and name.
pub async fn minified_courses_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    let columns = ["course_code", "name"];
    serve_courses(&state, &method, &uri, &pairs, &columns, state.ttl.courses).await
}

/// Handler for GET /v0/courses/withSections
///
/// Course rows with their sections embedded; cached on the section TTL
/// since seat counts change often.
pub async fn courses_with_sections_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    let columns = ["*", "sections(*)"];
    serve_courses(&state, &method, &uri, &pairs, &columns, state.ttl.sections).await
}

/// Handler for GET /v0/sections
pub async fn sections_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    let args = log_invalid(&uri, SectionsArgs::from_query(QueryPairs::new(&pairs)))?;
    let params = sections_params(&args);
    serve_table(&state, &method, &uri, SECTIONS_TABLE, params, state.ttl.sections).await
}

/// Handler for GET /v0/instructors
pub async fn instructors_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    serve_instructors(&state, &method, &uri, &pairs, INSTRUCTORS_TABLE).await
}

/// Handler for GET /v0/instructors/active
///
/// Instructors currently teaching at least one section.
pub async fn active_instructors_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): QueryList,
) -> Result<Response> {
    serve_instructors(&state, &method, &uri, &pairs, ACTIVE_INSTRUCTORS_TABLE).await
}

/// Handler for GET /v0/deptList
pub async fn departments_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response> {
    let ttl = state.ttl.departments;
    serve_table(&state, &method, &uri, DEPARTMENTS_TABLE, departments_params(), ttl).await
}

// == Service Endpoints ==

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store();
    Json(StatsResponse::new(
        store.is_enabled(),
        store.capacity(),
        &store.stats(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fallback for unknown routes.
pub async fn not_found_handler(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
