//! Application route configuration.

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use super::handlers::{
    admin_routes, coach_routes, course_routes, credit_package_routes, skill_routes, user_routes,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::{AppError, AppResult};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/credit-package", credit_package_routes(state.clone()))
        .nest("/api/coaches/skill", skill_routes())
        .nest("/api/coaches", coach_routes())
        .nest("/api/courses", course_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .fallback(route_not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe, also checks the database answers
async fn healthcheck(State(state): State<AppState>) -> AppResult<&'static str> {
    state.database.ping().await?;
    Ok("OK")
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
