//! Course listing and booking handlers.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Router,
};

use crate::api::extractors::PathId;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::CourseListing;
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Create course routes; booking and cancelling need a logged in caller
pub fn course_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:course_id", post(book_course).delete(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_courses))
        .merge(protected)
}

/// List every course
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    responses((status = 200, description = "Every course", body = Vec<CourseListing>))
)]
pub async fn list_courses(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CourseListing>>> {
    let courses = state.courses().list_all().await?;
    Ok(ApiResponse::success(courses))
}

/// Book a seat on a course
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}",
    tag = "Courses",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course booked"),
        (status = 400, description = "Unknown course, already booked, no credit or course full"),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn book_course(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    PathId(course_id): PathId,
) -> AppResult<ApiResponse<()>> {
    state.bookings().book(user.id, course_id).await?;
    Ok(ApiResponse::ok())
}

/// Cancel the caller's booking on a course
#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    tag = "Courses",
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 400, description = "No active booking on this course"),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    PathId(course_id): PathId,
) -> AppResult<ApiResponse<()>> {
    state.bookings().cancel(user.id, course_id).await?;
    Ok(ApiResponse::ok())
}
