//! Public coach directory handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::PathId;
use crate::api::AppState;
use crate::config::MSG_INVALID_FIELDS;
use crate::domain::{Coach, CoachSummary, CourseListing, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, PaginationParams};

/// Name and role of the user behind a coach profile
#[derive(Debug, Serialize, ToSchema)]
pub struct CoachUserView {
    pub name: String,
    pub role: UserRole,
}

impl From<User> for CoachUserView {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CoachDetailResponse {
    pub user: CoachUserView,
    pub coach: Coach,
}

impl From<(User, Coach)> for CoachDetailResponse {
    fn from((user, coach): (User, Coach)) -> Self {
        Self {
            user: user.into(),
            coach,
        }
    }
}

/// Create coach directory routes
pub fn coach_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coaches))
        .route("/:coach_id", get(get_coach))
        .route("/:coach_id/courses", get(get_coach_courses))
}

/// List coaches, one page at a time
#[utoipa::path(
    get,
    path = "/api/coaches",
    tag = "Coaches",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of coaches", body = Vec<CoachSummary>),
        (status = 400, description = "Invalid paging parameters")
    )
)]
pub async fn list_coaches(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<ApiResponse<Vec<CoachSummary>>> {
    let Query(params) = query.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "bad paging query");
        AppError::validation(MSG_INVALID_FIELDS)
    })?;

    let coaches = state.coaches().list(params.validate()?).await?;
    Ok(ApiResponse::success(coaches))
}

/// Coach profile
#[utoipa::path(
    get,
    path = "/api/coaches/{coach_id}",
    tag = "Coaches",
    params(("coach_id" = Uuid, Path, description = "Coach id")),
    responses(
        (status = 200, description = "Coach and user", body = CoachDetailResponse),
        (status = 400, description = "Invalid or unknown coach")
    )
)]
pub async fn get_coach(
    State(state): State<AppState>,
    PathId(coach_id): PathId,
) -> AppResult<ApiResponse<CoachDetailResponse>> {
    let detail = state.coaches().detail(coach_id).await?;
    Ok(ApiResponse::success(detail.into()))
}

/// Courses offered by a coach
#[utoipa::path(
    get,
    path = "/api/coaches/{coach_id}/courses",
    tag = "Coaches",
    params(("coach_id" = Uuid, Path, description = "Coach id")),
    responses(
        (status = 200, description = "The coach's courses", body = Vec<CourseListing>),
        (status = 400, description = "Invalid or unknown coach")
    )
)]
pub async fn get_coach_courses(
    State(state): State<AppState>,
    PathId(coach_id): PathId,
) -> AppResult<ApiResponse<Vec<CourseListing>>> {
    let courses = state.coaches().courses(coach_id).await?;
    Ok(ApiResponse::success(courses))
}
