//! Coach administration handlers: promotion, the caller's coach profile,
//! their courses and revenue.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::coach_handler::CoachDetailResponse;
use crate::api::extractors::{PathId, ValidatedJson};
use crate::api::middleware::{auth_middleware, require_coach, CurrentUser};
use crate::api::AppState;
use crate::config::MSG_INVALID_FIELDS;
use crate::domain::{
    current_year, month_from_name, CoachProfileDraft, Course, CourseDraft, MonthlyRevenue,
};
use crate::errors::{AppError, AppResult};
use crate::services::{CoachProfile, OwnCourse, OwnCourseDetail};
use crate::types::{ApiResponse, Created};
use crate::validation::{RequestSchema, Rule, Schema};

/// Promotion of a user to coach
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PromoteRequest {
    #[schema(example = 3)]
    pub experience_years: i32,
    #[schema(example = "Certified yoga teacher")]
    pub description: String,
    /// `.jpg` or `.png` image
    pub profile_image_url: Option<String>,
}

impl RequestSchema for PromoteRequest {
    const SCHEMA: Schema = &[
        ("experience_years", Rule::Integer),
        ("description", Rule::String),
        ("profile_image_url", Rule::Optional(&Rule::ImageUrl)),
    ];
}

impl From<PromoteRequest> for CoachProfileDraft {
    fn from(req: PromoteRequest) -> Self {
        Self {
            experience_years: req.experience_years,
            description: req.description,
            profile_image_url: req.profile_image_url,
        }
    }
}

/// Replacement of the caller's coach profile and skill set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCoachProfileRequest {
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: String,
    #[validate(length(min = 1, message = "At least one skill is required"))]
    pub skill_ids: Vec<Uuid>,
}

impl RequestSchema for UpdateCoachProfileRequest {
    const SCHEMA: Schema = &[
        ("experience_years", Rule::Integer),
        ("description", Rule::String),
        ("profile_image_url", Rule::HttpsUrl),
        ("skill_ids", Rule::UuidList),
    ];
}

/// New course, owned by `user_id`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    #[validate(nested)]
    pub course: CourseFields,
}

impl RequestSchema for CreateCourseRequest {
    const SCHEMA: Schema = &[
        ("user_id", Rule::Uuid),
        ("skill_id", Rule::Uuid),
        ("name", Rule::String),
        ("description", Rule::String),
        ("start_at", Rule::String),
        ("end_at", Rule::String),
        ("max_participants", Rule::Integer),
        ("meeting_url", Rule::HttpsUrl),
    ];
}

/// Editable course fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CourseFields {
    pub skill_id: Uuid,
    #[validate(length(max = 100, message = "Course name is too long"))]
    #[schema(example = "Morning yoga")]
    pub name: String,
    pub description: String,
    /// RFC 3339 timestamp
    #[schema(example = "2025-03-01T09:00:00Z")]
    pub start_at: DateTime<Utc>,
    #[schema(example = "2025-03-01T10:00:00Z")]
    pub end_at: DateTime<Utc>,
    #[schema(example = 10)]
    pub max_participants: i32,
    #[schema(example = "https://meet.example.com/yoga")]
    pub meeting_url: String,
}

impl RequestSchema for CourseFields {
    const SCHEMA: Schema = &[
        ("skill_id", Rule::Uuid),
        ("name", Rule::String),
        ("description", Rule::String),
        ("start_at", Rule::String),
        ("end_at", Rule::String),
        ("max_participants", Rule::Integer),
        ("meeting_url", Rule::HttpsUrl),
    ];
}

impl From<CourseFields> for CourseDraft {
    fn from(fields: CourseFields) -> Self {
        Self {
            skill_id: fields.skill_id,
            name: fields.name,
            description: fields.description,
            start_at: fields.start_at,
            end_at: fields.end_at,
            max_participants: fields.max_participants,
            meeting_url: fields.meeting_url,
        }
    }
}

/// `?month=<english month name>&year=<yyyy>`; the year defaults to the current one
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueQuery {
    #[param(example = "march")]
    pub month: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub course: Course,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueResponse {
    pub total: MonthlyRevenue,
}

/// Create coach administration routes
pub fn admin_routes(state: AppState) -> Router<AppState> {
    let coach_only = Router::new()
        .route("/coaches", get(get_coach_profile).put(update_coach_profile))
        .route("/coaches/courses", get(list_own_courses).post(create_course))
        .route(
            "/coaches/courses/:course_id",
            get(get_own_course).put(update_own_course),
        )
        .route("/coaches/revenue", get(get_revenue))
        .route_layer(middleware::from_fn(require_coach))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/coaches/:user_id", post(promote_to_coach))
        .merge(coach_only)
}

/// Promote a user to coach
#[utoipa::path(
    post,
    path = "/api/admin/coaches/{user_id}",
    tag = "Admin",
    params(("user_id" = Uuid, Path, description = "User to promote")),
    request_body = PromoteRequest,
    responses(
        (status = 201, description = "User promoted", body = CoachDetailResponse),
        (status = 400, description = "Invalid fields or unknown user"),
        (status = 409, description = "User is already a coach")
    )
)]
pub async fn promote_to_coach(
    State(state): State<AppState>,
    PathId(user_id): PathId,
    ValidatedJson(payload): ValidatedJson<PromoteRequest>,
) -> AppResult<Created<CoachDetailResponse>> {
    let promoted = state.coaches().promote(user_id, payload.into()).await?;
    Ok(Created(promoted.into()))
}

/// The caller's coach profile
#[utoipa::path(
    get,
    path = "/api/admin/coaches",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Coach profile", body = CoachProfile),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn get_coach_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<CoachProfile>> {
    let profile = state.coaches().profile(current_user.id).await?;
    Ok(ApiResponse::success(profile))
}

/// Update the caller's coach profile and skills
#[utoipa::path(
    put,
    path = "/api/admin/coaches",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = UpdateCoachProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = CoachProfile),
        (status = 400, description = "Invalid fields or unknown skill"),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn update_coach_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateCoachProfileRequest>,
) -> AppResult<ApiResponse<CoachProfile>> {
    let draft = CoachProfileDraft {
        experience_years: payload.experience_years,
        description: payload.description,
        profile_image_url: Some(payload.profile_image_url),
    };

    let profile = state
        .coaches()
        .update_profile(current_user.id, draft, payload.skill_ids)
        .await?;
    Ok(ApiResponse::success(profile))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/admin/coaches/courses",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid fields, unknown user or skill"),
        (status = 401, description = "Not logged in or not a coach"),
        (status = 409, description = "Owner is not a coach")
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<Created<CourseResponse>> {
    let course = state
        .courses()
        .create(payload.user_id, payload.course.into())
        .await?;
    Ok(Created(CourseResponse { course }))
}

/// The caller's courses
#[utoipa::path(
    get,
    path = "/api/admin/coaches/courses",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own courses with status and participants", body = Vec<OwnCourse>),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn list_own_courses(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<OwnCourse>>> {
    let courses = state.courses().list_own(current_user.id).await?;
    Ok(ApiResponse::success(courses))
}

/// One of the caller's courses
#[utoipa::path(
    get,
    path = "/api/admin/coaches/courses/{course_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("course_id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course detail", body = OwnCourseDetail),
        (status = 400, description = "Invalid id or course not owned"),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn get_own_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PathId(course_id): PathId,
) -> AppResult<ApiResponse<OwnCourseDetail>> {
    let course = state.courses().own_detail(current_user.id, course_id).await?;
    Ok(ApiResponse::success(course))
}

/// Update one of the caller's courses
#[utoipa::path(
    put,
    path = "/api/admin/coaches/courses/{course_id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("course_id" = Uuid, Path, description = "Course id")),
    request_body = CourseFields,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid fields, course not owned or capacity below bookings"),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn update_own_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PathId(course_id): PathId,
    ValidatedJson(payload): ValidatedJson<CourseFields>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state
        .courses()
        .update_own(current_user.id, course_id, payload.into())
        .await?;
    Ok(ApiResponse::success(CourseResponse { course }))
}

/// The caller's revenue for one month
#[utoipa::path(
    get,
    path = "/api/admin/coaches/revenue",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(RevenueQuery),
    responses(
        (status = 200, description = "Monthly totals", body = RevenueResponse),
        (status = 400, description = "Missing or unknown month"),
        (status = 401, description = "Not logged in or not a coach")
    )
)]
pub async fn get_revenue(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    query: Result<Query<RevenueQuery>, QueryRejection>,
) -> AppResult<ApiResponse<RevenueResponse>> {
    let Query(query) = query.map_err(|_| AppError::validation(MSG_INVALID_FIELDS))?;

    let month = query
        .month
        .as_deref()
        .and_then(month_from_name)
        .ok_or_else(|| {
            tracing::warn!(month = ?query.month, "revenue asked for an unknown month");
            AppError::validation(MSG_INVALID_FIELDS)
        })?;
    let year = query.year.unwrap_or_else(current_year);

    let total = state
        .bookings()
        .coach_monthly_revenue(current_user.id, year, month)
        .await?;
    Ok(ApiResponse::success(RevenueResponse { total }))
}
