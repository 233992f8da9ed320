//! Skill catalog handlers.

use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{PathId, ValidatedJson};
use crate::api::AppState;
use crate::domain::Skill;
use crate::errors::AppResult;
use crate::types::ApiResponse;
use crate::validation::{RequestSchema, Rule, Schema};

/// Skill creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSkillRequest {
    #[validate(length(max = 50, message = "Skill name is too long"))]
    #[schema(example = "Yoga")]
    pub name: String,
}

impl RequestSchema for CreateSkillRequest {
    const SCHEMA: Schema = &[("name", Rule::String)];
}

/// Create skill routes
pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_skills).post(create_skill))
        .route("/:skill_id", delete(delete_skill))
}

/// List skills
#[utoipa::path(
    get,
    path = "/api/coaches/skill",
    tag = "Skills",
    responses((status = 200, description = "Every skill", body = Vec<Skill>))
)]
pub async fn list_skills(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Skill>>> {
    let skills = state.skills().list().await?;
    Ok(ApiResponse::success(skills))
}

/// Create a skill
#[utoipa::path(
    post,
    path = "/api/coaches/skill",
    tag = "Skills",
    request_body = CreateSkillRequest,
    responses(
        (status = 200, description = "Skill created", body = Skill),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Skill already exists")
    )
)]
pub async fn create_skill(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateSkillRequest>,
) -> AppResult<ApiResponse<Skill>> {
    let skill = state.skills().create(payload.name).await?;
    Ok(ApiResponse::success(skill))
}

/// Delete a skill
#[utoipa::path(
    delete,
    path = "/api/coaches/skill/{skill_id}",
    tag = "Skills",
    params(("skill_id" = Uuid, Path, description = "Skill id")),
    responses(
        (status = 200, description = "Skill deleted"),
        (status = 400, description = "Invalid or unknown skill"),
        (status = 409, description = "Skill is used by a course")
    )
)]
pub async fn delete_skill(
    State(state): State<AppState>,
    PathId(skill_id): PathId,
) -> AppResult<ApiResponse<()>> {
    state.skills().delete(skill_id).await?;
    Ok(ApiResponse::ok())
}
