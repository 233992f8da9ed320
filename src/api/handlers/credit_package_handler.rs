//! Credit package catalog handlers.

use axum::{
    extract::State,
    middleware,
    routing::{delete, get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{PathId, ValidatedJson};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::CreditPackage;
use crate::errors::AppResult;
use crate::types::ApiResponse;
use crate::validation::{RequestSchema, Rule, Schema};

/// Credit package creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCreditPackageRequest {
    #[schema(example = "7 lessons")]
    pub name: String,
    #[schema(example = 7)]
    pub credit_amount: i32,
    #[schema(example = 1400)]
    pub price: i32,
}

impl RequestSchema for CreateCreditPackageRequest {
    const SCHEMA: Schema = &[
        ("name", Rule::String),
        ("credit_amount", Rule::Integer),
        ("price", Rule::Integer),
    ];
}

/// Create credit package routes
pub fn credit_package_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/:credit_package_id", post(buy_package))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(list_packages).post(create_package))
        .route("/:credit_package_id", delete(delete_package))
        .merge(protected)
}

/// List credit packages
#[utoipa::path(
    get,
    path = "/api/credit-package",
    tag = "Credit packages",
    responses((status = 200, description = "Every package", body = Vec<CreditPackage>))
)]
pub async fn list_packages(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CreditPackage>>> {
    let packages = state.credit_packages().list().await?;
    Ok(ApiResponse::success(packages))
}

/// Create a credit package
#[utoipa::path(
    post,
    path = "/api/credit-package",
    tag = "Credit packages",
    request_body = CreateCreditPackageRequest,
    responses(
        (status = 200, description = "Package created", body = CreditPackage),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Package name already used")
    )
)]
pub async fn create_package(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCreditPackageRequest>,
) -> AppResult<ApiResponse<CreditPackage>> {
    let package = state
        .credit_packages()
        .create(payload.name, payload.credit_amount, payload.price)
        .await?;
    Ok(ApiResponse::success(package))
}

/// Buy a credit package
#[utoipa::path(
    post,
    path = "/api/credit-package/{credit_package_id}",
    tag = "Credit packages",
    params(("credit_package_id" = Uuid, Path, description = "Package id")),
    responses(
        (status = 200, description = "Package bought"),
        (status = 400, description = "Invalid or unknown package"),
        (status = 401, description = "Not logged in"),
        (status = 409, description = "Package already bought")
    ),
    security(("bearer_auth" = []))
)]
pub async fn buy_package(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    PathId(package_id): PathId,
) -> AppResult<ApiResponse<()>> {
    state.credit_packages().buy(user.id, package_id).await?;
    Ok(ApiResponse::ok())
}

/// Delete a credit package
#[utoipa::path(
    delete,
    path = "/api/credit-package/{credit_package_id}",
    tag = "Credit packages",
    params(("credit_package_id" = Uuid, Path, description = "Package id")),
    responses(
        (status = 200, description = "Package deleted"),
        (status = 400, description = "Invalid or unknown package"),
        (status = 409, description = "Package has purchases")
    )
)]
pub async fn delete_package(
    State(state): State<AppState>,
    PathId(package_id): PathId,
) -> AppResult<ApiResponse<()>> {
    state.credit_packages().delete(package_id).await?;
    Ok(ApiResponse::ok())
}
