//! Account handlers: signup, login, profile, password and the caller's
//! purchases and bookings.

use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{PurchaseRecord, User};
use crate::errors::AppResult;
use crate::services::BookingOverview;
use crate::types::{ApiResponse, Created};
use crate::validation::{RequestSchema, Rule, Schema};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// 2-10 letters or digits
    #[schema(example = "Lee")]
    pub name: String,
    #[schema(example = "lee@example.com")]
    pub email: String,
    /// 8-16 characters with a digit, a lowercase and an uppercase letter
    #[schema(example = "Passw0rd")]
    pub password: String,
}

impl RequestSchema for SignupRequest {
    const SCHEMA: Schema = &[
        ("name", Rule::UserName),
        ("email", Rule::Email),
        ("password", Rule::Password),
    ];
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "lee@example.com")]
    pub email: String,
    #[schema(example = "Passw0rd")]
    pub password: String,
}

impl RequestSchema for LoginRequest {
    const SCHEMA: Schema = &[("email", Rule::Email), ("password", Rule::Password)];
}

/// Display name change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenameRequest {
    #[schema(example = "Kim")]
    pub name: String,
}

impl RequestSchema for RenameRequest {
    const SCHEMA: Schema = &[("name", Rule::UserName)];
}

/// Password change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

impl RequestSchema for ChangePasswordRequest {
    const SCHEMA: Schema = &[
        ("password", Rule::Password),
        ("new_password", Rule::Password),
        ("confirm_new_password", Rule::Password),
    ];
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupUser {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub user: SignupUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUser {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

/// Create user routes
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
        .route("/credit-package", get(get_purchases))
        .route("/courses", get(get_bookings))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(protected)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = SignupResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already used")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<Created<SignupResponse>> {
    let user = state
        .auth()
        .signup(payload.name, payload.email, payload.password)
        .await?;

    Ok(Created(SignupResponse {
        user: SignupUser {
            id: user.id,
            name: user.name,
        },
    }))
}

/// Log in and get a JWT
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unknown email or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let result = state.auth().login(payload.email, payload.password).await?;

    Ok(ApiResponse::success(LoginResponse {
        token: result.token,
        user: LoginUser {
            name: result.user.name,
        },
    }))
}

/// Caller's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Email and name", body = ProfileResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let user = state.users().get_user(current_user.id).await?;
    Ok(ApiResponse::success(user.into()))
}

/// Change the caller's display name
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Name changed"),
        (status = 400, description = "Invalid or unchanged name"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RenameRequest>,
) -> AppResult<ApiResponse<()>> {
    state.users().rename(current_user.id, payload.name).await?;
    Ok(ApiResponse::ok())
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/users/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid, reused, mismatched or wrong password"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .users()
        .change_password(
            current_user.id,
            payload.password,
            payload.new_password,
            payload.confirm_new_password,
        )
        .await?;
    Ok(ApiResponse::ok())
}

/// Credit packages bought by the caller
#[utoipa::path(
    get,
    path = "/api/users/credit-package",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Purchase history", body = Vec<PurchaseRecord>),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_purchases(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<PurchaseRecord>>> {
    let purchases = state.users().purchase_history(current_user.id).await?;
    Ok(ApiResponse::success(purchases))
}

/// Caller's bookings and credit balance
#[utoipa::path(
    get,
    path = "/api/users/courses",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings and balance", body = BookingOverview),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn get_bookings(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<ApiResponse<BookingOverview>> {
    let overview = state.bookings().overview(current_user.id).await?;
    Ok(ApiResponse::success(overview))
}
