//! JWT authentication and role middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Message for a caller who is not a coach
pub const MSG_NOT_COACH: &str = "Permission denied";

/// Authenticated caller, re-read from the store on every request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

/// JWT authentication middleware.
///
/// Validates the bearer token, then loads the user it names so that a role
/// change since issuance is seen immediately. The caller is injected into the
/// request extensions as `CurrentUser`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .ok_or(AppError::Unauthorized)?;

        state.auth().verify_token(token)?
    };

    let user = match state.users().get_user(claims.sub).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            tracing::warn!(user_id = %claims.sub, "token names a missing user");
            return Err(AppError::InvalidToken);
        }
        Err(e) => return Err(e),
    };

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        name: user.name,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Only lets COACH callers through. Must run after `auth_middleware`.
pub async fn require_coach(request: Request, next: Next) -> Result<Response, AppError> {
    let is_coach = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.role.is_coach())
        .ok_or(AppError::Unauthorized)?;

    if !is_coach {
        return Err(AppError::forbidden(MSG_NOT_COACH));
    }

    Ok(next.run(request).await)
}
