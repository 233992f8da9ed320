//! Authentication service - sign-up, login and session tokens.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only orchestrates lookups and token issuance.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Hash compared against when the e-mail is unknown, so a miss costs the
/// same as a wrong password.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    Password::new("Dummy0Password")
        .map(Password::into_string)
        .unwrap_or_default()
});

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }
}

/// Successful login: the session token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new USER account
    async fn signup(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<LoginResult>;

    /// Sign a token carrying the user's id and role
    fn issue_token(&self, user: &User) -> AppResult<String>;

    /// Verify a token; expiry is reported separately from other failures
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

/// Sign claims for `user` valid for `expires_days`.
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.jwt_expires_days);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn signup(&self, name: String, email: String, password: String) -> AppResult<User> {
        if self.uow.users().find_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "signup rejected: e-mail already registered");
            return Err(AppError::conflict("Email is already in use"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(name, email, password_hash)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict("Email is already in use")
                } else {
                    e
                }
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<LoginResult> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify even when the account is missing so both paths cost the same
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => DUMMY_HASH.clone(),
        };
        let password_valid = Password::from_hash(hash).verify(&password);

        match user {
            Some(user) if password_valid => {
                let token = generate_token(&user, &self.config)?;
                Ok(LoginResult { token, user })
            }
            _ => {
                tracing::warn!(email = %email, "login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        generate_token(user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::TestUnitOfWork;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn user_with_password(plain: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password_hash: Password::new(plain).unwrap().into_string(),
            role: UserRole::Coach,
            created_at: now,
            updated_at: now,
        }
    }

    fn authenticator(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::builder().users(users).build();
        Authenticator::new(Arc::new(uow), Config::new("sqlite::memory:", SECRET))
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let auth = authenticator(MockUserRepository::new());
        let user = user_with_password("Passw0rd");

        let token = auth.issue_token(&user).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role(), UserRole::Coach);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 3600);
    }

    #[tokio::test]
    async fn test_expired_token_is_distinguished() {
        let auth = authenticator(MockUserRepository::new());
        let past = Utc::now() - Duration::days(2);
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "USER".to_string(),
            iat: past.timestamp(),
            exp: (past + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(auth.verify_token(&token), Err(AppError::TokenExpired)));
        assert!(matches!(auth.verify_token("garbage"), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_invalid() {
        let auth = authenticator(MockUserRepository::new());
        let user = user_with_password("Passw0rd");
        let other = Config::new("sqlite::memory:", "another-secret-key-that-is-32-chars-long");
        let token = generate_token(&user, &other).unwrap();

        assert!(matches!(auth.verify_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let user = user_with_password("Passw0rd");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator(repo)
            .login("lee@example.com".to_string(), "Wr0ngPassword".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_with_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = authenticator(repo)
            .login("nobody@example.com".to_string(), "Passw0rd".to_string())
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let user = user_with_password("Passw0rd");
        let id = user.id;
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(repo);
        let result = auth
            .login("lee@example.com".to_string(), "Passw0rd".to_string())
            .await
            .unwrap();

        assert_eq!(result.user.id, id);
        assert_eq!(auth.verify_token(&result.token).unwrap().sub, id);
    }

    #[tokio::test]
    async fn test_signup_rejects_taken_email() {
        let user = user_with_password("Passw0rd");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_create().never();

        let result = authenticator(repo)
            .signup(
                "Lee".to_string(),
                "lee@example.com".to_string(),
                "Passw0rd".to_string(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
