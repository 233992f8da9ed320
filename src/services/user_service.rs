//! User service - profile, password and purchase history.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, PurchaseRecord, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Change the display name; the new name must differ
    async fn rename(&self, id: Uuid, name: String) -> AppResult<User>;

    /// Replace the password after checking the current one
    async fn change_password(
        &self,
        id: Uuid,
        password: String,
        new_password: String,
        confirm_new_password: String,
    ) -> AppResult<()>;

    /// Credit packages bought by the user
    async fn purchase_history(&self, id: Uuid) -> AppResult<Vec<PurchaseRecord>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User not found")
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<User> {
        let user = self.get_user(id).await?;
        if user.name == name {
            return Err(AppError::bad_request("User name has not changed"));
        }

        self.uow.users().update_name(id, name).await
    }

    async fn change_password(
        &self,
        id: Uuid,
        password: String,
        new_password: String,
        confirm_new_password: String,
    ) -> AppResult<()> {
        if new_password == password {
            return Err(AppError::bad_request(
                "New password cannot be the same as the current password",
            ));
        }
        if new_password != confirm_new_password {
            return Err(AppError::bad_request(
                "New password and confirmation do not match",
            ));
        }

        let user = self.get_user(id).await?;
        if !Password::from_hash(user.password_hash).verify(&password) {
            tracing::warn!(user_id = %id, "password change rejected: wrong current password");
            return Err(AppError::bad_request("Current password is incorrect"));
        }

        let hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(id, hash).await?;

        tracing::info!(user_id = %id, "password changed");
        Ok(())
    }

    async fn purchase_history(&self, id: Uuid) -> AppResult<Vec<PurchaseRecord>> {
        self.uow.credits().purchase_history(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::TestUnitOfWork;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn create_test_user(id: Uuid, plain_password: &str) -> User {
        User {
            id,
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            password_hash: Password::new(plain_password).unwrap().into_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn manager(users: MockUserRepository) -> UserManager<TestUnitOfWork> {
        UserManager::new(Arc::new(TestUnitOfWork::builder().users(users).build()))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = manager(repo).get_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_to_same_name_rejected() {
        let id = Uuid::new_v4();
        let user = create_test_user(id, "Passw0rd");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_name().never();

        let result = manager(repo).rename(id, "Lee".to_string()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rename_updates_name() {
        let id = Uuid::new_v4();
        let user = create_test_user(id, "Passw0rd");
        let mut repo = MockUserRepository::new();
        let found = user.clone();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update_name()
            .with(eq(id), eq("Kim".to_string()))
            .times(1)
            .returning(move |_, name| {
                let mut renamed = user.clone();
                renamed.name = name;
                Ok(renamed)
            });

        let renamed = manager(repo).rename(id, "Kim".to_string()).await.unwrap();
        assert_eq!(renamed.name, "Kim");
    }

    #[tokio::test]
    async fn test_change_password_checks() {
        let id = Uuid::new_v4();
        let user = create_test_user(id, "Passw0rd");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_password().never();
        let service = manager(repo);

        // Same as current
        let result = service
            .change_password(id, "Passw0rd".into(), "Passw0rd".into(), "Passw0rd".into())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        // Confirmation mismatch
        let result = service
            .change_password(id, "Passw0rd".into(), "N3wPassword".into(), "N3wPasswort".into())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        // Wrong current password
        let result = service
            .change_password(id, "Wr0ngPass".into(), "N3wPassword".into(), "N3wPassword".into())
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_change_password_stores_new_hash() {
        let id = Uuid::new_v4();
        let user = create_test_user(id, "Passw0rd");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update_password()
            .withf(move |uid, hash| {
                *uid == id && Password::from_hash(hash.clone()).verify("N3wPassword")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        manager(repo)
            .change_password(id, "Passw0rd".into(), "N3wPassword".into(), "N3wPassword".into())
            .await
            .unwrap();
    }
}
