//! Credit package catalog and purchases.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MSG_INVALID_ID;
use crate::domain::{CreditPackage, CreditPurchase};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const MSG_DUPLICATE_PACKAGE: &str = "Credit package name already exists";
const MSG_ALREADY_PURCHASED: &str = "Credit package already purchased";
const MSG_PACKAGE_IN_USE: &str = "Credit package has already been purchased";

#[async_trait]
pub trait CreditPackageService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<CreditPackage>>;

    async fn create(&self, name: String, credit_amount: i32, price: i32) -> AppResult<CreditPackage>;

    /// Buy a package once per user
    async fn buy(&self, user_id: Uuid, package_id: Uuid) -> AppResult<CreditPurchase>;

    /// Remove a package that nobody has bought
    async fn delete(&self, package_id: Uuid) -> AppResult<()>;
}

pub struct CreditPackageManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CreditPackageManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CreditPackageService for CreditPackageManager<U> {
    async fn list(&self) -> AppResult<Vec<CreditPackage>> {
        self.uow.credits().list_packages().await
    }

    async fn create(&self, name: String, credit_amount: i32, price: i32) -> AppResult<CreditPackage> {
        let credits = self.uow.credits();
        if credits.find_package_by_name(&name).await?.is_some() {
            tracing::warn!(name = %name, "credit package rejected: duplicate name");
            return Err(AppError::conflict(MSG_DUPLICATE_PACKAGE));
        }

        credits
            .create_package(name, credit_amount, price)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict(MSG_DUPLICATE_PACKAGE)
                } else {
                    e
                }
            })
    }

    async fn buy(&self, user_id: Uuid, package_id: Uuid) -> AppResult<CreditPurchase> {
        let credits = self.uow.credits();
        let package = credits
            .find_package(package_id)
            .await?
            .ok_or_not_found(MSG_INVALID_ID)?;

        if credits.has_purchased(user_id, package_id).await? {
            tracing::warn!(%user_id, %package_id, "purchase rejected: already bought");
            return Err(AppError::conflict(MSG_ALREADY_PURCHASED));
        }

        let purchase = credits
            .create_purchase(user_id, &package)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    AppError::conflict(MSG_ALREADY_PURCHASED)
                } else {
                    e
                }
            })?;

        tracing::info!(%user_id, %package_id, credits = purchase.purchased_credits, "credit package purchased");
        Ok(purchase)
    }

    async fn delete(&self, package_id: Uuid) -> AppResult<()> {
        let credits = self.uow.credits();
        if credits.is_package_purchased(package_id).await? {
            tracing::warn!(%package_id, "package delete rejected: already purchased");
            return Err(AppError::conflict(MSG_PACKAGE_IN_USE));
        }

        // A purchase racing the check above still hits the foreign key
        let deleted = credits.delete_package(package_id).await.map_err(|e| {
            if e.is_foreign_key_violation() {
                AppError::conflict(MSG_PACKAGE_IN_USE)
            } else {
                e
            }
        })?;

        if !deleted {
            return Err(AppError::not_found(MSG_INVALID_ID));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockCreditRepository;
    use crate::services::test_support::TestUnitOfWork;
    use mockall::predicate::eq;

    fn package(id: Uuid) -> CreditPackage {
        CreditPackage {
            id,
            name: "7 lessons".to_string(),
            credit_amount: 7,
            price: 1400,
        }
    }

    fn manager(credits: MockCreditRepository) -> CreditPackageManager<TestUnitOfWork> {
        CreditPackageManager::new(Arc::new(TestUnitOfWork::builder().credits(credits).build()))
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let mut repo = MockCreditRepository::new();
        repo.expect_find_package_by_name()
            .returning(|_| Ok(Some(package(Uuid::new_v4()))));
        repo.expect_create_package().never();

        let result = manager(repo).create("7 lessons".to_string(), 7, 1400).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_buy_unknown_package() {
        let mut repo = MockCreditRepository::new();
        repo.expect_find_package().returning(|_| Ok(None));

        let result = manager(repo).buy(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_buy_twice_rejected() {
        let package_id = Uuid::new_v4();
        let mut repo = MockCreditRepository::new();
        repo.expect_find_package()
            .with(eq(package_id))
            .returning(|id| Ok(Some(package(id))));
        repo.expect_has_purchased().returning(|_, _| Ok(true));
        repo.expect_create_purchase().never();

        let result = manager(repo).buy(Uuid::new_v4(), package_id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_package() {
        let mut repo = MockCreditRepository::new();
        repo.expect_is_package_purchased().returning(|_| Ok(false));
        repo.expect_delete_package().returning(|_| Ok(false));

        let result = manager(repo).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_purchased_package_is_conflict() {
        let package_id = Uuid::new_v4();
        let mut repo = MockCreditRepository::new();
        repo.expect_is_package_purchased()
            .with(eq(package_id))
            .returning(|_| Ok(true));
        repo.expect_delete_package().never();

        let result = manager(repo).delete(package_id).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
