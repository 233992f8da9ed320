//! Credit packages and purchases.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::credit_package::{self, Entity as PackageEntity};
use super::entities::credit_purchase::{self, Entity as PurchaseEntity};
use crate::domain::{CreditPackage, CreditPurchase, PurchaseRecord};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CreditRepository: Send + Sync {
    /// All packages, oldest first
    async fn list_packages(&self) -> AppResult<Vec<CreditPackage>>;

    async fn find_package(&self, id: Uuid) -> AppResult<Option<CreditPackage>>;

    async fn find_package_by_name(&self, name: &str) -> AppResult<Option<CreditPackage>>;

    async fn create_package(
        &self,
        name: String,
        credit_amount: i32,
        price: i32,
    ) -> AppResult<CreditPackage>;

    /// Returns false when no row matched
    async fn delete_package(&self, id: Uuid) -> AppResult<bool>;

    async fn has_purchased(&self, user_id: Uuid, package_id: Uuid) -> AppResult<bool>;

    /// True once anyone has bought the package
    async fn is_package_purchased(&self, package_id: Uuid) -> AppResult<bool>;

    /// Record a purchase at the package's current amount and price
    async fn create_purchase(
        &self,
        user_id: Uuid,
        package: &CreditPackage,
    ) -> AppResult<CreditPurchase>;

    /// Purchases of one user, newest first
    async fn purchase_history(&self, user_id: Uuid) -> AppResult<Vec<PurchaseRecord>>;

    /// Sum of purchased credits over all of a user's purchases
    async fn total_purchased_credits(&self, user_id: Uuid) -> AppResult<i64>;

    /// `(Σ price, Σ credit_amount)` over the whole catalog
    async fn catalog_totals(&self) -> AppResult<(i64, i64)>;
}

pub struct CreditStore {
    db: DatabaseConnection,
}

impl CreditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct PurchaseRow {
    name: String,
    purchased_credits: i32,
    price_paid: i32,
    purchase_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl CreditRepository for CreditStore {
    async fn list_packages(&self) -> AppResult<Vec<CreditPackage>> {
        let models = PackageEntity::find()
            .order_by_asc(credit_package::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(CreditPackage::from).collect())
    }

    async fn find_package(&self, id: Uuid) -> AppResult<Option<CreditPackage>> {
        let result = PackageEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(CreditPackage::from))
    }

    async fn find_package_by_name(&self, name: &str) -> AppResult<Option<CreditPackage>> {
        let result = PackageEntity::find()
            .filter(credit_package::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(CreditPackage::from))
    }

    async fn create_package(
        &self,
        name: String,
        credit_amount: i32,
        price: i32,
    ) -> AppResult<CreditPackage> {
        let active_model = credit_package::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            credit_amount: Set(credit_amount),
            price: Set(price),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(CreditPackage::from(model))
    }

    async fn delete_package(&self, id: Uuid) -> AppResult<bool> {
        let result = PackageEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn has_purchased(&self, user_id: Uuid, package_id: Uuid) -> AppResult<bool> {
        let count = PurchaseEntity::find()
            .filter(credit_purchase::Column::UserId.eq(user_id))
            .filter(credit_purchase::Column::CreditPackageId.eq(package_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn is_package_purchased(&self, package_id: Uuid) -> AppResult<bool> {
        let count = PurchaseEntity::find()
            .filter(credit_purchase::Column::CreditPackageId.eq(package_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create_purchase(
        &self,
        user_id: Uuid,
        package: &CreditPackage,
    ) -> AppResult<CreditPurchase> {
        let now = chrono::Utc::now();
        let active_model = credit_purchase::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            credit_package_id: Set(package.id),
            purchased_credits: Set(package.credit_amount),
            price_paid: Set(package.price),
            purchase_at: Set(now),
            created_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(CreditPurchase::from(model))
    }

    async fn purchase_history(&self, user_id: Uuid) -> AppResult<Vec<PurchaseRecord>> {
        let rows = PurchaseEntity::find()
            .select_only()
            .column(credit_package::Column::Name)
            .column(credit_purchase::Column::PurchasedCredits)
            .column(credit_purchase::Column::PricePaid)
            .column(credit_purchase::Column::PurchaseAt)
            .join(
                JoinType::InnerJoin,
                credit_purchase::Relation::CreditPackage.def(),
            )
            .filter(credit_purchase::Column::UserId.eq(user_id))
            .order_by_desc(credit_purchase::Column::PurchaseAt)
            .into_model::<PurchaseRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| PurchaseRecord {
                name: row.name,
                purchased_credits: row.purchased_credits,
                price_paid: row.price_paid,
                purchase_at: row.purchase_at,
            })
            .collect())
    }

    async fn total_purchased_credits(&self, user_id: Uuid) -> AppResult<i64> {
        total_purchased_credits(&self.db, user_id).await
    }

    async fn catalog_totals(&self) -> AppResult<(i64, i64)> {
        let totals: Option<(Option<i64>, Option<i64>)> = PackageEntity::find()
            .select_only()
            .column_as(Expr::col(credit_package::Column::Price).sum(), "total_price")
            .column_as(
                Expr::col(credit_package::Column::CreditAmount).sum(),
                "total_credits",
            )
            .into_tuple()
            .one(&self.db)
            .await?;

        let (price, credits) = totals.unwrap_or((None, None));
        Ok((price.unwrap_or(0), credits.unwrap_or(0)))
    }
}

pub(crate) async fn total_purchased_credits<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<i64> {
    let total: Option<Option<i64>> = PurchaseEntity::find()
        .select_only()
        .column_as(
            Expr::col(credit_purchase::Column::PurchasedCredits).sum(),
            "total",
        )
        .filter(credit_purchase::Column::UserId.eq(user_id))
        .into_tuple()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0))
}
