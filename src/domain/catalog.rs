//! Catalog entries: skills, credit packages and purchases.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
}

/// Purchasable bundle of course credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreditPackage {
    pub id: Uuid,
    pub name: String,
    pub credit_amount: i32,
    pub price: i32,
}

/// A user's purchase of one package. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreditPurchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub credit_package_id: Uuid,
    pub purchased_credits: i32,
    pub price_paid: i32,
    pub purchase_at: DateTime<Utc>,
}

/// One line of a user's purchase history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PurchaseRecord {
    /// Package name
    pub name: String,
    pub purchased_credits: i32,
    pub price_paid: i32,
    pub purchase_at: DateTime<Utc>,
}
