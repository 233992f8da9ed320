//! Credit purchase entity.

use sea_orm::entity::prelude::*;

use crate::domain::CreditPurchase;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credit_purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub credit_package_id: Uuid,
    pub purchased_credits: i32,
    pub price_paid: i32,
    pub purchase_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::credit_package::Entity",
        from = "Column::CreditPackageId",
        to = "super::credit_package::Column::Id"
    )]
    CreditPackage,
}

impl Related<super::credit_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditPackage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CreditPurchase {
    fn from(model: Model) -> Self {
        CreditPurchase {
            id: model.id,
            user_id: model.user_id,
            credit_package_id: model.credit_package_id,
            purchased_credits: model.purchased_credits,
            price_paid: model.price_paid,
            purchase_at: model.purchase_at,
        }
    }
}
