//! Credit package catalog entity.

use sea_orm::entity::prelude::*;

use crate::domain::CreditPackage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credit_packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub credit_amount: i32,
    pub price: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_purchase::Entity")]
    CreditPurchase,
}

impl Related<super::credit_purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditPurchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CreditPackage {
    fn from(model: Model) -> Self {
        CreditPackage {
            id: model.id,
            name: model.name,
            credit_amount: model.credit_amount,
            price: model.price,
        }
    }
}
