//! Migration: Create skills, credit_packages and credit_purchases tables.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Skills::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Skills::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Skills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditPackages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditPackages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditPackages::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CreditPackages::CreditAmount).integer().not_null())
                    .col(ColumnDef::new(CreditPackages::Price).integer().not_null())
                    .col(
                        ColumnDef::new(CreditPackages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditPurchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditPurchases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreditPurchases::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(CreditPurchases::CreditPackageId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditPurchases::PurchasedCredits)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CreditPurchases::PricePaid).integer().not_null())
                    .col(
                        ColumnDef::new(CreditPurchases::PurchaseAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditPurchases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_purchases_user")
                            .from(CreditPurchases::Table, CreditPurchases::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_purchases_package")
                            .from(CreditPurchases::Table, CreditPurchases::CreditPackageId)
                            .to(CreditPackages::Table, CreditPackages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // One purchase per (user, package)
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_purchases_user_package")
                    .table(CreditPurchases::Table)
                    .col(CreditPurchases::UserId)
                    .col(CreditPurchases::CreditPackageId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditPurchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditPackages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Skills {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum CreditPackages {
    Table,
    Id,
    Name,
    CreditAmount,
    Price,
    CreatedAt,
}

#[derive(Iden)]
enum CreditPurchases {
    Table,
    Id,
    UserId,
    CreditPackageId,
    PurchasedCredits,
    PricePaid,
    PurchaseAt,
    CreatedAt,
}
