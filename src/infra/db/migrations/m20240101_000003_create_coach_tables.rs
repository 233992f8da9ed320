//! Migration: Create coaches and coach_link_skills tables.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_catalog_tables::Skills;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coaches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Coaches::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Coaches::UserId).uuid().not_null().unique_key())
                    .col(
                        ColumnDef::new(Coaches::ExperienceYears)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coaches::Description).text().not_null())
                    .col(ColumnDef::new(Coaches::ProfileImageUrl).string_len(2048).null())
                    .col(
                        ColumnDef::new(Coaches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Coaches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coaches_user")
                            .from(Coaches::Table, Coaches::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CoachLinkSkills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoachLinkSkills::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CoachLinkSkills::CoachId).uuid().not_null())
                    .col(ColumnDef::new(CoachLinkSkills::SkillId).uuid().not_null())
                    .col(
                        ColumnDef::new(CoachLinkSkills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coach_link_skills_coach")
                            .from(CoachLinkSkills::Table, CoachLinkSkills::CoachId)
                            .to(Coaches::Table, Coaches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coach_link_skills_skill")
                            .from(CoachLinkSkills::Table, CoachLinkSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coach_link_skills_coach_skill")
                    .table(CoachLinkSkills::Table)
                    .col(CoachLinkSkills::CoachId)
                    .col(CoachLinkSkills::SkillId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoachLinkSkills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Coaches::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Coaches {
    Table,
    Id,
    UserId,
    ExperienceYears,
    Description,
    ProfileImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CoachLinkSkills {
    Table,
    Id,
    CoachId,
    SkillId,
    CreatedAt,
}
