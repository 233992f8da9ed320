//! Migration: Create courses and course_bookings tables.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

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
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::UserId).uuid().not_null())
                    .col(ColumnDef::new(Courses::SkillId).uuid().not_null())
                    .col(ColumnDef::new(Courses::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(
                        ColumnDef::new(Courses::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::MaxParticipants).integer().not_null())
                    .col(ColumnDef::new(Courses::MeetingUrl).string_len(2048).not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_user")
                            .from(Courses::Table, Courses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_skill")
                            .from(Courses::Table, Courses::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_user_id")
                    .table(Courses::Table)
                    .col(Courses::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseBookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseBookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseBookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(CourseBookings::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(CourseBookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseBookings::CancelledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_bookings_user")
                            .from(CourseBookings::Table, CourseBookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_bookings_course")
                            .from(CourseBookings::Table, CourseBookings::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_bookings_course_id")
                    .table(CourseBookings::Table)
                    .col(CourseBookings::CourseId)
                    .to_owned(),
            )
            .await?;

        // At most one active booking per (user, course). Both Postgres and
        // SQLite accept this partial index syntax.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_course_bookings_active \
                 ON course_bookings (user_id, course_id) WHERE cancelled_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseBookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    UserId,
    SkillId,
    Name,
    Description,
    StartAt,
    EndAt,
    MaxParticipants,
    MeetingUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CourseBookings {
    Table,
    Id,
    UserId,
    CourseId,
    CreatedAt,
    CancelledAt,
}
