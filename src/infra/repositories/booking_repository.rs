//! Course booking repository.
//!
//! A booking is active while `cancelled_at` is NULL. Rows are never
//! deleted; cancelling stamps the column instead.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{
    course,
    course_booking::{self, Entity as BookingEntity},
    user,
};
use crate::domain::{Booking, BookingRecord, BookingStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// The caller's active booking for a course, if any
    async fn find_active(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<Booking>>;

    /// Number of active bookings held by a user
    async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Active booking count per course; courses without bookings are absent
    async fn count_active_by_courses(&self, course_ids: &[Uuid]) -> AppResult<HashMap<Uuid, u64>>;

    /// Stamp `cancelled_at` on the active booking. Returns false when none was active.
    async fn cancel(&self, user_id: Uuid, course_id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Every booking of a user joined with its course, by course start
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BookingRecord>>;

    /// `(bookings, distinct users)` over active bookings on `course_ids`
    /// created within `[start, end]`
    async fn window_stats(
        &self,
        course_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<(i64, i64)>;
}

pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct BookingRecordRow {
    course_id: Uuid,
    name: String,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    meeting_url: String,
    coach_name: String,
    cancelled_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn find_active(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<Booking>> {
        find_active(&self.db, user_id, course_id).await
    }

    async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        count_active_by_user(&self.db, user_id).await
    }

    async fn count_active_by_courses(&self, course_ids: &[Uuid]) -> AppResult<HashMap<Uuid, u64>> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = BookingEntity::find()
            .select_only()
            .column(course_booking::Column::CourseId)
            .column_as(Expr::col(course_booking::Column::Id).count(), "participants")
            .filter(course_booking::Column::CourseId.is_in(course_ids.iter().copied()))
            .filter(course_booking::Column::CancelledAt.is_null())
            .group_by(course_booking::Column::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(course_id, count)| (course_id, count.max(0) as u64))
            .collect())
    }

    async fn cancel(&self, user_id: Uuid, course_id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = BookingEntity::update_many()
            .col_expr(course_booking::Column::CancelledAt, Expr::value(at))
            .filter(course_booking::Column::UserId.eq(user_id))
            .filter(course_booking::Column::CourseId.eq(course_id))
            .filter(course_booking::Column::CancelledAt.is_null())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BookingRecord>> {
        let rows = BookingEntity::find()
            .select_only()
            .column(course_booking::Column::CourseId)
            .column(course::Column::Name)
            .column(course::Column::StartAt)
            .column(course::Column::EndAt)
            .column(course::Column::MeetingUrl)
            .column_as(user::Column::Name, "coach_name")
            .column(course_booking::Column::CancelledAt)
            .join(JoinType::InnerJoin, course_booking::Relation::Course.def())
            .join(JoinType::InnerJoin, course::Relation::User.def())
            .filter(course_booking::Column::UserId.eq(user_id))
            .order_by_asc(course::Column::StartAt)
            .order_by_asc(course_booking::Column::CreatedAt)
            .into_model::<BookingRecordRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BookingRecord {
                course_id: row.course_id,
                name: row.name,
                start_at: row.start_at,
                end_at: row.end_at,
                meeting_url: row.meeting_url,
                coach_name: row.coach_name,
                status: BookingStatus::from_cancelled_at(row.cancelled_at)
                    .label()
                    .to_string(),
            })
            .collect())
    }

    async fn window_stats(
        &self,
        course_ids: &[Uuid],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<(i64, i64)> {
        if course_ids.is_empty() {
            return Ok((0, 0));
        }

        let stats: Option<(i64, i64)> = BookingEntity::find()
            .select_only()
            .column_as(Expr::col(course_booking::Column::Id).count(), "course_count")
            .column_as(
                Expr::col(course_booking::Column::UserId).count_distinct(),
                "participants",
            )
            .filter(course_booking::Column::CourseId.is_in(course_ids.iter().copied()))
            .filter(course_booking::Column::CancelledAt.is_null())
            .filter(course_booking::Column::CreatedAt.between(start, end))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(stats.unwrap_or((0, 0)))
    }
}

pub(crate) async fn find_active<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    course_id: Uuid,
) -> AppResult<Option<Booking>> {
    let result = BookingEntity::find()
        .filter(course_booking::Column::UserId.eq(user_id))
        .filter(course_booking::Column::CourseId.eq(course_id))
        .filter(course_booking::Column::CancelledAt.is_null())
        .one(db)
        .await?;
    Ok(result.map(Booking::from))
}

pub(crate) async fn count_active_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<u64> {
    let count = BookingEntity::find()
        .filter(course_booking::Column::UserId.eq(user_id))
        .filter(course_booking::Column::CancelledAt.is_null())
        .count(db)
        .await?;
    Ok(count)
}

pub(crate) async fn count_active_by_course<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
) -> AppResult<u64> {
    let count = BookingEntity::find()
        .filter(course_booking::Column::CourseId.eq(course_id))
        .filter(course_booking::Column::CancelledAt.is_null())
        .count(db)
        .await?;
    Ok(count)
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    course_id: Uuid,
) -> AppResult<Booking> {
    let active_model = course_booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        course_id: Set(course_id),
        created_at: Set(Utc::now()),
        cancelled_at: Set(None),
    };

    Ok(Booking::from(active_model.insert(db).await?))
}
