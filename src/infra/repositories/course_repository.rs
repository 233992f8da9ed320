//! Course repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use super::entities::{
    course::{self, Entity as CourseEntity},
    skill, user,
};
use super::user_repository::supports_row_locks;
use crate::domain::{Course, CourseDraft, CourseListing};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Every course with skill and coach names, soonest first
    async fn list_listings(&self) -> AppResult<Vec<CourseListing>>;

    /// Courses owned by one coach user, with skill and coach names
    async fn list_listings_by_owner(&self, user_id: Uuid) -> AppResult<Vec<CourseListing>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>>;

    /// Courses owned by one coach user, soonest first
    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Course>>;

    async fn create(&self, user_id: Uuid, draft: CourseDraft) -> AppResult<Course>;
}

pub struct CourseStore {
    db: DatabaseConnection,
}

impl CourseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct CourseListingRow {
    id: Uuid,
    skill_name: String,
    name: String,
    description: String,
    start_at: chrono::DateTime<chrono::Utc>,
    end_at: chrono::DateTime<chrono::Utc>,
    max_participants: i32,
    coach_name: String,
}

impl From<CourseListingRow> for CourseListing {
    fn from(row: CourseListingRow) -> Self {
        CourseListing {
            id: row.id,
            skill_name: row.skill_name,
            name: row.name,
            description: row.description,
            start_at: row.start_at,
            end_at: row.end_at,
            max_participants: row.max_participants,
            coach_name: row.coach_name,
        }
    }
}

fn listing_query() -> Select<CourseEntity> {
    CourseEntity::find()
        .select_only()
        .column(course::Column::Id)
        .column_as(skill::Column::Name, "skill_name")
        .column(course::Column::Name)
        .column(course::Column::Description)
        .column(course::Column::StartAt)
        .column(course::Column::EndAt)
        .column(course::Column::MaxParticipants)
        .column_as(user::Column::Name, "coach_name")
        .join(JoinType::InnerJoin, course::Relation::Skill.def())
        .join(JoinType::InnerJoin, course::Relation::User.def())
        .order_by_asc(course::Column::StartAt)
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn list_listings(&self) -> AppResult<Vec<CourseListing>> {
        let rows = listing_query()
            .into_model::<CourseListingRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(CourseListing::from).collect())
    }

    async fn list_listings_by_owner(&self, user_id: Uuid) -> AppResult<Vec<CourseListing>> {
        let rows = listing_query()
            .filter(course::Column::UserId.eq(user_id))
            .into_model::<CourseListingRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(CourseListing::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Course::from))
    }

    async fn list_by_owner(&self, user_id: Uuid) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .filter(course::Column::UserId.eq(user_id))
            .order_by_asc(course::Column::StartAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn create(&self, user_id: Uuid, draft: CourseDraft) -> AppResult<Course> {
        let now = chrono::Utc::now();
        let active_model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            skill_id: Set(draft.skill_id),
            name: Set(draft.name),
            description: Set(draft.description),
            start_at: Set(draft.start_at),
            end_at: Set(draft.end_at),
            max_participants: Set(draft.max_participants),
            meeting_url: Set(draft.meeting_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Course::from(model))
    }
}

pub(crate) async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    draft: CourseDraft,
) -> AppResult<Course> {
    let course = CourseEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_not_found("Course not found")?;

    let mut active: course::ActiveModel = course.into();
    active.skill_id = Set(draft.skill_id);
    active.name = Set(draft.name);
    active.description = Set(draft.description);
    active.start_at = Set(draft.start_at);
    active.end_at = Set(draft.end_at);
    active.max_participants = Set(draft.max_participants);
    active.meeting_url = Set(draft.meeting_url);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(db).await.map_err(AppError::from)?;
    Ok(Course::from(model))
}

/// `SELECT ... FOR UPDATE` on the course row (no-op on SQLite).
pub(crate) async fn lock_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<Course>> {
    let mut query = CourseEntity::find_by_id(id);
    if supports_row_locks(db) {
        query = query.lock_exclusive();
    }
    Ok(query.one(db).await?.map(Course::from))
}
