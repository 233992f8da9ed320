//! Coach profile repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{
    coach::{self, Entity as CoachEntity},
    coach_link_skill::{self, Entity as CoachLinkSkillEntity},
    user,
};
use crate::domain::{Coach, CoachProfileDraft, CoachSummary};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CoachRepository: Send + Sync {
    /// One page of the coach directory, oldest profiles first
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<CoachSummary>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coach>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Coach>>;

    /// Skills linked to a coach profile
    async fn skill_ids(&self, coach_id: Uuid) -> AppResult<Vec<Uuid>>;
}

pub struct CoachStore {
    db: DatabaseConnection,
}

impl CoachStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct CoachSummaryRow {
    id: Uuid,
    name: String,
}

#[async_trait]
impl CoachRepository for CoachStore {
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<CoachSummary>> {
        let rows = CoachEntity::find()
            .select_only()
            .column(coach::Column::Id)
            .column(user::Column::Name)
            .join(JoinType::InnerJoin, coach::Relation::User.def())
            .order_by_asc(coach::Column::CreatedAt)
            .limit(params.limit())
            .offset(params.offset())
            .into_model::<CoachSummaryRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| CoachSummary {
                id: row.id,
                name: row.name,
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Coach>> {
        let result = CoachEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Coach::from))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Coach>> {
        find_by_user_id(&self.db, user_id).await
    }

    async fn skill_ids(&self, coach_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = CoachLinkSkillEntity::find()
            .select_only()
            .column(coach_link_skill::Column::SkillId)
            .filter(coach_link_skill::Column::CoachId.eq(coach_id))
            .order_by_asc(coach_link_skill::Column::CreatedAt)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }
}

pub(crate) async fn find_by_user_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> AppResult<Option<Coach>> {
    let result = CoachEntity::find()
        .filter(coach::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(result.map(Coach::from))
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    draft: CoachProfileDraft,
) -> AppResult<Coach> {
    let now = chrono::Utc::now();
    let active_model = coach::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        experience_years: Set(draft.experience_years),
        description: Set(draft.description),
        profile_image_url: Set(draft.profile_image_url),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Ok(Coach::from(active_model.insert(db).await?))
}

pub(crate) async fn update_profile<C: ConnectionTrait>(
    db: &C,
    coach_id: Uuid,
    draft: CoachProfileDraft,
) -> AppResult<Coach> {
    let coach = CoachEntity::find_by_id(coach_id)
        .one(db)
        .await?
        .ok_or_not_found("Coach not found")?;

    let mut active: coach::ActiveModel = coach.into();
    active.experience_years = Set(draft.experience_years);
    active.description = Set(draft.description);
    active.profile_image_url = Set(draft.profile_image_url);
    active.updated_at = Set(chrono::Utc::now());

    Ok(Coach::from(active.update(db).await?))
}

/// Drop every skill link of the coach, then link `skill_ids`.
pub(crate) async fn replace_skills<C: ConnectionTrait>(
    db: &C,
    coach_id: Uuid,
    skill_ids: &[Uuid],
) -> AppResult<()> {
    CoachLinkSkillEntity::delete_many()
        .filter(coach_link_skill::Column::CoachId.eq(coach_id))
        .exec(db)
        .await?;

    if skill_ids.is_empty() {
        return Ok(());
    }

    let now = chrono::Utc::now();
    let links = skill_ids.iter().map(|skill_id| coach_link_skill::ActiveModel {
        id: Set(Uuid::new_v4()),
        coach_id: Set(coach_id),
        skill_id: Set(*skill_id),
        created_at: Set(now),
    });

    CoachLinkSkillEntity::insert_many(links).exec(db).await?;
    Ok(())
}
