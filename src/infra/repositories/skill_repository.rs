//! Skill catalog repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::course::{self, Entity as CourseEntity};
use super::entities::skill::{self, ActiveModel, Entity as SkillEntity};
use crate::domain::Skill;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// All skills, oldest first
    async fn list(&self) -> AppResult<Vec<Skill>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Skill>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Skill>>;

    async fn create(&self, name: String) -> AppResult<Skill>;

    /// True when at least one course teaches the skill
    async fn is_used_by_course(&self, id: Uuid) -> AppResult<bool>;

    /// Returns false when no row matched
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

pub struct SkillStore {
    db: DatabaseConnection,
}

impl SkillStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SkillRepository for SkillStore {
    async fn list(&self) -> AppResult<Vec<Skill>> {
        let models = SkillEntity::find()
            .order_by_asc(skill::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Skill::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Skill>> {
        let result = SkillEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Skill::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Skill>> {
        let result = SkillEntity::find()
            .filter(skill::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Skill::from))
    }

    async fn create(&self, name: String) -> AppResult<Skill> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Skill::from(model))
    }

    async fn is_used_by_course(&self, id: Uuid) -> AppResult<bool> {
        let count = CourseEntity::find()
            .filter(course::Column::SkillId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = SkillEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

/// Number of `ids` that name an existing skill.
pub(crate) async fn count_existing<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> AppResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let count = SkillEntity::find()
        .filter(skill::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?;
    Ok(count)
}
