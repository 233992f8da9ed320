//! Skill catalog.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MSG_INVALID_ID;
use crate::domain::Skill;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

const MSG_DUPLICATE_SKILL: &str = "Skill name already exists";
const MSG_SKILL_IN_USE: &str = "Skill is used by a course";

#[async_trait]
pub trait SkillService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Skill>>;

    async fn create(&self, name: String) -> AppResult<Skill>;

    /// Remove a skill no course refers to
    async fn delete(&self, skill_id: Uuid) -> AppResult<()>;
}

pub struct SkillManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SkillManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SkillService for SkillManager<U> {
    async fn list(&self) -> AppResult<Vec<Skill>> {
        self.uow.skills().list().await
    }

    async fn create(&self, name: String) -> AppResult<Skill> {
        let skills = self.uow.skills();
        if skills.find_by_name(&name).await?.is_some() {
            tracing::warn!(name = %name, "skill rejected: duplicate name");
            return Err(AppError::conflict(MSG_DUPLICATE_SKILL));
        }

        skills.create(name).await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::conflict(MSG_DUPLICATE_SKILL)
            } else {
                e
            }
        })
    }

    async fn delete(&self, skill_id: Uuid) -> AppResult<()> {
        let skills = self.uow.skills();
        if skills.is_used_by_course(skill_id).await? {
            tracing::warn!(%skill_id, "skill delete rejected: used by a course");
            return Err(AppError::conflict(MSG_SKILL_IN_USE));
        }

        // A course created after the check above still hits the foreign key
        let deleted = skills.delete(skill_id).await.map_err(|e| {
            if e.is_foreign_key_violation() {
                AppError::conflict(MSG_SKILL_IN_USE)
            } else {
                e
            }
        })?;

        if !deleted {
            return Err(AppError::not_found(MSG_INVALID_ID));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockSkillRepository;
    use crate::services::test_support::TestUnitOfWork;

    fn manager(skills: MockSkillRepository) -> SkillManager<TestUnitOfWork> {
        SkillManager::new(Arc::new(TestUnitOfWork::builder().skills(skills).build()))
    }

    #[tokio::test]
    async fn test_create_duplicate_skill() {
        let mut repo = MockSkillRepository::new();
        repo.expect_find_by_name().returning(|name| {
            Ok(Some(Skill {
                id: Uuid::new_v4(),
                name: name.to_string(),
            }))
        });
        repo.expect_create().never();

        let result = manager(repo).create("Yoga".to_string()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_skill() {
        let mut repo = MockSkillRepository::new();
        repo.expect_find_by_name().returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|name| {
            Ok(Skill {
                id: Uuid::new_v4(),
                name,
            })
        });

        let skill = manager(repo).create("Yoga".to_string()).await.unwrap();
        assert_eq!(skill.name, "Yoga");
    }

    #[tokio::test]
    async fn test_delete_unknown_skill() {
        let mut repo = MockSkillRepository::new();
        repo.expect_is_used_by_course().returning(|_| Ok(false));
        repo.expect_delete().returning(|_| Ok(false));

        let result = manager(repo).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_skill_taught_by_course() {
        let mut repo = MockSkillRepository::new();
        repo.expect_is_used_by_course().returning(|_| Ok(true));
        repo.expect_delete().never();

        let result = manager(repo).delete(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
