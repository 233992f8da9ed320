//! Coach directory, promotion and coach profile management.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::MSG_INVALID_ID;
use crate::domain::{Coach, CoachProfileDraft, CoachSummary, CourseListing, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;
use crate::with_transaction;

/// A coach profile together with its linked skills.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoachProfile {
    pub id: Uuid,
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: Option<String>,
    pub skill_ids: Vec<Uuid>,
}

impl CoachProfile {
    fn new(coach: Coach, skill_ids: Vec<Uuid>) -> Self {
        Self {
            id: coach.id,
            experience_years: coach.experience_years,
            description: coach.description,
            profile_image_url: coach.profile_image_url,
            skill_ids,
        }
    }
}

#[async_trait]
pub trait CoachService: Send + Sync {
    /// One page of the public coach directory
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<CoachSummary>>;

    /// A coach profile and the user behind it
    async fn detail(&self, coach_id: Uuid) -> AppResult<(User, Coach)>;

    /// Courses offered by a coach
    async fn courses(&self, coach_id: Uuid) -> AppResult<Vec<CourseListing>>;

    /// Turn a USER into a COACH and create their profile
    async fn promote(&self, user_id: Uuid, draft: CoachProfileDraft) -> AppResult<(User, Coach)>;

    /// Profile of the calling coach
    async fn profile(&self, user_id: Uuid) -> AppResult<CoachProfile>;

    /// Update the calling coach's profile and replace their skill set
    async fn update_profile(
        &self,
        user_id: Uuid,
        draft: CoachProfileDraft,
        skill_ids: Vec<Uuid>,
    ) -> AppResult<CoachProfile>;
}

pub struct CoachManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CoachManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find_coach(&self, coach_id: Uuid) -> AppResult<Coach> {
        self.uow
            .coaches()
            .find_by_id(coach_id)
            .await?
            .ok_or_not_found("Coach not found")
    }

    async fn own_coach(&self, user_id: Uuid) -> AppResult<Coach> {
        self.uow
            .coaches()
            .find_by_user_id(user_id)
            .await?
            .ok_or_not_found("Coach profile not found")
    }
}

#[async_trait]
impl<U: UnitOfWork> CoachService for CoachManager<U> {
    async fn list(&self, params: PaginationParams) -> AppResult<Vec<CoachSummary>> {
        self.uow.coaches().list(params).await
    }

    async fn detail(&self, coach_id: Uuid) -> AppResult<(User, Coach)> {
        let coach = self.find_coach(coach_id).await?;
        let user = self
            .uow
            .users()
            .find_by_id(coach.user_id)
            .await?
            .ok_or_not_found("Coach not found")?;
        Ok((user, coach))
    }

    async fn courses(&self, coach_id: Uuid) -> AppResult<Vec<CourseListing>> {
        let coach = self.find_coach(coach_id).await?;
        self.uow.courses().list_listings_by_owner(coach.user_id).await
    }

    async fn promote(&self, user_id: Uuid, draft: CoachProfileDraft) -> AppResult<(User, Coach)> {
        let result = with_transaction!(self.uow, |ctx| {
            let user = ctx
                .users()
                .lock_by_id(user_id)
                .await?
                .ok_or_not_found(MSG_INVALID_ID)?;

            if !user.role.can_promote_to_coach() {
                return Err(AppError::conflict("User is already a coach"));
            }

            let user = ctx.users().set_role(user_id, UserRole::Coach).await?;
            let coach = ctx.coaches().create(user_id, draft).await?;
            Ok((user, coach))
        });

        match result {
            Ok((user, coach)) => {
                tracing::info!(%user_id, coach_id = %coach.id, "user promoted to coach");
                Ok((user, coach))
            }
            // Concurrent promotion lost the race on the coach row
            Err(e) if e.is_unique_violation() => Err(AppError::conflict("User is already a coach")),
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "promotion rejected");
                Err(e)
            }
        }
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<CoachProfile> {
        let coach = self.own_coach(user_id).await?;
        let skill_ids = self.uow.coaches().skill_ids(coach.id).await?;
        Ok(CoachProfile::new(coach, skill_ids))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        draft: CoachProfileDraft,
        skill_ids: Vec<Uuid>,
    ) -> AppResult<CoachProfile> {
        let mut skill_ids = skill_ids;
        skill_ids.sort_unstable();
        skill_ids.dedup();

        let coach = with_transaction!(self.uow, |ctx| {
            let coach = ctx
                .coaches()
                .find_by_user_id(user_id)
                .await?
                .ok_or_not_found("Coach profile not found")?;

            let existing = ctx.skills().count_existing(&skill_ids).await?;
            if existing != skill_ids.len() as u64 {
                return Err(AppError::not_found("Skill not found"));
            }

            let coach = ctx.coaches().update_profile(coach.id, draft).await?;
            ctx.coaches().replace_skills(coach.id, &skill_ids).await?;
            Ok(coach)
        })?;

        tracing::info!(%user_id, coach_id = %coach.id, "coach profile updated");
        let skill_ids = self.uow.coaches().skill_ids(coach.id).await?;
        Ok(CoachProfile::new(coach, skill_ids))
    }
}
