//! Course catalog and coach-side course management.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Course, CourseDraft, CourseListing, CourseStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

const MSG_BELOW_BOOKINGS: &str = "Max participants cannot be lower than current bookings";

/// A course as listed for the coach who owns it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OwnCourse {
    pub id: Uuid,
    pub name: String,
    pub status: CourseStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_participants: i32,
    /// Active bookings
    pub participants: u64,
}

/// Full course detail for its owner, meeting link included.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OwnCourseDetail {
    pub id: Uuid,
    pub skill_name: String,
    pub name: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_participants: i32,
    pub meeting_url: String,
}

#[async_trait]
pub trait CourseService: Send + Sync {
    /// Every course, public view
    async fn list_all(&self) -> AppResult<Vec<CourseListing>>;

    /// Create a course owned by the coach user `owner_id`
    async fn create(&self, owner_id: Uuid, draft: CourseDraft) -> AppResult<Course>;

    /// Courses of the calling coach with status and participant counts
    async fn list_own(&self, user_id: Uuid) -> AppResult<Vec<OwnCourse>>;

    async fn own_detail(&self, user_id: Uuid, course_id: Uuid) -> AppResult<OwnCourseDetail>;

    async fn update_own(&self, user_id: Uuid, course_id: Uuid, draft: CourseDraft)
        -> AppResult<Course>;
}

pub struct CourseManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CourseManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn check_schedule(draft: &CourseDraft) -> AppResult<()> {
        if draft.end_at <= draft.start_at {
            return Err(AppError::validation("Course must end after it starts"));
        }
        if draft.max_participants <= 0 {
            return Err(AppError::validation("Course needs at least one participant"));
        }
        Ok(())
    }

    async fn check_skill(&self, skill_id: Uuid) -> AppResult<()> {
        self.uow
            .skills()
            .find_by_id(skill_id)
            .await?
            .ok_or_not_found("Skill not found")
            .map(|_| ())
    }

    async fn owned_course(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Course> {
        let course = self
            .uow
            .courses()
            .find_by_id(course_id)
            .await?
            .ok_or_not_found("Course not found")?;

        // Someone else's course reads exactly like a missing one
        if course.user_id != user_id {
            tracing::warn!(%user_id, %course_id, "course access rejected: not the owner");
            return Err(AppError::not_found("Course not found"));
        }
        Ok(course)
    }
}

#[async_trait]
impl<U: UnitOfWork> CourseService for CourseManager<U> {
    async fn list_all(&self) -> AppResult<Vec<CourseListing>> {
        self.uow.courses().list_listings().await
    }

    async fn create(&self, owner_id: Uuid, draft: CourseDraft) -> AppResult<Course> {
        Self::check_schedule(&draft)?;

        let owner = self
            .uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found("User not found")?;
        if !owner.is_coach() {
            return Err(AppError::conflict("User is not a coach"));
        }
        self.check_skill(draft.skill_id).await?;

        let course = self.uow.courses().create(owner_id, draft).await?;
        tracing::info!(course_id = %course.id, %owner_id, "course created");
        Ok(course)
    }

    async fn list_own(&self, user_id: Uuid) -> AppResult<Vec<OwnCourse>> {
        let courses = self.uow.courses().list_by_owner(user_id).await?;
        let ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
        let counts = self.uow.bookings().count_active_by_courses(&ids).await?;

        let now = Utc::now();
        Ok(courses
            .into_iter()
            .map(|course| OwnCourse {
                id: course.id,
                status: course.status_at(now),
                participants: counts.get(&course.id).copied().unwrap_or(0),
                name: course.name,
                start_at: course.start_at,
                end_at: course.end_at,
                max_participants: course.max_participants,
            })
            .collect())
    }

    async fn own_detail(&self, user_id: Uuid, course_id: Uuid) -> AppResult<OwnCourseDetail> {
        let course = self.owned_course(user_id, course_id).await?;
        let skill = self
            .uow
            .skills()
            .find_by_id(course.skill_id)
            .await?
            .ok_or_not_found("Skill not found")?;

        Ok(OwnCourseDetail {
            id: course.id,
            skill_name: skill.name,
            name: course.name,
            description: course.description,
            start_at: course.start_at,
            end_at: course.end_at,
            max_participants: course.max_participants,
            meeting_url: course.meeting_url,
        })
    }

    async fn update_own(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        draft: CourseDraft,
    ) -> AppResult<Course> {
        Self::check_schedule(&draft)?;
        self.owned_course(user_id, course_id).await?;
        self.check_skill(draft.skill_id).await?;

        // Same lock as booking, so no seat can be taken between count and write
        let course = with_transaction!(self.uow, |ctx| {
            ctx.courses()
                .lock_by_id(course_id)
                .await?
                .ok_or_not_found("Course not found")?;

            let booked = ctx.bookings().count_active_by_course(course_id).await?;
            if (draft.max_participants as u64) < booked {
                return Err(AppError::bad_request(MSG_BELOW_BOOKINGS));
            }

            ctx.courses().update(course_id, draft).await
        })?;

        tracing::info!(%course_id, "course updated");
        Ok(course)
    }
}
