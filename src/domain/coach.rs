//! Coach profiles and the courses they offer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Coach {
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_participants: i32,
    #[serde(skip_serializing)]
    pub meeting_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course fields supplied by its coach on create and update.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub skill_id: Uuid,
    pub name: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_participants: i32,
    pub meeting_url: String,
}

/// Editable part of a coach profile.
#[derive(Debug, Clone)]
pub struct CoachProfileDraft {
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: Option<String>,
}

/// Entry of the public coach directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CoachSummary {
    pub id: Uuid,
    pub name: String,
}

/// Public view of a course with its skill and coach names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CourseListing {
    pub id: Uuid,
    pub skill_name: String,
    pub name: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub max_participants: i32,
    pub coach_name: String,
}

/// Where a course sits relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl Course {
    pub fn status_at(&self, now: DateTime<Utc>) -> CourseStatus {
        if self.start_at >= now {
            CourseStatus::Upcoming
        } else if self.end_at >= now {
            CourseStatus::Ongoing
        } else {
            CourseStatus::Ended
        }
    }
}
