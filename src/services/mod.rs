//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. All of them reach the store through the
//! Unit of Work, which also scopes multi-row writes to one transaction.

mod auth_service;
mod booking_service;
mod coach_service;
pub mod container;
mod course_service;
mod credit_package_service;
mod skill_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, LoginResult};
pub use booking_service::{
    BookingManager, BookingOverview, BookingService, MSG_ALREADY_BOOKED, MSG_COURSE_FULL,
    MSG_COURSE_NOT_FOUND, MSG_NOT_BOOKED, MSG_NO_CREDIT,
};
pub use coach_service::{CoachManager, CoachProfile, CoachService};
pub use course_service::{CourseManager, CourseService, OwnCourse, OwnCourseDetail};
pub use credit_package_service::{CreditPackageManager, CreditPackageService};
pub use skill_service::{SkillManager, SkillService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
