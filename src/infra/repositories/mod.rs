//! Repository layer - Data access abstraction
//!
//! Each repository exposes a mockable trait backed by a `*Store` over the
//! pooled connection. Queries that must also run inside a transaction are
//! free functions generic over `ConnectionTrait`, shared by the stores and
//! the transaction-scoped repositories in `unit_of_work`.

pub(crate) mod booking_repository;
pub(crate) mod coach_repository;
pub(crate) mod course_repository;
pub(crate) mod credit_repository;
pub(crate) mod entities;
pub(crate) mod skill_repository;
pub(crate) mod user_repository;

pub use booking_repository::{BookingRepository, BookingStore};
pub use coach_repository::{CoachRepository, CoachStore};
pub use course_repository::{CourseRepository, CourseStore};
pub use credit_repository::{CreditRepository, CreditStore};
pub use skill_repository::{SkillRepository, SkillStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use coach_repository::MockCoachRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use credit_repository::MockCreditRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use skill_repository::MockSkillRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
