//! Unit of Work double for service unit tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    BookingRepository, CoachRepository, CourseRepository, CreditRepository,
    MockBookingRepository, MockCoachRepository, MockCourseRepository, MockCreditRepository,
    MockSkillRepository, MockUserRepository, SkillRepository, TransactionContext, TxFuture,
    UnitOfWork, UserRepository,
};

/// Wraps repository mocks. Repositories left unset have no expectations,
/// so any call to them fails the test.
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    skills: Arc<MockSkillRepository>,
    credits: Arc<MockCreditRepository>,
    coaches: Arc<MockCoachRepository>,
    courses: Arc<MockCourseRepository>,
    bookings: Arc<MockBookingRepository>,
}

#[derive(Default)]
pub(crate) struct TestUnitOfWorkBuilder {
    users: Option<MockUserRepository>,
    skills: Option<MockSkillRepository>,
    credits: Option<MockCreditRepository>,
    coaches: Option<MockCoachRepository>,
    courses: Option<MockCourseRepository>,
    bookings: Option<MockBookingRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn builder() -> TestUnitOfWorkBuilder {
        TestUnitOfWorkBuilder::default()
    }
}

impl TestUnitOfWorkBuilder {
    pub(crate) fn users(mut self, repo: MockUserRepository) -> Self {
        self.users = Some(repo);
        self
    }

    pub(crate) fn skills(mut self, repo: MockSkillRepository) -> Self {
        self.skills = Some(repo);
        self
    }

    pub(crate) fn credits(mut self, repo: MockCreditRepository) -> Self {
        self.credits = Some(repo);
        self
    }

    pub(crate) fn coaches(mut self, repo: MockCoachRepository) -> Self {
        self.coaches = Some(repo);
        self
    }

    pub(crate) fn courses(mut self, repo: MockCourseRepository) -> Self {
        self.courses = Some(repo);
        self
    }

    pub(crate) fn bookings(mut self, repo: MockBookingRepository) -> Self {
        self.bookings = Some(repo);
        self
    }

    pub(crate) fn build(self) -> TestUnitOfWork {
        TestUnitOfWork {
            users: Arc::new(self.users.unwrap_or_default()),
            skills: Arc::new(self.skills.unwrap_or_default()),
            credits: Arc::new(self.credits.unwrap_or_default()),
            coaches: Arc::new(self.coaches.unwrap_or_default()),
            courses: Arc::new(self.courses.unwrap_or_default()),
            bookings: Arc::new(self.bookings.unwrap_or_default()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn skills(&self) -> Arc<dyn SkillRepository> {
        self.skills.clone()
    }

    fn credits(&self) -> Arc<dyn CreditRepository> {
        self.credits.clone()
    }

    fn coaches(&self) -> Arc<dyn CoachRepository> {
        self.coaches.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.courses.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // Transactional paths are covered against SQLite
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}
