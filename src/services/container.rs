//! Service Container - Centralized service access.
//!
//! Every service is built once over a shared `Persistence` and handed out
//! as a trait object, so handlers and tests depend on the traits only.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookingManager, BookingService, CoachManager, CoachService,
    CourseManager, CourseService, CreditPackageManager, CreditPackageService, SkillManager,
    SkillService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn credit_packages(&self) -> Arc<dyn CreditPackageService>;

    fn skills(&self) -> Arc<dyn SkillService>;

    fn coaches(&self) -> Arc<dyn CoachService>;

    fn courses(&self) -> Arc<dyn CourseService>;

    fn bookings(&self) -> Arc<dyn BookingService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    credit_package_service: Arc<dyn CreditPackageService>,
    skill_service: Arc<dyn SkillService>,
    coach_service: Arc<dyn CoachService>,
    course_service: Arc<dyn CourseService>,
    booking_service: Arc<dyn BookingService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            credit_package_service: Arc::new(CreditPackageManager::new(uow.clone())),
            skill_service: Arc::new(SkillManager::new(uow.clone())),
            coach_service: Arc::new(CoachManager::new(uow.clone())),
            course_service: Arc::new(CourseManager::new(uow.clone())),
            booking_service: Arc::new(BookingManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn credit_packages(&self) -> Arc<dyn CreditPackageService> {
        self.credit_package_service.clone()
    }

    fn skills(&self) -> Arc<dyn SkillService> {
        self.skill_service.clone()
    }

    fn coaches(&self) -> Arc<dyn CoachService> {
        self.coach_service.clone()
    }

    fn courses(&self) -> Arc<dyn CourseService> {
        self.course_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }
}
