//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, BookingService, CoachService, CourseService, CreditPackageService,
    ServiceContainer, Services, SkillService, UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    services: Arc<dyn ServiceContainer>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build every service over the database connection.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::new(Arc::new(services), database)
    }

    /// Create state over an already built service container.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.services.auth()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.services.users()
    }

    pub fn credit_packages(&self) -> Arc<dyn CreditPackageService> {
        self.services.credit_packages()
    }

    pub fn skills(&self) -> Arc<dyn SkillService> {
        self.services.skills()
    }

    pub fn coaches(&self) -> Arc<dyn CoachService> {
        self.services.coaches()
    }

    pub fn courses(&self) -> Arc<dyn CourseService> {
        self.services.courses()
    }

    pub fn bookings(&self) -> Arc<dyn BookingService> {
        self.services.bookings()
    }
}
