//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Provides atomic operations for multi-row workflows (booking,
//!   promotion, coach skill replacement)

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    booking_repository, coach_repository, course_repository, credit_repository, skill_repository,
    user_repository, BookingRepository, BookingStore, CoachRepository, CoachStore,
    CourseRepository, CourseStore, CreditRepository, CreditStore, SkillRepository, SkillStore,
    UserRepository, UserStore,
};
use crate::domain::{Booking, Coach, CoachProfileDraft, Course, CourseDraft, User, UserRole};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, mock at the service level or use an in-memory SQLite database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn skills(&self) -> Arc<dyn SkillRepository>;

    fn credits(&self) -> Arc<dyn CreditRepository>;

    fn coaches(&self) -> Arc<dyn CoachRepository>;

    fn courses(&self) -> Arc<dyn CourseRepository>;

    fn bookings(&self) -> Arc<dyn BookingRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    /// The closure must only touch the store through the context it is
    /// given.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    pub fn coaches(&self) -> TxCoachRepository<'_> {
        TxCoachRepository { txn: self.txn }
    }

    pub fn courses(&self) -> TxCourseRepository<'_> {
        TxCourseRepository { txn: self.txn }
    }

    pub fn bookings(&self) -> TxBookingRepository<'_> {
        TxBookingRepository { txn: self.txn }
    }

    pub fn credits(&self) -> TxCreditRepository<'_> {
        TxCreditRepository { txn: self.txn }
    }

    pub fn skills(&self) -> TxSkillRepository<'_> {
        TxSkillRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    skill_repo: Arc<SkillStore>,
    credit_repo: Arc<CreditStore>,
    coach_repo: Arc<CoachStore>,
    course_repo: Arc<CourseStore>,
    booking_repo: Arc<BookingStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            skill_repo: Arc::new(SkillStore::new(db.clone())),
            credit_repo: Arc::new(CreditStore::new(db.clone())),
            coach_repo: Arc::new(CoachStore::new(db.clone())),
            course_repo: Arc::new(CourseStore::new(db.clone())),
            booking_repo: Arc::new(BookingStore::new(db.clone())),
            db,
        }
    }

    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        // SQLite rejects isolation settings; its transactions are serializable anyway
        let txn = match self.db.get_database_backend() {
            DatabaseBackend::Sqlite => self.db.begin().await,
            _ => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::ReadCommitted),
                        Some(AccessMode::ReadWrite),
                    )
                    .await
            }
        };
        txn.map_err(AppError::from)
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn skills(&self) -> Arc<dyn SkillRepository> {
        self.skill_repo.clone()
    }

    fn credits(&self) -> Arc<dyn CreditRepository> {
        self.credit_repo.clone()
    }

    fn coaches(&self) -> Arc<dyn CoachRepository> {
        self.coach_repo.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.course_repo.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.booking_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.begin().await?;
        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxUserRepository<'_> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::find_by_id(self.txn, id).await
    }

    /// Read the user row and hold its lock until the transaction ends
    pub async fn lock_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_repository::lock_by_id(self.txn, id).await
    }

    pub async fn set_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        user_repository::set_role(self.txn, id, role).await
    }
}

/// Transaction-aware coach repository.
pub struct TxCoachRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCoachRepository<'_> {
    pub async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Coach>> {
        coach_repository::find_by_user_id(self.txn, user_id).await
    }

    pub async fn create(&self, user_id: Uuid, draft: CoachProfileDraft) -> AppResult<Coach> {
        coach_repository::create(self.txn, user_id, draft).await
    }

    pub async fn update_profile(&self, coach_id: Uuid, draft: CoachProfileDraft) -> AppResult<Coach> {
        coach_repository::update_profile(self.txn, coach_id, draft).await
    }

    pub async fn replace_skills(&self, coach_id: Uuid, skill_ids: &[Uuid]) -> AppResult<()> {
        coach_repository::replace_skills(self.txn, coach_id, skill_ids).await
    }
}

/// Transaction-aware course repository.
pub struct TxCourseRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCourseRepository<'_> {
    /// Read the course row and hold its lock until the transaction ends
    pub async fn lock_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        course_repository::lock_by_id(self.txn, id).await
    }

    pub async fn update(&self, id: Uuid, draft: CourseDraft) -> AppResult<Course> {
        course_repository::update(self.txn, id, draft).await
    }
}

/// Transaction-aware booking repository.
pub struct TxBookingRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxBookingRepository<'_> {
    pub async fn find_active(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<Booking>> {
        booking_repository::find_active(self.txn, user_id, course_id).await
    }

    pub async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        booking_repository::count_active_by_user(self.txn, user_id).await
    }

    pub async fn count_active_by_course(&self, course_id: Uuid) -> AppResult<u64> {
        booking_repository::count_active_by_course(self.txn, course_id).await
    }

    pub async fn create(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Booking> {
        booking_repository::create(self.txn, user_id, course_id).await
    }
}

/// Transaction-aware credit repository.
pub struct TxCreditRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCreditRepository<'_> {
    pub async fn total_purchased_credits(&self, user_id: Uuid) -> AppResult<i64> {
        credit_repository::total_purchased_credits(self.txn, user_id).await
    }
}

/// Transaction-aware skill repository.
pub struct TxSkillRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxSkillRepository<'_> {
    pub async fn count_existing(&self, ids: &[Uuid]) -> AppResult<u64> {
        skill_repository::count_existing(self.txn, ids).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
