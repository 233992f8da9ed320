//! Domain layer - Core business entities and logic
//!
//! Domain models here are independent of the database entities and of
//! the HTTP request/response shapes.

pub mod booking;
pub mod catalog;
pub mod coach;
pub mod password;
pub mod user;

pub use booking::{
    current_year, month_from_name, month_window, Booking, BookingRecord, BookingStatus,
    CreditBalance, MonthlyRevenue,
};
pub use catalog::{CreditPackage, CreditPurchase, PurchaseRecord, Skill};
pub use coach::{
    Coach, CoachProfileDraft, CoachSummary, Course, CourseDraft, CourseListing, CourseStatus,
};
pub use password::Password;
pub use user::{User, UserRole};
