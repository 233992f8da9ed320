//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod coach;
pub mod coach_link_skill;
pub mod course;
pub mod course_booking;
pub mod credit_package;
pub mod credit_purchase;
pub mod skill;
pub mod user;
