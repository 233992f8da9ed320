//! HTTP request handlers.

pub mod admin_handler;
pub mod coach_handler;
pub mod course_handler;
pub mod credit_package_handler;
pub mod skill_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use coach_handler::coach_routes;
pub use course_handler::course_routes;
pub use credit_package_handler::credit_package_routes;
pub use skill_handler::skill_routes;
pub use user_handler::user_routes;
