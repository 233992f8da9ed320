//! OpenAPI documentation configuration.
//!
//! The document is served as JSON at `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, coach_handler, course_handler, credit_package_handler, skill_handler,
    user_handler,
};
use crate::domain::{
    BookingRecord, Coach, CoachSummary, Course, CourseListing, CourseStatus, CreditPackage,
    MonthlyRevenue, PurchaseRecord, Skill, UserRole,
};
use crate::services::{BookingOverview, CoachProfile, OwnCourse, OwnCourseDetail};

/// OpenAPI documentation for the coaching API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coaching API",
        version = "0.1.0",
        description = "Coaching course marketplace: credit packages, coaches, courses and bookings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        credit_package_handler::list_packages,
        credit_package_handler::create_package,
        credit_package_handler::buy_package,
        credit_package_handler::delete_package,
        skill_handler::list_skills,
        skill_handler::create_skill,
        skill_handler::delete_skill,
        coach_handler::list_coaches,
        coach_handler::get_coach,
        coach_handler::get_coach_courses,
        course_handler::list_courses,
        course_handler::book_course,
        course_handler::cancel_booking,
        user_handler::signup,
        user_handler::login,
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::change_password,
        user_handler::get_purchases,
        user_handler::get_bookings,
        admin_handler::promote_to_coach,
        admin_handler::get_coach_profile,
        admin_handler::update_coach_profile,
        admin_handler::create_course,
        admin_handler::list_own_courses,
        admin_handler::get_own_course,
        admin_handler::update_own_course,
        admin_handler::get_revenue,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            Skill,
            CreditPackage,
            PurchaseRecord,
            Coach,
            CoachSummary,
            Course,
            CourseListing,
            CourseStatus,
            BookingRecord,
            MonthlyRevenue,
            // Service views
            BookingOverview,
            CoachProfile,
            OwnCourse,
            OwnCourseDetail,
            // Requests
            credit_package_handler::CreateCreditPackageRequest,
            skill_handler::CreateSkillRequest,
            user_handler::SignupRequest,
            user_handler::LoginRequest,
            user_handler::RenameRequest,
            user_handler::ChangePasswordRequest,
            admin_handler::PromoteRequest,
            admin_handler::UpdateCoachProfileRequest,
            admin_handler::CreateCourseRequest,
            admin_handler::CourseFields,
            // Responses
            coach_handler::CoachUserView,
            coach_handler::CoachDetailResponse,
            user_handler::SignupUser,
            user_handler::SignupResponse,
            user_handler::LoginUser,
            user_handler::LoginResponse,
            user_handler::ProfileResponse,
            admin_handler::CourseResponse,
            admin_handler::RevenueResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Credit packages", description = "Credit package catalog and purchases"),
        (name = "Skills", description = "Skill catalog"),
        (name = "Coaches", description = "Public coach directory"),
        (name = "Courses", description = "Course listing and booking"),
        (name = "Users", description = "Accounts, purchases and bookings"),
        (name = "Admin", description = "Coach promotion and coach self-service")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}
