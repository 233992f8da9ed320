//! Shared setup for integration tests: an in-memory SQLite database with
//! migrations applied, the real services over it and the HTTP router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use coaching_api::api::{create_router, AppState};
use coaching_api::config::Config;
use coaching_api::domain::{CoachProfileDraft, Course, CourseDraft, CreditPackage, Skill, User};
use coaching_api::infra::Database;
use coaching_api::services::{ServiceContainer, Services};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_PASSWORD: &str = "Passw0rd";

pub struct TestApp {
    pub router: Router,
    pub services: Arc<Services>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = Database::connect_url("sqlite::memory:")
            .await
            .expect("open in-memory database");
        db.run_migrations().await.expect("apply migrations");

        let config = Config::new("sqlite::memory:", TEST_SECRET);
        let services = Arc::new(Services::from_connection(db.get_connection(), config));
        let state = AppState::new(services.clone(), Arc::new(db));

        Self {
            router: create_router(state),
            services,
        }
    }

    /// Send one request through the router and decode the JSON body (Null when empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("call router");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    /// Register a USER and return it with a fresh token.
    pub async fn user(&self, name: &str) -> (User, String) {
        let auth = self.services.auth();
        let user = auth
            .signup(
                name.to_string(),
                format!("{}@example.com", name.to_lowercase()),
                TEST_PASSWORD.to_string(),
            )
            .await
            .expect("signup");
        let token = auth.issue_token(&user).expect("issue token");
        (user, token)
    }

    pub async fn package(&self, name: &str, credit_amount: i32, price: i32) -> CreditPackage {
        self.services
            .credit_packages()
            .create(name.to_string(), credit_amount, price)
            .await
            .expect("create package")
    }

    pub async fn buy(&self, user_id: Uuid, package_id: Uuid) {
        self.services
            .credit_packages()
            .buy(user_id, package_id)
            .await
            .expect("buy package");
    }

    pub async fn skill(&self, name: &str) -> Skill {
        self.services
            .skills()
            .create(name.to_string())
            .await
            .expect("create skill")
    }

    /// Register a user and promote them to coach.
    pub async fn coach(&self, name: &str) -> (User, String) {
        let (user, token) = self.user(name).await;
        let (user, _) = self
            .services
            .coaches()
            .promote(
                user.id,
                CoachProfileDraft {
                    experience_years: 5,
                    description: "Certified instructor".to_string(),
                    profile_image_url: None,
                },
            )
            .await
            .expect("promote");
        (user, token)
    }

    pub async fn course(&self, coach_id: Uuid, skill_id: Uuid, max_participants: i32) -> Course {
        let start_at = Utc::now() + Duration::days(7);
        self.services
            .courses()
            .create(
                coach_id,
                CourseDraft {
                    skill_id,
                    name: "Morning yoga".to_string(),
                    description: "Stretch and breathe".to_string(),
                    start_at,
                    end_at: start_at + Duration::hours(1),
                    max_participants,
                    meeting_url: "https://meet.example.com/yoga".to_string(),
                },
            )
            .await
            .expect("create course")
    }
}
