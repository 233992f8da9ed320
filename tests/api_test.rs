//! HTTP-level tests: routing, envelope, status mapping, authentication
//! and the coach gate, over the real router and an in-memory store.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use coaching_api::config::{MSG_INVALID_FIELDS, MSG_INVALID_ID, MSG_INVALID_PASSWORD};
use coaching_api::domain::UserRole;
use coaching_api::services::{ServiceContainer, MSG_ALREADY_BOOKED};

use common::{TestApp, TEST_PASSWORD};

// =============================================================================
// Infrastructure endpoints
// =============================================================================

#[tokio::test]
async fn test_healthcheck() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_unknown_route_is_404_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/courses/{course_id}"].is_object());
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_signup_then_login_issues_matching_token() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/users/signup",
            None,
            json!({"name": "Lee", "email": "lee@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["user"]["name"], "Lee");
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/users/login",
            None,
            json!({"email": "lee@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Lee");

    let token = body["data"]["token"].as_str().unwrap();
    let claims = app.services.auth().verify_token(token).unwrap();
    assert_eq!(claims.sub.to_string(), user_id);
    assert_eq!(claims.role(), UserRole::User);
}

#[tokio::test]
async fn test_signup_rejections() {
    let app = TestApp::spawn().await;
    app.user("Lee").await;

    let (status, body) = app
        .post(
            "/api/users/signup",
            None,
            json!({"name": "Kim", "email": "kim@example.com", "password": "weakpass"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], MSG_INVALID_PASSWORD);

    let (status, body) = app
        .post(
            "/api/users/signup",
            None,
            json!({"name": "K", "email": "kim@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], MSG_INVALID_FIELDS);

    let (status, body) = app
        .post(
            "/api/users/signup",
            None,
            json!({"name": "Lee2", "email": "lee@example.com", "password": TEST_PASSWORD}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::spawn().await;
    app.user("Lee").await;

    let (status, body) = app
        .post(
            "/api/users/login",
            None,
            json!({"email": "lee@example.com", "password": "Wrongpass1"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(Method::POST, "/api/users/login", None, Some(json!("not an object")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], MSG_INVALID_FIELDS);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::spawn().await;
    let (_, token) = app.user("Lee").await;

    let (status, body) = app.get("/api/users/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "failed");

    let (status, _) = app.get("/api/users/profile", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"email": "lee@example.com", "name": "Lee"}));
}

#[tokio::test]
async fn test_rename_to_same_name_rejected() {
    let app = TestApp::spawn().await;
    let (_, token) = app.user("Lee").await;

    let (status, _) = app
        .request(Method::PUT, "/api/users/profile", Some(&token), Some(json!({"name": "Lee"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request(Method::PUT, "/api/users/profile", Some(&token), Some(json!({"name": "Kim"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_credit_package_lifecycle() {
    let app = TestApp::spawn().await;
    let (_, token) = app.user("Lee").await;

    let payload = json!({"name": "7 lessons", "credit_amount": 7, "price": 1400});
    let (status, body) = app.post("/api/credit-package", None, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let package_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.post("/api/credit-package", None, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get("/api/credit-package", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let uri = format!("/api/credit-package/{}", package_id);
    let (status, _) = app.post(&uri, None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post(&uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post(&uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get("/api/users/credit-package", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "7 lessons");
    assert_eq!(body["data"][0]["purchased_credits"], 7);

    // Purchased packages cannot be deleted
    let (status, _) = app.request(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_skill_taught_by_a_course_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let (coach, _) = app.coach("Coach1").await;
    let taught = app.skill("Yoga").await;
    let unused = app.skill("Pilates").await;
    app.course(coach.id, taught.id, 5).await;

    let uri = format!("/api/coaches/skill/{}", taught.id);
    let (status, body) = app.request(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "failed");

    let uri = format!("/api/coaches/skill/{}", unused.id);
    let (status, _) = app.request(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/coaches/skill", None).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Yoga"]);
}

#[tokio::test]
async fn test_invalid_path_id_is_400() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .request(Method::DELETE, "/api/coaches/skill/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], MSG_INVALID_ID);

    let missing = format!("/api/coaches/skill/{}", uuid::Uuid::new_v4());
    let (status, _) = app.request(Method::DELETE, &missing, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_coach_list_paging_validation() {
    let app = TestApp::spawn().await;
    app.coach("Coach1").await;
    app.coach("Coach2").await;

    let (status, body) = app.get("/api/coaches?per=1&page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/coaches?per=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/coaches?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // An offset past the signed 64-bit range is rejected before reaching the store
    let (status, body) = app
        .get("/api/coaches?per=1&page=18446744073709551615", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");

    let (status, body) = app.get("/api/coaches?per=100&page=1000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

fn skill_set(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body["data"]["skill_ids"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|id| id.as_str().map(str::to_string))
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn test_coach_profile_update_replaces_skill_set() {
    let app = TestApp::spawn().await;
    let (_, token) = app.coach("Coach1").await;
    let yoga = app.skill("Yoga").await.id.to_string();
    let pilates = app.skill("Pilates").await.id.to_string();

    let profile = |skill_ids: Vec<String>| {
        json!({
            "experience_years": 8,
            "description": "Vinyasa and mat work",
            "profile_image_url": "https://cdn.example.com/coach1.png",
            "skill_ids": skill_ids,
        })
    };

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/admin/coaches",
            Some(&token),
            Some(profile(vec![yoga.clone(), pilates.clone()])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let mut both = vec![yoga.clone(), pilates.clone()];
    both.sort();
    assert_eq!(skill_set(&body), both);
    assert_eq!(body["data"]["experience_years"], 8);

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/admin/coaches",
            Some(&token),
            Some(profile(vec![pilates.clone()])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skill_set(&body), vec![pilates.clone()]);

    // An unknown skill rolls back the whole update
    let unknown = uuid::Uuid::new_v4().to_string();
    let mut rejected = profile(vec![yoga.clone(), unknown]);
    rejected["experience_years"] = json!(20);
    let (status, body) = app
        .request(Method::PUT, "/api/admin/coaches", Some(&token), Some(rejected))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");

    let (status, body) = app.get("/api/admin/coaches", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(skill_set(&body), vec![pilates]);
    assert_eq!(body["data"]["experience_years"], 8);
}

// =============================================================================
// Coach gate and booking over HTTP
// =============================================================================

#[tokio::test]
async fn test_coach_routes_follow_current_role() {
    let app = TestApp::spawn().await;
    let (user, token) = app.user("Lee").await;

    let (status, body) = app.get("/api/admin/coaches", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "failed");

    let (status, body) = app
        .post(
            &format!("/api/admin/coaches/{}", user.id),
            None,
            json!({"experience_years": 3, "description": "Yoga teacher"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "COACH");

    // The token predates the promotion; the role is re-read per request
    let (status, body) = app.get("/api/admin/coaches", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["experience_years"], 3);

    let (status, _) = app
        .post(
            &format!("/api/admin/coaches/{}", user.id),
            None,
            json!({"experience_years": 3, "description": "Yoga teacher"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_course_over_http() {
    let app = TestApp::spawn().await;
    let (coach, coach_token) = app.coach("Coach1").await;
    let skill = app.skill("Yoga").await;
    let package = app.package("3 lessons", 3, 600).await;
    let (user, token) = app.user("Amy").await;
    app.buy(user.id, package.id).await;

    let (status, body) = app
        .post(
            "/api/admin/coaches/courses",
            Some(&coach_token),
            json!({
                "user_id": coach.id,
                "skill_id": skill.id,
                "name": "Morning yoga",
                "description": "Stretch",
                "start_at": "2030-03-01T09:00:00Z",
                "end_at": "2030-03-01T10:00:00Z",
                "max_participants": 5,
                "meeting_url": "https://meet.example.com/yoga"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["course"].get("meeting_url").is_none());
    let course_uri = format!("/api/courses/{}", body["data"]["course"]["id"].as_str().unwrap());

    let (status, body) = app.post(&course_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success"}));

    let (status, body) = app.post(&course_uri, Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], MSG_ALREADY_BOOKED);

    let (status, body) = app.get("/api/users/courses", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["credit_remain"], 2);
    assert_eq!(body["data"]["credit_usage"], 1);
    assert_eq!(body["data"]["course_booking"][0]["status"], "active");

    let (status, body) = app.get("/api/admin/coaches/courses", Some(&coach_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["participants"], 1);
    assert_eq!(body["data"][0]["status"], "upcoming");

    let (status, _) = app.request(Method::DELETE, &course_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request(Method::DELETE, &course_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_revenue_requires_known_month() {
    let app = TestApp::spawn().await;
    let (_, coach_token) = app.coach("Coach1").await;

    let (status, _) = app.get("/api/admin/coaches/revenue", Some(&coach_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get("/api/admin/coaches/revenue?month=smarch", Some(&coach_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .get("/api/admin/coaches/revenue?month=march&year=2024", Some(&coach_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["total"],
        json!({"revenue": 0, "participants": 0, "course_count": 0})
    );
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let app = TestApp::spawn().await;

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/courses")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "GET")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
