//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use echocity_api::{middleware::AppState, middleware::auth_middleware, router as api_router};
use echocity_common::config::{
    AdvisoryConfig, AuthConfig, Config, DatabaseConfig, ServerConfig, StorageSettings,
};
use echocity_common::storage::LocalStorage;
use echocity_core::{
    AccountService, AdvisoryService, CategoryService, ComplaintService, DepartmentService,
    GeminiClient, RoleResolver, UploadService,
};
use echocity_db::entities::{complaint, profile, user};
use echocity_db::repositories::{
    CategoryRepository, ComplaintRepository, DepartmentRepository, ProfileRepository,
    UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "https://example.com".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig::default(),
        storage: StorageSettings::default(),
        advisory: AdvisoryConfig::default(),
    }
}

/// Create test app state over a prepared mock database.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let config = create_test_config();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let department_repo = DepartmentRepository::new(Arc::clone(&db));

    let account_service = AccountService::new(user_repo, profile_repo.clone());
    let role_resolver = RoleResolver::new(profile_repo, &config);
    let complaint_service = ComplaintService::new(complaint_repo, category_repo.clone());
    let category_service = CategoryService::new(category_repo);
    let department_service = DepartmentService::new(department_repo);
    let advisory_service =
        AdvisoryService::new(Arc::new(GeminiClient::new(config.advisory.clone())));
    let upload_service = UploadService::new(Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    )));

    AppState {
        account_service,
        role_resolver,
        complaint_service,
        category_service,
        department_service,
        advisory_service,
        upload_service,
    }
}

/// Create the test router over a prepared mock database.
fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn test_user(token: &str) -> user::Model {
    user::Model {
        id: "01hq2w3e4r5t6y7u8i9o0p1q2r".to_string(),
        username: "asha".to_string(),
        username_lower: "asha".to_string(),
        token: Some(token.to_string()),
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    }
}

fn test_profile(user_id: &str, role: profile::AppRole) -> profile::Model {
    profile::Model {
        user_id: user_id.to_string(),
        password: None,
        full_name: "Asha Rao".to_string(),
        phone: None,
        address: None,
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: None,
        role,
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_error() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_signup_with_short_password_is_rejected() {
    let app = create_test_router(empty_mock_db());

    // Validation fails before any database access
    let response = app
        .oneshot(
            Request::builder()
                .uri("/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"asha","password":"short","fullName":"Asha Rao","city":"Pune","state":"Maharashtra"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signin_with_unknown_user_returns_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/signin")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"nonexistent","password":"wrongpassword"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_complaints_require_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_stats_require_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_own_complaints_with_token() {
    // First query resolves the bearer token, second lists complaints
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("testtoken")]])
        .append_query_results([Vec::<complaint::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints")
                .method("GET")
                .header("Authorization", "Bearer testtoken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_gate_rejects_citizen() {
    let user = test_user("citizentoken");
    let profile = test_profile(&user.id, profile::AppRole::Citizen);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user]])
        .append_query_results([vec![profile]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/stats")
                .method("GET")
                .header("Authorization", "Bearer citizentoken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_categories_list_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<echocity_db::entities::category::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_advisory_requires_auth() {
    let app = create_test_router(empty_mock_db());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/advisory/categorize")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"garbage pile on my street"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
