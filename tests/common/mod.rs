//! Test helpers for Web API integration tests.

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use tempfile::TempDir;

use cloudvault::auth::{TokenSigner, TokenVerifier};
use cloudvault::web::middleware::JwtState;
use cloudvault::web::{create_router, AppState};
use cloudvault::{Database, FileStorage};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Handles the test server keeps alive for the duration of a test.
pub struct TestContext {
    pub db: Database,
    pub signer: TokenSigner,
    _storage_dir: TempDir,
}

/// Create a test server with an in-memory database and temp storage.
pub async fn create_test_server() -> (TestServer, TestContext) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let storage_dir = TempDir::new().expect("Failed to create storage dir");
    let storage = FileStorage::new(storage_dir.path()).expect("Failed to create storage");

    let signer = TokenSigner::new(TEST_SECRET, Algorithm::HS256, 60);
    let jwt_state = Arc::new(JwtState::new(TokenVerifier::new(
        TEST_SECRET,
        Algorithm::HS256,
    )));

    let app_state = Arc::new(AppState {
        db: db.clone(),
        storage,
        signer: signer.clone(),
        public_base_url: "http://localhost:8000".to_string(),
        max_upload_size: 10 * 1024 * 1024,
    });

    let router = create_router(app_state, jwt_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (
        server,
        TestContext {
            db,
            signer,
            _storage_dir: storage_dir,
        },
    )
}

/// Register an account.
pub async fn register_user(server: &TestServer, name: &str, email: &str, password: &str) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .await;
    response.assert_status_ok();
}

/// Log in and return the access token.
pub async fn login_user(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

/// Register and log in, returning (user id, access token).
pub async fn signup(server: &TestServer, name: &str, email: &str) -> (String, String) {
    register_user(server, name, email, "password123").await;
    let token = login_user(server, email, "password123").await;

    let me: Value = server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await
        .json();
    let user_id = me["id"].as_str().expect("user id").to_string();

    (user_id, token)
}

/// Upload a small text file and return its id.
pub async fn upload_file(server: &TestServer, token: &str, name: &str, content: &[u8]) -> String {
    use axum_test::multipart::{MultipartForm, Part};

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(name)
            .mime_type("text/plain"),
    );

    let response = server
        .post("/api/files")
        .authorization_bearer(token)
        .multipart(form)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["id"].as_str().expect("file id").to_string()
}
