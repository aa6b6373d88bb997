/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use roster_core::{CreateUser, EmployeeForm, ReportingScope, User};
use roster_server::{services::AuthService, state::AppState};
use roster_storage::Database;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// A router over a file-backed database that is removed on drop
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_scope(ReportingScope::Extended).await
    }

    pub async fn with_scope(scope: ReportingScope) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
        let db = Arc::new(Database::new(&db_url).await.unwrap());

        let auth_service = Arc::new(
            AuthService::new("test-secret-key".to_string(), 1, 1).with_bcrypt_cost(4),
        );

        let app_state = AppState::new(Arc::clone(&db), Arc::clone(&auth_service), scope);

        Self {
            router: roster_server::create_router(app_state),
            db,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Create a user whose password is [`TEST_PASSWORD`]
    pub async fn create_user(&self, username: &str, is_manager: bool) -> User {
        let password_hash = self.auth_service.hash_password(TEST_PASSWORD).unwrap();
        roster_storage::users::create(
            self.db.pool(),
            CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash,
                is_manager,
            },
        )
        .await
        .unwrap()
    }

    /// Access token for a user, minted directly
    pub fn token_for(&self, user: &User) -> String {
        self.auth_service.create_access_token(user.id).unwrap()
    }

    /// Create an employee record straight through storage
    pub async fn create_employee(
        &self,
        name: &str,
        external_id: &str,
        manager: &User,
        login: Option<&User>,
    ) -> roster_core::Employee {
        let form = EmployeeForm {
            full_name: Some(name.to_string()),
            joining_date: Some("2023-01-16".to_string()),
            external_id: Some(external_id.to_string()),
            role: Some("Engineer".to_string()),
            skill: Some("Rust".to_string()),
            team: Some("Platform".to_string()),
            grade: Some("G4".to_string()),
            designation: Some("Software Engineer".to_string()),
            location: Some("Pune".to_string()),
            manager_id: Some(manager.id),
            user_id: login.map(|u| u.id),
        };
        roster_storage::employees::create(self.db.pool(), form, manager)
            .await
            .unwrap()
    }

    /// Send a request and return status plus JSON body (`Null` when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}
