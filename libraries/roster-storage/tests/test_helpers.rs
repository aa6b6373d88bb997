//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so every pooled connection sees the same schema, constraints and triggers.

use roster_core::{CreateUser, Employee, EmployeeFields, EmployeeForm, User, UserId};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = roster_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        roster_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a user with a dummy password hash
pub async fn create_test_user(pool: &SqlitePool, username: &str, is_manager: bool) -> User {
    roster_storage::users::create(
        pool,
        CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$2b$04$not-a-real-hash".to_string(),
            is_manager,
        },
    )
    .await
    .expect("Failed to create test user")
}

/// Test fixture: A complete employee form
pub fn employee_form(full_name: &str, external_id: &str) -> EmployeeForm {
    EmployeeForm {
        full_name: Some(full_name.to_string()),
        joining_date: Some("2023-01-16".to_string()),
        external_id: Some(external_id.to_string()),
        role: Some("Engineer".to_string()),
        skill: Some("Rust".to_string()),
        team: Some("Platform".to_string()),
        grade: Some("G4".to_string()),
        designation: Some("Software Engineer".to_string()),
        location: Some("Bengaluru".to_string()),
        manager_id: None,
        user_id: None,
    }
}

/// Test fixture: Insert an employee directly, bypassing the access checks
pub async fn create_test_employee(
    pool: &SqlitePool,
    full_name: &str,
    external_id: &str,
    manager_id: Option<UserId>,
    user_id: Option<UserId>,
) -> Employee {
    let mut fields: EmployeeFields = employee_form(full_name, external_id)
        .validate()
        .expect("Fixture form is valid");
    fields.manager_id = manager_id;
    fields.user_id = user_id;

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let id = roster_storage::employees::insert(&mut *conn, &fields)
        .await
        .expect("Failed to create test employee");

    roster_storage::employees::get_by_id(pool, id)
        .await
        .unwrap()
        .expect("Employee was just inserted")
}

/// Count feedback rows for an employee straight from the table
pub async fn count_feedback(pool: &SqlitePool, employee_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count feedback")
}
