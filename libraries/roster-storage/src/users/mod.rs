//! User accounts and credentials

use roster_core::{error::Result, CreateUser, RosterError, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, is_manager, created_at";

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        is_manager: row.get::<i64, _>("is_manager") != 0,
        created_at: row.get("created_at"),
    }
}

/// Create a user
///
/// Username and email are unique ignoring case; a clash is a `Conflict`.
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    user.validate()?;

    let username = user.username.trim();
    if find_by_username(pool, username).await?.is_some() {
        return Err(RosterError::conflict(format!(
            "username '{username}' is already taken"
        )));
    }

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, is_manager) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(user.email.trim())
    .bind(&user.password_hash)
    .bind(user.is_manager)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(username, error = %e, "failed to create user");
        RosterError::from(e)
    })?;

    let id = result.last_insert_rowid();
    tracing::info!(user_id = id, username, is_manager = user.is_manager, "user created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::storage("failed to retrieve created user"))
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Look up a user by login name, ignoring case
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
    ))
    .bind(username.trim())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY username COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Users flagged as managers (candidates for `manager_id`)
pub async fn get_managers(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE is_manager = 1 ORDER BY username COLLATE NOCASE"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Get a user's password hash for authentication
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(hash)
}

/// Replace a user's password hash
pub async fn set_password_hash(
    pool: &SqlitePool,
    user_id: UserId,
    password_hash: &str,
) -> Result<()> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RosterError::not_found("User", user_id));
    }

    tracing::info!(user_id, "password changed");
    Ok(())
}
