/// User account API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use roster_core::{CreateUser, RosterError, User};
use roster_storage::users;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_manager: bool,
}

/// POST /api/users
/// Create a login (managers only)
pub async fn create_user(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    if !auth.user().is_manager {
        return Err(RosterError::forbidden("only managers can create users").into());
    }
    if req.password.is_empty() {
        return Err(ServerError::Roster(RosterError::validation(
            "password",
            "is required",
        )));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    let user = users::create(
        app_state.db.pool(),
        CreateUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            is_manager: req.is_manager,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/managers
/// Candidates for an employee's manager
pub async fn list_managers(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    let managers = users::get_managers(app_state.db.pool()).await?;
    Ok(Json(managers))
}
