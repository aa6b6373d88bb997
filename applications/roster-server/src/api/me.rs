/// Current user API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use roster_core::{Employee, StorageContext, User};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    /// The employee record linked to this login, if any
    pub employee: Option<Employee>,
}

/// GET /api/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MeResponse>> {
    let storage = app_state.context(auth);
    let employee = storage.own_employee().await?;

    Ok(Json(MeResponse {
        user: storage.actor().clone(),
        employee,
    }))
}
