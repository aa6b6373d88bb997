/// Dashboard API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use roster_core::{Dashboard, StorageContext};

/// GET /api/dashboard
pub async fn dashboard(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Dashboard>> {
    let dashboard = app_state.context(auth).dashboard().await?;
    Ok(Json(dashboard))
}
