/// Feedback API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use roster_core::{EmployeeId, Feedback, FeedbackForm, FeedbackId, StorageContext};

/// GET /api/feedback
/// Authored feedback for managers, received feedback for everyone else
pub async fn list_feedback(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Feedback>>> {
    let feedback = app_state.context(auth).list_feedback().await?;
    Ok(Json(feedback))
}

/// GET /api/employees/:id/feedback
pub async fn list_employee_feedback(
    Path(employee_id): Path<EmployeeId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Feedback>>> {
    let feedback = app_state
        .context(auth)
        .list_employee_feedback(employee_id)
        .await?;
    Ok(Json(feedback))
}

/// POST /api/employees/:id/feedback
pub async fn create_feedback(
    Path(employee_id): Path<EmployeeId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(form): Json<FeedbackForm>,
) -> Result<(StatusCode, Json<Feedback>)> {
    let feedback = app_state
        .context(auth)
        .create_feedback(employee_id, form)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// PUT /api/feedback/:id
pub async fn update_feedback(
    Path(id): Path<FeedbackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(form): Json<FeedbackForm>,
) -> Result<Json<Feedback>> {
    let feedback = app_state.context(auth).update_feedback(id, form).await?;
    Ok(Json(feedback))
}

/// DELETE /api/feedback/:id
pub async fn delete_feedback(
    Path(id): Path<FeedbackId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state.context(auth).delete_feedback(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
