/// Employees API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use roster_core::{Employee, EmployeeForm, EmployeeId, StorageContext};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/employees
/// Every employee for managers, the caller's own record otherwise
pub async fn list_employees(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Employee>>> {
    let employees = app_state.context(auth).list_employees().await?;
    Ok(Json(employees))
}

/// POST /api/employees
pub async fn create_employee(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(form): Json<EmployeeForm>,
) -> Result<(StatusCode, Json<Employee>)> {
    let employee = app_state.context(auth).create_employee(form).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/employees/search?q=
pub async fn search_employees(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Employee>>> {
    let employees = app_state.context(auth).search_employees(&query.q).await?;
    Ok(Json(employees))
}

/// GET /api/employees/:id
pub async fn get_employee(
    Path(id): Path<EmployeeId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Employee>> {
    let employee = app_state.context(auth).get_employee(id).await?;
    Ok(Json(employee))
}

/// PUT /api/employees/:id
pub async fn update_employee(
    Path(id): Path<EmployeeId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(form): Json<EmployeeForm>,
) -> Result<Json<Employee>> {
    let employee = app_state.context(auth).update_employee(id, form).await?;
    Ok(Json(employee))
}

/// DELETE /api/employees/:id
/// Removes the employee and all feedback about them
pub async fn delete_employee(
    Path(id): Path<EmployeeId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state.context(auth).delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
