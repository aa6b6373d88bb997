/// Bulk import/export API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{AccessPolicy, ReportingScope, Reports};
use roster_importer::{EmployeeImporter, ImportSummary, EXPORT_FILE_NAME};

/// POST /api/transfer/import
/// Body is a CSV document with a header row
pub async fn import_employees(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    body: Bytes,
) -> Result<Json<ImportSummary>> {
    let importer = EmployeeImporter::new(app_state.db.pool().clone());
    let summary = importer.import_reader(&body[..], auth.user()).await?;
    Ok(Json(summary))
}

/// GET /api/transfer/export
/// Every employee, not narrowed to the manager's reports (managers only)
pub async fn export_employees(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Response> {
    let reports = Reports::none();
    let policy = AccessPolicy::new(auth.user(), &reports, ReportingScope::Direct);
    policy.require(policy.can_export(), "only managers can export employees")?;

    let csv = roster_importer::export_csv(app_state.db.pool()).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
