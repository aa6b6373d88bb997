//! Employee export
//!
//! Exports every employee regardless of who asks. Callers that need scoping
//! must filter before calling.

use crate::spreadsheet::{self, EmployeeRow};
use crate::Result;
use roster_storage::{employees, users};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Download name for exported data
pub const EXPORT_FILE_NAME: &str = "employee_data.csv";

/// One row per employee, managers rendered as usernames
pub async fn export_rows(pool: &SqlitePool) -> Result<Vec<EmployeeRow>> {
    let usernames: HashMap<_, _> = users::get_all(pool)
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect();

    let rows = employees::get_all(pool)
        .await?
        .iter()
        .map(|employee| {
            let manager = employee
                .manager_id
                .and_then(|id| usernames.get(&id))
                .map(String::as_str);
            EmployeeRow::from_employee(employee, manager)
        })
        .collect();

    Ok(rows)
}

/// All employees as a CSV document
pub async fn export_csv(pool: &SqlitePool) -> Result<Vec<u8>> {
    let rows = export_rows(pool).await?;

    let mut out = Vec::new();
    spreadsheet::write_rows(&mut out, &rows)?;

    tracing::info!(rows = rows.len(), "employee export written");

    Ok(out)
}
