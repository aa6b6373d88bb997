//! Transactional employee import

use crate::spreadsheet::{self, RowRecord};
use crate::Result;
use roster_core::{AccessPolicy, ReportingScope, Reports, User, UserId};
use roster_storage::employees;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::io;
use std::path::Path;

/// A row left out of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line in the source file (the header is line 1)
    pub line: u64,
    pub external_id: Option<String>,
    pub reason: String,
}

/// Outcome of one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: Vec<SkippedRow>,
}

impl ImportSummary {
    /// Rows written (created or updated)
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

/// Imports employee spreadsheets on behalf of a manager
///
/// Existing employees (matched by employee ID) are updated in place and keep
/// their manager. New employees get the manager named in the row, matched by
/// username ignoring case, or the importing manager when there is no match.
/// All rows are written in one transaction.
pub struct EmployeeImporter {
    pool: SqlitePool,
}

impl EmployeeImporter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Import a CSV file from disk
    pub async fn import_file(&self, path: &Path, actor: &User) -> Result<ImportSummary> {
        let file = std::fs::File::open(path)?;
        self.import_reader(file, actor).await
    }

    /// Import CSV data from any reader
    ///
    /// The whole document is decoded before the database is touched.
    pub async fn import_reader<R: io::Read>(
        &self,
        reader: R,
        actor: &User,
    ) -> Result<ImportSummary> {
        let reports = Reports::none();
        let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
        policy.require(policy.can_import(), "only managers can import employees")?;

        let records = spreadsheet::read_rows(reader)?;
        self.import_records(records, actor).await
    }

    async fn import_records(&self, records: Vec<RowRecord>, actor: &User) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut managers: HashMap<String, Option<UserId>> = HashMap::new();

        let mut tx = self.pool.begin().await?;

        for record in records {
            let row = match record.row {
                Ok(row) => row,
                Err(reason) => {
                    tracing::warn!(line = record.line, %reason, "skipping unreadable row");
                    summary.skipped.push(SkippedRow {
                        line: record.line,
                        external_id: None,
                        reason,
                    });
                    continue;
                }
            };

            let valid = match row.validate() {
                Ok(valid) => valid,
                Err(issue) => {
                    tracing::warn!(
                        line = record.line,
                        external_id = row.external_id(),
                        %issue,
                        "skipping row"
                    );
                    summary.skipped.push(SkippedRow {
                        line: record.line,
                        external_id: row.external_id().map(str::to_string),
                        reason: issue.to_string(),
                    });
                    continue;
                }
            };

            let mut fields = valid.fields;
            match employees::find_by_external_id(&mut *tx, &fields.external_id).await? {
                Some(existing) => {
                    fields.manager_id = existing.manager_id;
                    fields.user_id = existing.user_id;
                    employees::update_row(&mut *tx, existing.id, &fields).await?;
                    summary.updated += 1;
                }
                None => {
                    let manager_id = match valid.manager_name {
                        Some(name) => {
                            // Same folding as the NOCASE username column
                            let key = name.to_ascii_lowercase();
                            match managers.get(&key) {
                                Some(cached) => *cached,
                                None => {
                                    let found = find_manager(&mut *tx, &name).await?;
                                    managers.insert(key, found);
                                    found
                                }
                            }
                        }
                        None => None,
                    };
                    fields.manager_id = Some(manager_id.unwrap_or(actor.id));
                    employees::insert(&mut *tx, &fields).await?;
                    summary.created += 1;
                }
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "import commit failed");
            e
        })?;

        tracing::info!(
            actor = actor.id,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped.len(),
            "employee import finished"
        );

        Ok(summary)
    }
}

/// Manager with this username, ignoring case
async fn find_manager(conn: &mut SqliteConnection, username: &str) -> Result<Option<UserId>> {
    let id = sqlx::query_scalar::<_, UserId>(
        "SELECT id FROM users WHERE username = ? COLLATE NOCASE AND is_manager = 1",
    )
    .bind(username)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(id)
}
