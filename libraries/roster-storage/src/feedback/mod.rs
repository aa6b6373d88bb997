//! Performance feedback

use crate::{employees, hierarchy};
use chrono::Utc;
use roster_core::{
    error::Result, AccessPolicy, EmployeeId, Feedback, FeedbackForm, FeedbackId, Period, Rating,
    ReportingScope, Reports, RosterError, User, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const FEEDBACK_COLUMNS: &str =
    "id, employee_id, provided_by_id, rating, feedback_text, period, feedback_date";

fn feedback_from_row(row: &SqliteRow) -> Result<Feedback> {
    Ok(Feedback {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        provided_by_id: row.get("provided_by_id"),
        rating: Rating::new(row.get("rating"))?,
        feedback_text: row.get("feedback_text"),
        period: Period::parse(&row.get::<String, _>("period"))?,
        feedback_date: row.try_get("feedback_date")?,
    })
}

fn write_failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> RosterError {
    move |e| {
        tracing::error!(operation, error = %e, "feedback write failed");
        e.into()
    }
}

// ============================================================================
// Unchecked reads
// ============================================================================

pub async fn get_by_id(pool: &SqlitePool, id: FeedbackId) -> Result<Option<Feedback>> {
    let row = sqlx::query(&format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(feedback_from_row).transpose()
}

/// Feedback about one employee, newest first
pub async fn for_employee(pool: &SqlitePool, employee_id: EmployeeId) -> Result<Vec<Feedback>> {
    let rows = sqlx::query(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE employee_id = ? \
         ORDER BY feedback_date DESC, id DESC"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(feedback_from_row).collect()
}

/// Feedback written by one user, newest first
pub async fn authored_by(pool: &SqlitePool, author_id: UserId) -> Result<Vec<Feedback>> {
    let rows = sqlx::query(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE provided_by_id = ? \
         ORDER BY feedback_date DESC, id DESC"
    ))
    .bind(author_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(feedback_from_row).collect()
}

// ============================================================================
// Checked operations
// ============================================================================

/// Managers get what they wrote for their reports; others get what they received
pub async fn list_for_actor(
    pool: &SqlitePool,
    actor: &User,
    scope: ReportingScope,
) -> Result<Vec<Feedback>> {
    if actor.is_manager {
        let visible = hierarchy::reports_for(pool, actor).await?.ids(scope);
        let mut authored = authored_by(pool, actor.id).await?;
        authored.retain(|f| visible.contains(&f.employee_id));
        return Ok(authored);
    }

    match employees::find_for_user(pool, actor.id).await? {
        Some(own) => for_employee(pool, own.id).await,
        None => Ok(Vec::new()),
    }
}

/// Feedback about one employee, filtered per item
///
/// Fails with `Forbidden` when the actor is not the employee, does not manage
/// them within `scope` and authored none of their feedback.
pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: EmployeeId,
    actor: &User,
    scope: ReportingScope,
) -> Result<Vec<Feedback>> {
    let employee = employees::get_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", employee_id))?;

    let reports = hierarchy::reports_for(pool, actor).await?;
    let policy = AccessPolicy::new(actor, &reports, scope);

    let mut items = for_employee(pool, employee_id).await?;
    let authored_any = items.iter().any(|f| f.provided_by_id == actor.id);
    policy.require(
        policy.has_relationship(&employee, authored_any),
        format!("no access to feedback for employee {employee_id}"),
    )?;

    items.retain(|f| policy.can_view_feedback(f, &employee));
    Ok(items)
}

/// Record feedback for one of the actor's direct reports
///
/// The feedback date is now; the period defaults to the current month.
pub async fn create(
    pool: &SqlitePool,
    employee_id: EmployeeId,
    form: FeedbackForm,
    actor: &User,
) -> Result<Feedback> {
    let employee = employees::get_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", employee_id))?;

    let reports = hierarchy::reports_for(pool, actor).await?;
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(
        policy.can_create_feedback(&employee),
        "only the employee's direct manager can give feedback",
    )?;

    let fields = form.validate()?;
    let feedback_date = Utc::now();
    let period = fields.period_for(&feedback_date);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO feedback
            (employee_id, provided_by_id, rating, feedback_text, period, feedback_date)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(actor.id)
    .bind(i64::from(fields.rating))
    .bind(&fields.feedback_text)
    .bind(period.as_str())
    .bind(feedback_date)
    .execute(&mut *tx)
    .await
    .map_err(write_failed("insert"))?;

    tx.commit().await.map_err(write_failed("commit"))?;

    let id = result.last_insert_rowid();
    tracing::info!(feedback_id = id, employee_id, actor = actor.id, %period, "feedback created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::storage("failed to retrieve created feedback"))
}

/// Rewrite feedback the actor authored
///
/// Every field is validated before anything is written. An omitted period
/// keeps the current one.
pub async fn update(
    pool: &SqlitePool,
    id: FeedbackId,
    form: FeedbackForm,
    actor: &User,
) -> Result<Feedback> {
    let existing = get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Feedback", id))?;

    let reports = Reports::none();
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(
        policy.can_edit_feedback(&existing),
        "only the author can edit feedback",
    )?;

    let fields = form.validate()?;
    let period = fields.period.clone().unwrap_or(existing.period);

    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE feedback SET rating = ?, feedback_text = ?, period = ? WHERE id = ?")
        .bind(i64::from(fields.rating))
        .bind(&fields.feedback_text)
        .bind(period.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_failed("update"))?;

    tx.commit().await.map_err(write_failed("commit"))?;

    tracing::info!(feedback_id = id, actor = actor.id, "feedback updated");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Feedback", id))
}

/// Remove feedback the actor authored
pub async fn delete(pool: &SqlitePool, id: FeedbackId, actor: &User) -> Result<()> {
    let existing = get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Feedback", id))?;

    let reports = Reports::none();
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(
        policy.can_delete_feedback(&existing),
        "only the author can delete feedback",
    )?;

    sqlx::query("DELETE FROM feedback WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(write_failed("delete"))?;

    tracing::info!(feedback_id = id, actor = actor.id, "feedback deleted");

    Ok(())
}
