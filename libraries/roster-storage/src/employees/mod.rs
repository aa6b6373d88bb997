//! Employee records
//!
//! The unchecked readers (`get_by_id`, `get_all`, ...) are building blocks for
//! other slices and the importer. Request handling goes through the checked
//! operations (`list`, `get`, `create`, `update`, `delete`, `search`), which
//! consult the access policy first.

use crate::hierarchy;
use roster_core::{
    error::Result, AccessPolicy, Employee, EmployeeFields, EmployeeForm, EmployeeId,
    ReportingScope, Reports, RosterError, User, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::BTreeSet;

const EMPLOYEE_COLUMNS: &str = "id, full_name, joining_date, external_id, role, skill, team, \
                                grade, designation, location, user_id, manager_id";

fn employee_from_row(row: &SqliteRow) -> Result<Employee> {
    Ok(Employee {
        id: row.get("id"),
        full_name: row.get("full_name"),
        joining_date: row.try_get("joining_date")?,
        external_id: row.get("external_id"),
        role: row.get("role"),
        skill: row.get("skill"),
        team: row.get("team"),
        grade: row.get("grade"),
        designation: row.get("designation"),
        location: row.get("location"),
        user_id: row.get("user_id"),
        manager_id: row.get("manager_id"),
    })
}

/// Log a failed write and convert it
fn write_failed(operation: &'static str) -> impl FnOnce(sqlx::Error) -> RosterError {
    move |e| {
        tracing::error!(operation, error = %e, "employee write failed");
        e.into()
    }
}

// ============================================================================
// Unchecked reads
// ============================================================================

pub async fn get_by_id(pool: &SqlitePool, id: EmployeeId) -> Result<Option<Employee>> {
    let row = sqlx::query(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(employee_from_row).transpose()
}

/// Every employee, ordered by name
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Employee>> {
    let rows = sqlx::query(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY full_name COLLATE NOCASE, id"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(employee_from_row).collect()
}

/// The employees with the given ids, ordered by name
pub async fn get_many(
    pool: &SqlitePool,
    ids: impl IntoIterator<Item = EmployeeId>,
) -> Result<Vec<Employee>> {
    let ids: BTreeSet<EmployeeId> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut employees = get_all(pool).await?;
    employees.retain(|e| ids.contains(&e.id));
    Ok(employees)
}

/// The employee record linked to a login
pub async fn find_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Option<Employee>> {
    let row = sqlx::query(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE user_id = ? ORDER BY id LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(employee_from_row).transpose()
}

pub async fn find_by_external_id(
    conn: &mut SqliteConnection,
    external_id: &str,
) -> Result<Option<Employee>> {
    let row = sqlx::query(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE external_id = ?"
    ))
    .bind(external_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(employee_from_row).transpose()
}

// ============================================================================
// Row writes (run inside the caller's transaction)
// ============================================================================

/// Check that `manager_id` names a manager and `user_id` names a user
pub async fn check_references(conn: &mut SqliteConnection, fields: &EmployeeFields) -> Result<()> {
    if let Some(manager_id) = fields.manager_id {
        let is_manager = sqlx::query_scalar::<_, i64>("SELECT is_manager FROM users WHERE id = ?")
            .bind(manager_id)
            .fetch_optional(&mut *conn)
            .await?;

        match is_manager {
            Some(flag) if flag != 0 => {}
            Some(_) => {
                return Err(RosterError::validation(
                    "manager_id",
                    format!("user {manager_id} is not a manager"),
                ))
            }
            None => {
                return Err(RosterError::validation(
                    "manager_id",
                    format!("user {manager_id} does not exist"),
                ))
            }
        }
    }

    if let Some(user_id) = fields.user_id {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        if exists == 0 {
            return Err(RosterError::validation(
                "user_id",
                format!("user {user_id} does not exist"),
            ));
        }
    }

    Ok(())
}

pub async fn insert(conn: &mut SqliteConnection, fields: &EmployeeFields) -> Result<EmployeeId> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees (full_name, joining_date, external_id, role, skill, team,
                               grade, designation, location, user_id, manager_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.full_name)
    .bind(fields.joining_date)
    .bind(&fields.external_id)
    .bind(&fields.role)
    .bind(&fields.skill)
    .bind(&fields.team)
    .bind(&fields.grade)
    .bind(&fields.designation)
    .bind(&fields.location)
    .bind(fields.user_id)
    .bind(fields.manager_id)
    .execute(&mut *conn)
    .await
    .map_err(write_failed("insert"))?;

    Ok(result.last_insert_rowid())
}

pub async fn update_row(
    conn: &mut SqliteConnection,
    id: EmployeeId,
    fields: &EmployeeFields,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE employees
        SET full_name = ?, joining_date = ?, external_id = ?, role = ?, skill = ?, team = ?,
            grade = ?, designation = ?, location = ?, user_id = ?, manager_id = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&fields.full_name)
    .bind(fields.joining_date)
    .bind(&fields.external_id)
    .bind(&fields.role)
    .bind(&fields.skill)
    .bind(&fields.team)
    .bind(&fields.grade)
    .bind(&fields.designation)
    .bind(&fields.location)
    .bind(fields.user_id)
    .bind(fields.manager_id)
    .bind(id)
    .execute(&mut *conn)
    .await
    .map_err(write_failed("update"))?;

    Ok(())
}

// ============================================================================
// Checked operations
// ============================================================================

/// All employees for managers, the actor's own record otherwise
pub async fn list(pool: &SqlitePool, actor: &User) -> Result<Vec<Employee>> {
    if actor.is_manager {
        get_all(pool).await
    } else {
        Ok(find_for_user(pool, actor.id).await?.into_iter().collect())
    }
}

pub async fn get(
    pool: &SqlitePool,
    id: EmployeeId,
    actor: &User,
    scope: ReportingScope,
) -> Result<Employee> {
    let employee = get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", id))?;

    let reports = hierarchy::reports_for(pool, actor).await?;
    let policy = AccessPolicy::new(actor, &reports, scope);
    policy.require(
        policy.can_view_employee(&employee),
        format!("not allowed to view employee {id}"),
    )?;

    Ok(employee)
}

/// Create an employee; `manager_id` defaults to the actor
pub async fn create(pool: &SqlitePool, form: EmployeeForm, actor: &User) -> Result<Employee> {
    let reports = Reports::none();
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(policy.can_create_employee(), "only managers can create employees")?;

    let mut fields = form.validate()?;
    fields.manager_id = fields.manager_id.or(Some(actor.id));

    let mut tx = pool.begin().await?;

    check_references(&mut *tx, &fields).await?;
    if find_by_external_id(&mut *tx, &fields.external_id).await?.is_some() {
        return Err(RosterError::conflict(format!(
            "employee ID '{}' already exists",
            fields.external_id
        )));
    }

    let id = insert(&mut *tx, &fields).await?;
    tx.commit().await.map_err(write_failed("commit"))?;

    tracing::info!(employee_id = id, actor = actor.id, "employee created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::storage("failed to retrieve created employee"))
}

/// Replace an employee's fields
///
/// An omitted `manager_id` or `user_id` keeps the current value.
pub async fn update(
    pool: &SqlitePool,
    id: EmployeeId,
    form: EmployeeForm,
    actor: &User,
) -> Result<Employee> {
    let existing = get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", id))?;

    let reports = Reports::none();
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(
        policy.can_edit_employee(&existing),
        "only managers can edit employees",
    )?;

    let mut fields = form.validate()?;
    fields.manager_id = fields.manager_id.or(existing.manager_id);
    fields.user_id = fields.user_id.or(existing.user_id);

    let mut tx = pool.begin().await?;

    check_references(&mut *tx, &fields).await?;
    if let Some(other) = find_by_external_id(&mut *tx, &fields.external_id).await? {
        if other.id != id {
            return Err(RosterError::conflict(format!(
                "employee ID '{}' already belongs to another employee",
                fields.external_id
            )));
        }
    }

    update_row(&mut *tx, id, &fields).await?;
    tx.commit().await.map_err(write_failed("commit"))?;

    tracing::info!(employee_id = id, actor = actor.id, "employee updated");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", id))
}

/// Delete an employee and its feedback in one transaction
pub async fn delete(pool: &SqlitePool, id: EmployeeId, actor: &User) -> Result<()> {
    let existing = get_by_id(pool, id)
        .await?
        .ok_or_else(|| RosterError::not_found("Employee", id))?;

    let reports = Reports::none();
    let policy = AccessPolicy::new(actor, &reports, ReportingScope::Direct);
    policy.require(
        policy.can_delete_employee(&existing),
        "only managers can delete employees",
    )?;

    let mut tx = pool.begin().await?;

    let feedback_removed = sqlx::query("DELETE FROM feedback WHERE employee_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_failed("delete feedback"))?
        .rows_affected();

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_failed("delete"))?;

    tx.commit().await.map_err(write_failed("commit"))?;

    tracing::info!(employee_id = id, feedback_removed, actor = actor.id, "employee deleted");

    Ok(())
}

/// Case-insensitive search over the employees `actor` may list
pub async fn search(pool: &SqlitePool, query: &str, actor: &User) -> Result<Vec<Employee>> {
    let mut employees = list(pool, actor).await?;
    employees.retain(|e| e.matches(query));
    Ok(employees)
}
