//! Loads the reporting graph from the employee table

use crate::employees;
use roster_core::{
    error::Result, Employee, ReportingGraph, ReportingLine, Reports, User, UserId,
};
use sqlx::{Row, SqlitePool};

/// Build the reporting graph from every employee row
pub async fn load_graph(pool: &SqlitePool) -> Result<ReportingGraph> {
    let lines = sqlx::query("SELECT id, manager_id, user_id FROM employees")
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|row| ReportingLine {
            employee_id: row.get("id"),
            manager_id: row.get("manager_id"),
            user_id: row.get("user_id"),
        })
        .collect::<Vec<_>>();

    let managers = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE is_manager = 1")
        .fetch_all(pool)
        .await?;

    Ok(ReportingGraph::new(lines, managers))
}

/// The actor's direct and indirect reports (empty for non-managers)
pub async fn reports_for(pool: &SqlitePool, actor: &User) -> Result<Reports> {
    if !actor.is_manager {
        return Ok(Reports::none());
    }
    Ok(load_graph(pool).await?.reports_for(actor.id))
}

/// Employees reporting straight to `manager_id`
pub async fn direct_reports(pool: &SqlitePool, manager_id: UserId) -> Result<Vec<Employee>> {
    let ids = load_graph(pool).await?.direct_reports(manager_id);
    employees::get_many(pool, ids).await
}

/// Employees reporting to one of `manager_id`'s sub-managers
pub async fn indirect_reports(pool: &SqlitePool, manager_id: UserId) -> Result<Vec<Employee>> {
    let ids = load_graph(pool).await?.indirect_reports(manager_id);
    employees::get_many(pool, ids).await
}
