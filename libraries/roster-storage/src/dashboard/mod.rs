//! Landing-page summary

use crate::{employees, feedback};
use roster_core::{error::Result, Dashboard, SkillCount, User};
use sqlx::{Row, SqlitePool};

/// Number of feedback items shown on the dashboard
pub const RECENT_FEEDBACK_LIMIT: usize = 5;

pub async fn for_user(pool: &SqlitePool, actor: &User) -> Result<Dashboard> {
    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    if actor.is_manager {
        let managed_employees =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE manager_id = ?")
                .bind(actor.id)
                .fetch_one(pool)
                .await?;

        let mut recent_feedback = feedback::authored_by(pool, actor.id).await?;
        recent_feedback.truncate(RECENT_FEEDBACK_LIMIT);

        return Ok(Dashboard {
            total_employees,
            is_manager: true,
            managed_employees: Some(managed_employees),
            employee: None,
            recent_feedback,
            team_skills: team_skills(pool, actor).await?,
        });
    }

    let employee = employees::find_for_user(pool, actor.id).await?;
    let recent_feedback = match &employee {
        Some(own) => {
            let mut received = feedback::for_employee(pool, own.id).await?;
            received.truncate(RECENT_FEEDBACK_LIMIT);
            received
        }
        None => Vec::new(),
    };

    Ok(Dashboard {
        total_employees,
        is_manager: false,
        managed_employees: None,
        employee,
        recent_feedback,
        team_skills: Vec::new(),
    })
}

/// Skill distribution among the actor's direct reports, most common first
pub async fn team_skills(pool: &SqlitePool, actor: &User) -> Result<Vec<SkillCount>> {
    let rows = sqlx::query(
        r#"
        SELECT skill, COUNT(*) AS count
        FROM employees
        WHERE manager_id = ?
        GROUP BY skill
        ORDER BY count DESC, skill
        "#,
    )
    .bind(actor.id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SkillCount {
            skill: row.get("skill"),
            count: row.get("count"),
        })
        .collect())
}
