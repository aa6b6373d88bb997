//! Dashboard summary types

use super::{Employee, Feedback};
use serde::{Deserialize, Serialize};

/// Number of employees sharing a skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: i64,
}

/// Landing-page summary for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_employees: i64,
    pub is_manager: bool,

    /// Direct reports (managers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_employees: Option<i64>,

    /// The viewer's own employee record (non-managers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,

    /// Authored feedback for managers, received feedback otherwise
    pub recent_feedback: Vec<Feedback>,

    /// Skill distribution among direct reports (managers only)
    pub team_skills: Vec<SkillCount>,
}
