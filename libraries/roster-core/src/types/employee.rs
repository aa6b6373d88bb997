//! Employee records and the form used to create or edit them

use super::UserId;
use crate::error::{Result, RosterError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type EmployeeId = i64;

/// Date format accepted for `joining_date` on forms
pub const JOINING_DATE_FORMAT: &str = "%Y-%m-%d";

/// A person's employment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub joining_date: NaiveDate,

    /// Unique business key assigned by the organization
    pub external_id: String,

    pub role: String,
    pub skill: String,
    pub team: String,
    pub grade: String,
    pub designation: String,
    pub location: String,

    /// The employee's own login, if any
    pub user_id: Option<UserId>,

    /// Managing user (always a manager when set)
    pub manager_id: Option<UserId>,
}

/// Raw employee input as submitted by a manager
///
/// Every field is optional so that missing input surfaces as a validation
/// error naming the field rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub full_name: Option<String>,
    pub joining_date: Option<String>,
    pub external_id: Option<String>,
    pub role: Option<String>,
    pub skill: Option<String>,
    pub team: Option<String>,
    pub grade: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub manager_id: Option<UserId>,
    pub user_id: Option<UserId>,
}

/// Validated employee fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFields {
    pub full_name: String,
    pub joining_date: NaiveDate,
    pub external_id: String,
    pub role: String,
    pub skill: String,
    pub team: String,
    pub grade: String,
    pub designation: String,
    pub location: String,
    pub manager_id: Option<UserId>,
    pub user_id: Option<UserId>,
}

fn required(value: &Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(RosterError::validation(field, "is required")),
    }
}

/// Parse a form date (`YYYY-MM-DD`)
pub fn parse_joining_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), JOINING_DATE_FORMAT).map_err(|_| {
        RosterError::validation(
            "joining_date",
            format!("'{}' is not a calendar date (expected YYYY-MM-DD)", value.trim()),
        )
    })
}

impl EmployeeForm {
    /// Check that every required field is present and the date parses
    pub fn validate(&self) -> Result<EmployeeFields> {
        let full_name = required(&self.full_name, "full_name")?;
        let joining_date = parse_joining_date(&required(&self.joining_date, "joining_date")?)?;

        Ok(EmployeeFields {
            full_name,
            joining_date,
            external_id: required(&self.external_id, "external_id")?,
            role: required(&self.role, "role")?,
            skill: required(&self.skill, "skill")?,
            team: required(&self.team, "team")?,
            grade: required(&self.grade, "grade")?,
            designation: required(&self.designation, "designation")?,
            location: required(&self.location, "location")?,
            manager_id: self.manager_id,
            user_id: self.user_id,
        })
    }
}

impl Employee {
    /// Case-insensitive substring match used by employee search
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.full_name,
            &self.external_id,
            &self.role,
            &self.skill,
            &self.team,
            &self.designation,
            &self.location,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> EmployeeForm {
        EmployeeForm {
            full_name: Some("Meera Nair".into()),
            joining_date: Some("2023-04-17".into()),
            external_id: Some("EMP001".into()),
            role: Some("Engineer".into()),
            skill: Some("Rust".into()),
            team: Some("Platform".into()),
            grade: Some("G5".into()),
            designation: Some("Senior Engineer".into()),
            location: Some("Kochi".into()),
            manager_id: None,
            user_id: None,
        }
    }

    #[test]
    fn complete_form_validates() {
        let fields = complete_form().validate().unwrap();
        assert_eq!(fields.joining_date, NaiveDate::from_ymd_opt(2023, 4, 17).unwrap());
        assert_eq!(fields.external_id, "EMP001");
    }

    #[test]
    fn missing_field_is_named() {
        let mut form = complete_form();
        form.team = Some("   ".into());
        let err = form.validate().unwrap_err();
        assert!(matches!(err, RosterError::Validation { ref field, .. } if field == "team"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut form = complete_form();
        form.joining_date = Some("17/04/2023".into());
        let err = form.validate().unwrap_err();
        assert!(
            matches!(err, RosterError::Validation { ref field, .. } if field == "joining_date")
        );
    }

    #[test]
    fn search_matches_any_text_field_ignoring_case() {
        let fields = complete_form().validate().unwrap();
        let employee = Employee {
            id: 1,
            full_name: fields.full_name,
            joining_date: fields.joining_date,
            external_id: fields.external_id,
            role: fields.role,
            skill: fields.skill,
            team: fields.team,
            grade: fields.grade,
            designation: fields.designation,
            location: fields.location,
            user_id: None,
            manager_id: Some(1),
        };
        assert!(employee.matches("meera"));
        assert!(employee.matches("KOCHI"));
        assert!(employee.matches("emp0"));
        assert!(!employee.matches("golang"));
    }
}
