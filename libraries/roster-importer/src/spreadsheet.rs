//! Spreadsheet row schema and CSV codec
//!
//! Columns are matched by header name, so their order in the file does not
//! matter. `Benzyl` is accepted as an older name for the `Employee ID` column.
//! Blank cells and absent columns both read as missing.

use chrono::NaiveDate;
use roster_core::{Employee, EmployeeFields};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Header row written on export
pub const HEADERS: [&str; 10] = [
    "Full Name",
    "Joining Date",
    "Employee ID",
    "Role",
    "Skill",
    "Team",
    "Manager Name",
    "Grade",
    "Designation",
    "Location",
];

/// Joining date formats tried on import, in order
pub const IMPORT_DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

/// Joining date format written on export
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// One spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeRow {
    #[serde(rename = "Full Name")]
    pub full_name: Option<String>,

    #[serde(rename = "Joining Date")]
    pub joining_date: Option<String>,

    #[serde(rename = "Employee ID", alias = "Benzyl")]
    pub external_id: Option<String>,

    #[serde(rename = "Role")]
    pub role: Option<String>,

    #[serde(rename = "Skill")]
    pub skill: Option<String>,

    #[serde(rename = "Team")]
    pub team: Option<String>,

    #[serde(rename = "Manager Name")]
    pub manager_name: Option<String>,

    #[serde(rename = "Grade")]
    pub grade: Option<String>,

    #[serde(rename = "Designation")]
    pub designation: Option<String>,

    #[serde(rename = "Location")]
    pub location: Option<String>,
}

/// Why a row cannot be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    Missing(&'static str),
    UnparseableDate(String),
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(column) => write!(f, "missing {column}"),
            Self::UnparseableDate(value) => write!(f, "could not parse joining date '{value}'"),
        }
    }
}

/// A row that passed validation
#[derive(Debug, Clone)]
pub struct ValidRow {
    /// Employee fields; `manager_id` and `user_id` are left unset
    pub fields: EmployeeFields,
    pub manager_name: Option<String>,
}

fn cell(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a joining date, day-first before ISO
pub fn parse_import_date(value: &str) -> Option<NaiveDate> {
    IMPORT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
}

impl EmployeeRow {
    /// The row's employee ID, if present
    pub fn external_id(&self) -> Option<&str> {
        cell(&self.external_id)
    }

    /// Check the row and convert it to employee fields
    pub fn validate(&self) -> Result<ValidRow, RowIssue> {
        let external_id = cell(&self.external_id).ok_or(RowIssue::Missing("Employee ID"))?;

        let raw_date = cell(&self.joining_date).ok_or(RowIssue::Missing("Joining Date"))?;
        let joining_date = parse_import_date(raw_date)
            .ok_or_else(|| RowIssue::UnparseableDate(raw_date.to_string()))?;

        let required = |value: &Option<String>, column: &'static str| {
            cell(value).map(str::to_string).ok_or(RowIssue::Missing(column))
        };

        Ok(ValidRow {
            fields: EmployeeFields {
                full_name: required(&self.full_name, "Full Name")?,
                joining_date,
                external_id: external_id.to_string(),
                role: required(&self.role, "Role")?,
                skill: required(&self.skill, "Skill")?,
                team: required(&self.team, "Team")?,
                grade: required(&self.grade, "Grade")?,
                designation: required(&self.designation, "Designation")?,
                location: required(&self.location, "Location")?,
                manager_id: None,
                user_id: None,
            },
            manager_name: cell(&self.manager_name).map(str::to_string),
        })
    }

    /// Export row for an employee
    pub fn from_employee(employee: &Employee, manager_name: Option<&str>) -> Self {
        Self {
            full_name: Some(employee.full_name.clone()),
            joining_date: Some(employee.joining_date.format(EXPORT_DATE_FORMAT).to_string()),
            external_id: Some(employee.external_id.clone()),
            role: Some(employee.role.clone()),
            skill: Some(employee.skill.clone()),
            team: Some(employee.team.clone()),
            manager_name: manager_name.map(str::to_string),
            grade: Some(employee.grade.clone()),
            designation: Some(employee.designation.clone()),
            location: Some(employee.location.clone()),
        }
    }
}

/// A decoded row and the line it came from
#[derive(Debug)]
pub struct RowRecord {
    pub line: u64,
    pub row: Result<EmployeeRow, String>,
}

/// Decode every row of a CSV document
///
/// Rows that fail to decode are returned as errors rather than aborting the
/// whole read; a missing or unreadable header row does abort.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<RowRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    reader.headers()?;

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<EmployeeRow>().enumerate() {
        let line = match &result {
            Ok(_) => index as u64 + 2,
            Err(e) => e.position().map_or(index as u64 + 2, |p| p.line()),
        };
        records.push(RowRecord {
            line,
            row: result.map_err(|e| e.to_string()),
        });
    }

    Ok(records)
}

/// Encode rows as CSV, header first
pub fn write_rows<W: io::Write>(writer: W, rows: &[EmployeeRow]) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
