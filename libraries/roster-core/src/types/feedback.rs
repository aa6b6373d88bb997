//! Performance feedback types

use super::{EmployeeId, UserId};
use crate::error::{Result, RosterError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type FeedbackId = i64;

/// Rating on the 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RosterError::validation(
                "rating",
                format!("must be between {} and {}, got {value}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RosterError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

/// Calendar month a feedback record belongs to (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parse a `YYYY-MM` month tag
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let invalid = || {
            RosterError::validation(
                "period",
                format!("'{value}' is not a month (expected YYYY-MM)"),
            )
        };

        let bytes = value.as_bytes();
        let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
        if bytes.len() != 7 || bytes[4] != b'-' || !digits(0..4) || !digits(5..7) {
            return Err(invalid());
        }
        let first_day = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .map_err(|_| invalid())?;

        Ok(Self(first_day.format("%Y-%m").to_string()))
    }

    /// The month containing `date`
    pub fn of(date: &DateTime<Utc>) -> Self {
        Self(date.format("%Y-%m").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Period {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

/// One dated review of one employee by one manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub employee_id: EmployeeId,
    pub provided_by_id: UserId,
    pub rating: Rating,
    pub feedback_text: String,
    pub period: Period,
    pub feedback_date: DateTime<Utc>,
}

/// Raw feedback input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub rating: Option<i64>,
    pub feedback_text: Option<String>,

    /// Month tag; derived from the feedback date when absent
    pub period: Option<String>,
}

/// Validated feedback input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackFields {
    pub rating: Rating,
    pub feedback_text: String,
    pub period: Option<Period>,
}

impl FeedbackForm {
    pub fn validate(&self) -> Result<FeedbackFields> {
        let rating = self
            .rating
            .ok_or_else(|| RosterError::validation("rating", "is required"))
            .and_then(Rating::new)?;

        let feedback_text = match self.feedback_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return Err(RosterError::validation("feedback_text", "is required")),
        };

        let period = match self.period.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(Period::parse(p)?),
            _ => None,
        };

        Ok(FeedbackFields {
            rating,
            feedback_text,
            period,
        })
    }
}

impl FeedbackFields {
    /// The explicit period, or the month of `feedback_date`
    pub fn period_for(&self, feedback_date: &DateTime<Utc>) -> Period {
        self.period
            .clone()
            .unwrap_or_else(|| Period::of(feedback_date))
    }
}
