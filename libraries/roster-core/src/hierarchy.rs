//! Reporting hierarchy resolution
//!
//! A manager's reports come in two tiers:
//! - **direct**: employees whose `manager_id` is the manager's user id
//! - **indirect**: direct reports of a sub-manager, where the sub-manager is a
//!   direct report whose linked login is itself a manager
//!
//! Only one level of indirection is resolved. The graph is a plain in-memory
//! structure so the rules can be checked without a database; the storage layer
//! loads the reporting lines and hands them over.

use crate::types::{EmployeeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::str::FromStr;

/// How far a manager's visibility reaches
///
/// Deserializes through [`FromStr`], so config values ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReportingScope {
    /// Direct reports only
    Direct,
    /// Direct reports plus reports of sub-managers
    #[default]
    Extended,
}

impl FromStr for ReportingScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown reporting scope '{other}'")),
        }
    }
}

impl TryFrom<String> for ReportingScope {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// The hierarchy-relevant columns of one employee row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingLine {
    pub employee_id: EmployeeId,
    pub manager_id: Option<UserId>,
    pub user_id: Option<UserId>,
}

/// Reports of a single manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reports {
    direct: BTreeSet<EmployeeId>,
    indirect: BTreeSet<EmployeeId>,
}

impl Reports {
    /// Reports of someone who manages nobody
    pub fn none() -> Self {
        Self::default()
    }

    pub fn direct(&self) -> &BTreeSet<EmployeeId> {
        &self.direct
    }

    pub fn indirect(&self) -> &BTreeSet<EmployeeId> {
        &self.indirect
    }

    pub fn is_direct(&self, employee_id: EmployeeId) -> bool {
        self.direct.contains(&employee_id)
    }

    /// Membership under the given visibility scope
    pub fn contains(&self, employee_id: EmployeeId, scope: ReportingScope) -> bool {
        match scope {
            ReportingScope::Direct => self.is_direct(employee_id),
            ReportingScope::Extended => {
                self.is_direct(employee_id) || self.indirect.contains(&employee_id)
            }
        }
    }

    /// All ids visible under `scope`, ascending
    pub fn ids(&self, scope: ReportingScope) -> BTreeSet<EmployeeId> {
        match scope {
            ReportingScope::Direct => self.direct.clone(),
            ReportingScope::Extended => self.direct.union(&self.indirect).copied().collect(),
        }
    }
}

/// Manager → employee graph built from reporting lines
#[derive(Debug, Clone, Default)]
pub struct ReportingGraph {
    by_manager: HashMap<UserId, Vec<ReportingLine>>,
    managers: HashSet<UserId>,
}

impl ReportingGraph {
    /// Build a graph from every employee's reporting line and the ids of all
    /// users flagged as managers
    pub fn new(
        lines: impl IntoIterator<Item = ReportingLine>,
        managers: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let mut by_manager: HashMap<UserId, Vec<ReportingLine>> = HashMap::new();
        for line in lines {
            if let Some(manager_id) = line.manager_id {
                by_manager.entry(manager_id).or_default().push(line);
            }
        }

        Self {
            by_manager,
            managers: managers.into_iter().collect(),
        }
    }

    /// Employees whose `manager_id` equals `manager_id`
    pub fn direct_reports(&self, manager_id: UserId) -> BTreeSet<EmployeeId> {
        self.by_manager
            .get(&manager_id)
            .map(|lines| lines.iter().map(|l| l.employee_id).collect())
            .unwrap_or_default()
    }

    /// Direct reports of every sub-manager among `manager_id`'s direct reports
    pub fn indirect_reports(&self, manager_id: UserId) -> BTreeSet<EmployeeId> {
        let Some(lines) = self.by_manager.get(&manager_id) else {
            return BTreeSet::new();
        };

        lines
            .iter()
            .filter_map(|line| line.user_id)
            .filter(|sub_manager| *sub_manager != manager_id && self.managers.contains(sub_manager))
            .flat_map(|sub_manager| self.direct_reports(sub_manager))
            .collect()
    }

    pub fn reports_for(&self, manager_id: UserId) -> Reports {
        Reports {
            direct: self.direct_reports(manager_id),
            indirect: self.indirect_reports(manager_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(
        employee_id: EmployeeId,
        manager_id: Option<UserId>,
        user_id: Option<UserId>,
    ) -> ReportingLine {
        ReportingLine {
            employee_id,
            manager_id,
            user_id,
        }
    }

    /// Users 1 and 2 are managers; user 2's employee record (20) reports to 1.
    /// Employees 21 and 22 report to 2. Employee 30 reports to 3, a non-manager.
    fn org() -> ReportingGraph {
        ReportingGraph::new(
            vec![
                line(10, Some(1), None),
                line(20, Some(1), Some(2)),
                line(21, Some(2), None),
                line(22, Some(2), Some(5)),
                line(30, Some(3), None),
                line(31, Some(1), Some(3)),
                line(40, None, None),
            ],
            [1, 2],
        )
    }

    #[test]
    fn every_employee_is_a_direct_report_of_its_manager() {
        let graph = org();
        for (employee, manager) in [(10, 1), (20, 1), (21, 2), (22, 2), (30, 3), (31, 1)] {
            assert!(graph.direct_reports(manager).contains(&employee));
        }
    }

    #[test]
    fn indirect_reports_follow_sub_managers_one_level() {
        let graph = org();
        let indirect = graph.indirect_reports(1);
        assert_eq!(indirect.into_iter().collect::<Vec<_>>(), vec![21, 22]);
    }

    #[test]
    fn non_manager_links_do_not_extend_reach() {
        // Employee 31 is linked to user 3, who is not flagged as a manager
        let graph = org();
        assert!(!graph.indirect_reports(1).contains(&30));
    }

    #[test]
    fn unknown_manager_has_no_reports() {
        let graph = org();
        assert!(graph.direct_reports(99).is_empty());
        assert!(graph.indirect_reports(99).is_empty());
        assert_eq!(graph.reports_for(99), Reports::none());
    }

    #[test]
    fn scope_controls_membership() {
        let reports = org().reports_for(1);
        assert!(reports.contains(10, ReportingScope::Direct));
        assert!(!reports.contains(21, ReportingScope::Direct));
        assert!(reports.contains(21, ReportingScope::Extended));
        assert_eq!(reports.ids(ReportingScope::Extended).len(), 5);
    }

    #[test]
    fn duplicate_paths_are_deduplicated() {
        // Two sub-managers linked to the same manager account
        let graph = ReportingGraph::new(
            vec![
                line(1, Some(1), Some(2)),
                line(2, Some(1), Some(2)),
                line(3, Some(2), None),
            ],
            [1, 2],
        );
        assert_eq!(graph.indirect_reports(1).len(), 1);
    }

    #[test]
    fn scope_parses_from_config_strings() {
        assert_eq!("direct".parse::<ReportingScope>().unwrap(), ReportingScope::Direct);
        assert_eq!("Extended".parse::<ReportingScope>().unwrap(), ReportingScope::Extended);
        assert!("everyone".parse::<ReportingScope>().is_err());
    }

    #[test]
    fn scope_deserializes_like_it_parses() {
        let scope: ReportingScope = serde_json::from_str("\"Extended\"").unwrap();
        assert_eq!(scope, ReportingScope::Extended);
        let scope: ReportingScope = serde_json::from_str("\" DIRECT \"").unwrap();
        assert_eq!(scope, ReportingScope::Direct);
        assert!(serde_json::from_str::<ReportingScope>("\"everyone\"").is_err());
        assert_eq!(serde_json::to_string(&ReportingScope::Direct).unwrap(), "\"direct\"");
    }
}
