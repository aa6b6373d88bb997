//! Access control rules
//!
//! Every predicate is total: given an actor, the actor's resolved reports and
//! a target, it answers yes or no without touching storage. Callers turn a
//! `false` into [`RosterError::Forbidden`] with [`AccessPolicy::require`].
//!
//! | action | who |
//! |---|---|
//! | view employee | managers within scope, the employee themselves |
//! | edit/delete employee | any manager |
//! | view feedback | author, the reviewed employee, managers within scope |
//! | create feedback | the employee's direct manager |
//! | edit/delete feedback | author only |

use crate::error::{Result, RosterError};
use crate::hierarchy::{ReportingScope, Reports};
use crate::types::{Employee, Feedback, User};

/// Access decisions for one actor
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy<'a> {
    actor: &'a User,
    reports: &'a Reports,
    scope: ReportingScope,
}

impl<'a> AccessPolicy<'a> {
    pub fn new(actor: &'a User, reports: &'a Reports, scope: ReportingScope) -> Self {
        Self {
            actor,
            reports,
            scope,
        }
    }

    pub fn actor(&self) -> &User {
        self.actor
    }

    pub fn scope(&self) -> ReportingScope {
        self.scope
    }

    /// The employee is within the actor's visibility scope
    pub fn manages(&self, employee_id: i64) -> bool {
        self.actor.is_manager && self.reports.contains(employee_id, self.scope)
    }

    fn is_self(&self, employee: &Employee) -> bool {
        employee.user_id == Some(self.actor.id)
    }

    pub fn can_view_employee(&self, employee: &Employee) -> bool {
        self.manages(employee.id) || self.is_self(employee)
    }

    pub fn can_create_employee(&self) -> bool {
        self.actor.is_manager
    }

    /// Any manager may edit any employee, regardless of visibility scope
    pub fn can_edit_employee(&self, _employee: &Employee) -> bool {
        self.actor.is_manager
    }

    pub fn can_delete_employee(&self, _employee: &Employee) -> bool {
        self.actor.is_manager
    }

    /// `employee` must be the record `feedback` refers to
    pub fn can_view_feedback(&self, feedback: &Feedback, employee: &Employee) -> bool {
        feedback.provided_by_id == self.actor.id
            || self.is_self(employee)
            || self.manages(employee.id)
    }

    /// Feedback comes from the direct manager only, whatever the visibility scope
    pub fn can_create_feedback(&self, employee: &Employee) -> bool {
        self.actor.is_manager
            && employee.manager_id == Some(self.actor.id)
            && self.reports.is_direct(employee.id)
    }

    pub fn can_edit_feedback(&self, feedback: &Feedback) -> bool {
        feedback.provided_by_id == self.actor.id
    }

    pub fn can_delete_feedback(&self, feedback: &Feedback) -> bool {
        feedback.provided_by_id == self.actor.id
    }

    /// Whether the actor has any standing to look at an employee's feedback
    pub fn has_relationship(&self, employee: &Employee, authored_any: bool) -> bool {
        authored_any || self.is_self(employee) || self.manages(employee.id)
    }

    pub fn can_import(&self) -> bool {
        self.actor.is_manager
    }

    /// Export hands out every employee record
    pub fn can_export(&self) -> bool {
        self.actor.is_manager
    }

    /// Turn a denied predicate into a `Forbidden` error
    pub fn require(&self, allowed: bool, reason: impl Into<String>) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(RosterError::forbidden(reason))
        }
    }
}
