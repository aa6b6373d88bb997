//! Actor-bound storage trait

use crate::error::Result;
use crate::hierarchy::ReportingScope;
use crate::types::{
    Dashboard, Employee, EmployeeForm, EmployeeId, Feedback, FeedbackForm, FeedbackId, User,
};
use async_trait::async_trait;

/// Storage context providing the employee and feedback operations
///
/// A context is bound to one actor, the authenticated user a request is made
/// on behalf of. Every operation checks the access policy for that actor
/// before reading or changing anything.
#[async_trait]
pub trait StorageContext: Send + Sync {
    /// The user operations are performed for
    fn actor(&self) -> &User;

    /// Visibility scope applied to manager checks
    fn scope(&self) -> ReportingScope;

    // ========================================================================
    // Employees
    // ========================================================================

    /// All employees for managers, the actor's own record otherwise
    async fn list_employees(&self) -> Result<Vec<Employee>>;

    /// Get an employee the actor is allowed to see
    async fn get_employee(&self, id: EmployeeId) -> Result<Employee>;

    /// Create an employee (managers only)
    async fn create_employee(&self, form: EmployeeForm) -> Result<Employee>;

    /// Replace an employee's fields (managers only)
    async fn update_employee(&self, id: EmployeeId, form: EmployeeForm) -> Result<Employee>;

    /// Delete an employee together with its feedback
    async fn delete_employee(&self, id: EmployeeId) -> Result<()>;

    /// Case-insensitive search over the employees the actor may list
    async fn search_employees(&self, query: &str) -> Result<Vec<Employee>>;

    /// The employee record linked to the actor's login
    async fn own_employee(&self) -> Result<Option<Employee>>;

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Authored feedback for managers, received feedback otherwise
    async fn list_feedback(&self) -> Result<Vec<Feedback>>;

    /// Feedback about one employee, filtered to what the actor may see
    async fn list_employee_feedback(&self, employee_id: EmployeeId) -> Result<Vec<Feedback>>;

    /// Record feedback for a direct report
    async fn create_feedback(&self, employee_id: EmployeeId, form: FeedbackForm)
        -> Result<Feedback>;

    /// Rewrite feedback the actor authored
    async fn update_feedback(&self, id: FeedbackId, form: FeedbackForm) -> Result<Feedback>;

    /// Remove feedback the actor authored
    async fn delete_feedback(&self, id: FeedbackId) -> Result<()>;

    // ========================================================================
    // Dashboard
    // ========================================================================

    async fn dashboard(&self) -> Result<Dashboard>;
}
