use crate::{dashboard, employees, feedback};
use async_trait::async_trait;
use roster_core::{
    error::Result, storage::StorageContext, Dashboard, Employee, EmployeeForm, EmployeeId,
    Feedback, FeedbackForm, FeedbackId, ReportingScope, User,
};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`, bound to one actor
pub struct LocalStorageContext {
    pool: SqlitePool,
    actor: User,
    scope: ReportingScope,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool, actor: User, scope: ReportingScope) -> Self {
        Self { pool, actor, scope }
    }
}

#[async_trait]
impl StorageContext for LocalStorageContext {
    fn actor(&self) -> &User {
        &self.actor
    }

    fn scope(&self) -> ReportingScope {
        self.scope
    }

    // Employees
    async fn list_employees(&self) -> Result<Vec<Employee>> {
        employees::list(&self.pool, &self.actor).await
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Employee> {
        employees::get(&self.pool, id, &self.actor, self.scope).await
    }

    async fn create_employee(&self, form: EmployeeForm) -> Result<Employee> {
        employees::create(&self.pool, form, &self.actor).await
    }

    async fn update_employee(&self, id: EmployeeId, form: EmployeeForm) -> Result<Employee> {
        employees::update(&self.pool, id, form, &self.actor).await
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        employees::delete(&self.pool, id, &self.actor).await
    }

    async fn search_employees(&self, query: &str) -> Result<Vec<Employee>> {
        employees::search(&self.pool, query, &self.actor).await
    }

    async fn own_employee(&self) -> Result<Option<Employee>> {
        employees::find_for_user(&self.pool, self.actor.id).await
    }

    // Feedback
    async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        feedback::list_for_actor(&self.pool, &self.actor, self.scope).await
    }

    async fn list_employee_feedback(&self, employee_id: EmployeeId) -> Result<Vec<Feedback>> {
        feedback::list_for_employee(&self.pool, employee_id, &self.actor, self.scope).await
    }

    async fn create_feedback(
        &self,
        employee_id: EmployeeId,
        form: FeedbackForm,
    ) -> Result<Feedback> {
        feedback::create(&self.pool, employee_id, form, &self.actor).await
    }

    async fn update_feedback(&self, id: FeedbackId, form: FeedbackForm) -> Result<Feedback> {
        feedback::update(&self.pool, id, form, &self.actor).await
    }

    async fn delete_feedback(&self, id: FeedbackId) -> Result<()> {
        feedback::delete(&self.pool, id, &self.actor).await
    }

    // Dashboard
    async fn dashboard(&self) -> Result<Dashboard> {
        dashboard::for_user(&self.pool, &self.actor).await
    }
}
