/// Shared application state
use crate::middleware::AuthenticatedUser;
use crate::services::AuthService;
use roster_core::ReportingScope;
use roster_storage::{Database, LocalStorageContext};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    /// Visibility scope for manager checks
    pub scope: ReportingScope,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth_service: Arc<AuthService>, scope: ReportingScope) -> Self {
        Self {
            db,
            auth_service,
            scope,
        }
    }

    /// Storage context acting for the authenticated user of one request
    pub fn context(&self, auth: AuthenticatedUser) -> LocalStorageContext {
        self.db.context(auth.into_user(), self.scope)
    }
}
