//! Roster Server Library
//!
//! HTTP API for employee records and performance feedback, with JWT
//! authentication and CSV import/export.
//!
//! This library exposes the router and its parts for the binary and for tests.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::auth::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};

/// Build the `/api` router
///
/// Tracing and CORS layers are added by the binary.
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/me", get(api::me::me))
        .route("/dashboard", get(api::dashboard::dashboard))
        // Employees
        .route(
            "/employees",
            get(api::employees::list_employees).post(api::employees::create_employee),
        )
        .route("/employees/search", get(api::employees::search_employees))
        .route(
            "/employees/:id",
            get(api::employees::get_employee)
                .put(api::employees::update_employee)
                .delete(api::employees::delete_employee),
        )
        // Feedback
        .route(
            "/employees/:id/feedback",
            get(api::feedback::list_employee_feedback).post(api::feedback::create_feedback),
        )
        .route("/feedback", get(api::feedback::list_feedback))
        .route(
            "/feedback/:id",
            put(api::feedback::update_feedback).delete(api::feedback::delete_feedback),
        )
        // Import/export
        .route("/transfer/import", post(api::transfer::import_employees))
        .route("/transfer/export", get(api::transfer::export_employees))
        // Users
        .route("/users", post(api::users::create_user))
        .route("/users/managers", get(api::users::list_managers))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(app_state)
}
