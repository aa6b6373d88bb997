//! Roster Core
//!
//! Storage-agnostic domain types, access rules and error handling for Roster.
//!
//! This crate provides the building blocks shared by the storage layer, the
//! bulk importer and the HTTP server.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Employee`, `Feedback` and their input forms
//! - **Hierarchy**: `ReportingGraph` resolves direct and indirect reports
//! - **Access Control**: `AccessPolicy` decides who may view or change what
//! - **Storage Context**: the actor-bound `StorageContext` trait
//! - **Error Handling**: unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::hierarchy::{ReportingGraph, ReportingLine, ReportingScope};
//! use roster_core::access::AccessPolicy;
//! use roster_core::types::User;
//!
//! let manager = User {
//!     id: 1,
//!     username: "asha".to_string(),
//!     email: "asha@example.com".to_string(),
//!     is_manager: true,
//!     created_at: String::new(),
//! };
//!
//! let graph = ReportingGraph::new(
//!     vec![ReportingLine { employee_id: 10, manager_id: Some(1), user_id: None }],
//!     [1],
//! );
//! let reports = graph.reports_for(manager.id);
//! let policy = AccessPolicy::new(&manager, &reports, ReportingScope::Direct);
//! assert!(policy.manages(10));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod error;
pub mod hierarchy;
pub mod storage;
pub mod types;

pub use access::AccessPolicy;
pub use error::{Result, RosterError};
pub use hierarchy::{ReportingGraph, ReportingLine, ReportingScope, Reports};
pub use storage::StorageContext;

pub use types::{
    CreateUser, Dashboard, Employee, EmployeeFields, EmployeeForm, EmployeeId, Feedback,
    FeedbackFields, FeedbackForm, FeedbackId, Period, Rating, SkillCount, User, UserId,
};
