//! Roster Bulk Import/Export
//!
//! Moves employee records between the database and CSV spreadsheets.
//!
//! # Architecture
//!
//! - `spreadsheet`: the fixed row schema and the CSV codec
//! - `importer`: transactional import with per-row skip-and-log
//! - `exporter`: full-table export with manager usernames

mod error;

pub mod exporter;
pub mod importer;
pub mod spreadsheet;

pub use error::ImportError;
pub use exporter::{export_csv, EXPORT_FILE_NAME};
pub use importer::{EmployeeImporter, ImportSummary, SkippedRow};
pub use spreadsheet::EmployeeRow;

pub type Result<T> = std::result::Result<T, ImportError>;
