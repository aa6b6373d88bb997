//! Error types for import and export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Roster(#[from] roster_core::RosterError),
}

impl From<ImportError> for roster_core::RosterError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Roster(e) => e,
            ImportError::Database(e) => e.into(),
            ImportError::Csv(e) => roster_core::RosterError::validation("file", e.to_string()),
            ImportError::Io(e) => roster_core::RosterError::Other(e.to_string()),
        }
    }
}
