use flexi_logger::FlexiLoggerError;
use rusqlite::Error as RusqliteError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] RusqliteError),

    #[error("Logging error: {0}")]
    LoggingError(#[from] FlexiLoggerError),

    #[error("Error: {0}")]
    Error(String), // Allows custom application errors
}

impl SeedError {
    /// True when SQLite rejected an `ADD COLUMN` because the column is already there.
    pub fn is_duplicate_column(&self) -> bool {
        match self {
            SeedError::DatabaseError(RusqliteError::SqliteFailure(_, Some(msg))) => {
                msg.starts_with("duplicate column name")
            }
            _ => false,
        }
    }
}
