//! Storage Layer
//!
//! Provides SQLite persistence for loan requests with repository pattern.

mod repository;

pub use repository::{LoanRequestRecord, NewLoanRequest, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Loan request {0} not found")]
    NotFound(i64),
}
