//! Unified error types for the budget API.
//!
//! The core modules raise these errors and never map them to HTTP status
//! codes themselves; that translation lives in the `api` layer.

use thiserror::Error;

/// All failure modes of the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Request payload failed validation at the boundary.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// A `YYYYMM` value outside 190001..=209912 or with month not in 1..=12.
    #[error("Invalid yearMonth: {value}. Use YYYYMM.")]
    InvalidMonth {
        /// The rejected value
        value: i32,
    },

    /// A statistics range where start comes after end.
    #[error("Invalid month range: {start} > {end}")]
    InvalidRange {
        /// Range start (YYYYMM)
        start: i32,
        /// Range end (YYYYMM)
        end: i32,
    },

    /// A monetary amount that is negative or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Expense lookup by id found nothing.
    #[error("Expense {id} not found")]
    ExpenseNotFound {
        /// The requested expense id
        id: i32,
    },

    /// Income lookup by id found nothing.
    #[error("Income {id} not found")]
    IncomeNotFound {
        /// The requested income id
        id: i32,
    },

    /// Category lookup by id found nothing.
    #[error("Category {id} not found")]
    CategoryNotFound {
        /// The requested category id
        id: i32,
    },

    /// Category name collision (names are unique case-insensitively).
    #[error("Category '{name}' already exists")]
    DuplicateCategory {
        /// The conflicting name
        name: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (listener binding, data directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
