//! Business logic for the household budget, independent of the HTTP
//! surface.

/// Category CRUD with case-insensitive uniqueness
pub mod category;
/// Expense CRUD and month-effective lookups
pub mod expense;
/// Income CRUD
pub mod income;
/// YYYYMM month arithmetic and validation
pub mod month;
/// Monthly overview aggregation
pub mod overview;
/// Fixed-expense override resolution
pub mod resolve;
/// Key/value household settings
pub mod settings;
/// Batched range statistics
pub mod statistics;
