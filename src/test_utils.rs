//! Shared test utilities for Familjebudget.
//!
//! This module provides common helper functions for setting up test
//! databases, creating test rows through the core layer, and building
//! in-memory expense fixtures for the pure aggregation functions.

use crate::{
    core::{category, expense, income},
    entities::{
        self,
        expense::{ExpenseType, PaymentMethod, PaymentStatus},
        income::Owner,
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a base fixed expense with sensible defaults.
///
/// # Defaults
/// * `payment_method`: joint autogiro
/// * `payment_status`: unpaid
/// * no category, not a transfer
pub async fn create_fixed_expense(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        expense::NewExpense {
            name: name.to_string(),
            amount,
            category_id: None,
            expense_type: ExpenseType::Fixed,
            payment_method: PaymentMethod::AutogiroGemensamt,
            payment_status: None,
            year_month: None,
            is_transfer: false,
        },
    )
    .await
}

/// Creates a variable expense scoped to one month, with the same
/// defaults as [`create_fixed_expense`].
pub async fn create_variable_expense(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
    year_month: i32,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        expense::NewExpense {
            name: name.to_string(),
            amount,
            category_id: None,
            expense_type: ExpenseType::Variable,
            payment_method: PaymentMethod::AutogiroGemensamt,
            payment_status: None,
            year_month: Some(year_month),
            is_transfer: false,
        },
    )
    .await
}

/// Creates a test income row.
pub async fn create_test_income(
    db: &DatabaseConnection,
    name: &str,
    owner: Owner,
    amount: f64,
    year_month: i32,
) -> Result<entities::income::Model> {
    income::create_income(
        db,
        income::NewIncome {
            name: name.to_string(),
            owner,
            amount,
            year_month,
        },
    )
    .await
}

/// Creates a test category with the default color.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        category::NewCategory {
            name: name.to_string(),
            color: None,
        },
    )
    .await
}

/// Builds an in-memory base fixed expense for the pure resolution and
/// aggregation functions. Joint autogiro, unpaid, no category.
#[must_use]
pub fn fixed_fixture(id: i32, name: &str, amount: f64) -> entities::expense::Model {
    entities::expense::Model {
        id,
        name: name.to_string(),
        amount,
        category_id: None,
        expense_type: ExpenseType::Fixed,
        payment_method: PaymentMethod::AutogiroGemensamt,
        payment_status: PaymentStatus::Unpaid,
        year_month: None,
        overrides_expense_id: None,
        is_deleted: false,
        is_transfer: false,
        created_at: Utc::now(),
    }
}

/// Builds an in-memory variable expense scoped to `year_month`.
#[must_use]
pub fn variable_fixture(
    id: i32,
    name: &str,
    amount: f64,
    year_month: i32,
) -> entities::expense::Model {
    entities::expense::Model {
        expense_type: ExpenseType::Variable,
        year_month: Some(year_month),
        ..fixed_fixture(id, name, amount)
    }
}

/// Builds an in-memory override row for `base_id` in `year_month`.
#[must_use]
pub fn override_fixture(
    id: i32,
    base_id: i32,
    year_month: i32,
    amount: f64,
) -> entities::expense::Model {
    entities::expense::Model {
        year_month: Some(year_month),
        overrides_expense_id: Some(base_id),
        ..fixed_fixture(id, "Override", amount)
    }
}

/// Builds an in-memory income row named "Lön".
#[must_use]
pub fn income_fixture(owner: Owner, amount: f64, year_month: i32) -> entities::income::Model {
    entities::income::Model {
        id: 0,
        name: "Lön".to_string(),
        owner,
        amount,
        year_month,
    }
}
