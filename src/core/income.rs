//! Income business logic - CRUD for month-scoped incomes.

use crate::{
    core::month,
    entities::{
        Income,
        income::{self, Owner},
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Payload for creating an income.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIncome {
    /// Display name (e.g., "Lön")
    pub name: String,
    /// Person the income belongs to
    pub owner: Owner,
    /// Monetary amount, must be non-negative and finite
    pub amount: f64,
    /// YYYYMM the income applies to
    pub year_month: i32,
}

/// Partial update for an income.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomePatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New owner
    #[serde(default)]
    pub owner: Option<Owner>,
    /// New amount
    #[serde(default)]
    pub amount: Option<f64>,
    /// New month scope
    #[serde(default)]
    pub year_month: Option<i32>,
}

/// Retrieves incomes, optionally filtered to one month, ordered by owner
/// then name.
///
/// # Errors
/// [`Error::InvalidMonth`] when a malformed month filter is supplied.
pub async fn get_incomes(
    db: &DatabaseConnection,
    year_month: Option<i32>,
) -> Result<Vec<income::Model>> {
    let mut query = Income::find();
    if let Some(ym) = year_month {
        month::ensure_valid(ym)?;
        query = query.filter(income::Column::YearMonth.eq(ym));
    }
    query
        .order_by_asc(income::Column::Owner)
        .order_by_asc(income::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an income by its unique ID.
pub async fn get_income_by_id(
    db: &DatabaseConnection,
    income_id: i32,
) -> Result<Option<income::Model>> {
    Income::find_by_id(income_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new income.
///
/// # Errors
/// [`Error::Validation`] for an empty name, [`Error::InvalidAmount`] for
/// negative or non-finite amounts, [`Error::InvalidMonth`] for a
/// malformed month.
pub async fn create_income(db: &DatabaseConnection, data: NewIncome) -> Result<income::Model> {
    if data.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Income name cannot be empty".to_string(),
        });
    }
    if data.amount < 0.0 || !data.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: data.amount,
        });
    }
    month::ensure_valid(data.year_month)?;

    let row = income::ActiveModel {
        name: Set(data.name.trim().to_string()),
        owner: Set(data.owner),
        amount: Set(data.amount),
        year_month: Set(data.year_month),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to an income by id.
///
/// # Errors
/// [`Error::IncomeNotFound`] when the id does not exist,
/// [`Error::InvalidAmount`] / [`Error::InvalidMonth`] for bad patch
/// values.
pub async fn update_income(
    db: &DatabaseConnection,
    income_id: i32,
    patch: IncomePatch,
) -> Result<income::Model> {
    if let Some(amount) = patch.amount {
        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if let Some(ym) = patch.year_month {
        month::ensure_valid(ym)?;
    }

    let existing = Income::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or(Error::IncomeNotFound { id: income_id })?;

    let mut active: income::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(owner) = patch.owner {
        active.owner = Set(owner);
    }
    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(year_month) = patch.year_month {
        active.year_month = Set(year_month);
    }

    active.update(db).await.map_err(Into::into)
}

/// Hard-deletes an income by id.
///
/// # Errors
/// [`Error::IncomeNotFound`] when the id does not exist.
pub async fn delete_income(db: &DatabaseConnection, income_id: i32) -> Result<()> {
    let result = Income::delete_by_id(income_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::IncomeNotFound { id: income_id });
    }
    Ok(())
}
