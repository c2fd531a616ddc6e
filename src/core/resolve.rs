//! Override resolution - Decides which expense rows apply to a month.
//!
//! The effective set for a month M is the tri-partite union of:
//! 1. base fixed expenses with no override row for M (a hidden override
//!    still suppresses its base),
//! 2. variable expenses scoped to M,
//! 3. non-hidden override rows scoped to M.
//!
//! [`effective_for_month`] is a pure function over an in-memory slice so
//! it gives correct per-month results whether the caller pre-filtered the
//! collection or handed over the entire expense history.
//!
//! The find-or-create operations here are the only writers of override
//! rows. Both run inside a single database transaction, so at most one
//! override row ever exists per `(base, month)` pair.

use crate::{
    core::{
        expense::{ExpensePatch, apply_patch, capitalize},
        month,
    },
    entities::{
        Expense,
        expense::{self, ExpenseType},
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveEnum, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;

/// Produces the expenses effective for `year_month` from any collection
/// of expense rows, with no duplicates and no base expense appearing
/// alongside its own override.
///
/// The result is sorted for display: fixed before variable, then by
/// payment method, then by case-insensitive name.
#[must_use]
pub fn effective_for_month(expenses: &[expense::Model], year_month: i32) -> Vec<expense::Model> {
    // Ids of base expenses suppressed for this month. Hidden overrides
    // count too: the base must not resurface when its override is hidden.
    let overridden: HashSet<i32> = expenses
        .iter()
        .filter(|e| e.year_month == Some(year_month))
        .filter_map(|e| e.overrides_expense_id)
        .collect();

    let mut effective: Vec<expense::Model> = expenses
        .iter()
        .filter(|e| {
            if e.overrides_expense_id.is_some() {
                e.year_month == Some(year_month) && !e.is_deleted
            } else {
                match e.expense_type {
                    ExpenseType::Fixed => e.year_month.is_none() && !overridden.contains(&e.id),
                    ExpenseType::Variable => e.year_month == Some(year_month),
                }
            }
        })
        .cloned()
        .collect();

    sort_for_display(&mut effective);
    effective
}

/// Sorts expenses for display: fixed before variable, then by payment
/// method string, then by name (case-insensitive).
pub fn sort_for_display(expenses: &mut [expense::Model]) {
    expenses.sort_by(|a, b| {
        (a.expense_type == ExpenseType::Variable)
            .cmp(&(b.expense_type == ExpenseType::Variable))
            .then_with(|| a.payment_method.to_value().cmp(&b.payment_method.to_value()))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

/// Finds the override/hide row for `(base_id, year_month)`, if any.
pub async fn find_override<C>(
    db: &C,
    base_id: i32,
    year_month: i32,
) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::OverridesExpenseId.eq(base_id))
        .filter(expense::Column::YearMonth.eq(year_month))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates or updates the override for `(base_id, year_month)`.
///
/// If an override/hide row already exists for that pair, `patch` is
/// applied to it in place. Otherwise a new row is synthesized: always
/// fixed, scoped to `year_month`, pointing at the base, with every field
/// taken from `patch` when present and inherited from the base otherwise.
///
/// The `year_month` path argument owns the row's month scope; a
/// `year_month` in the patch is ignored so an override can never migrate
/// onto a month that already has one.
///
/// # Errors
/// [`Error::InvalidMonth`] for a malformed month,
/// [`Error::InvalidAmount`] for a negative or non-finite patch amount,
/// [`Error::ExpenseNotFound`] when the base expense does not exist.
pub async fn create_expense_override(
    db: &DatabaseConnection,
    base_id: i32,
    year_month: i32,
    patch: ExpensePatch,
) -> Result<expense::Model> {
    month::ensure_valid(year_month)?;
    if let Some(amount) = patch.amount {
        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }
    }
    let patch = ExpensePatch {
        year_month: None,
        ..patch
    };

    let txn = db.begin().await?;

    if let Some(existing) = find_override(&txn, base_id, year_month).await? {
        let updated = apply_patch(existing, &patch).update(&txn).await?;
        txn.commit().await?;
        return Ok(updated);
    }

    let base = Expense::find_by_id(base_id)
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: base_id })?;

    let name = patch
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&base.name);

    let row = expense::ActiveModel {
        name: Set(capitalize(name)),
        amount: Set(patch.amount.unwrap_or(base.amount)),
        category_id: Set(patch.category_id.unwrap_or(base.category_id)),
        expense_type: Set(ExpenseType::Fixed),
        payment_method: Set(patch.payment_method.unwrap_or(base.payment_method)),
        payment_status: Set(patch.payment_status.unwrap_or(base.payment_status)),
        year_month: Set(Some(year_month)),
        overrides_expense_id: Set(Some(base_id)),
        is_deleted: Set(false),
        is_transfer: Set(patch.is_transfer.unwrap_or(base.is_transfer)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let inserted = row.insert(&txn).await?;
    txn.commit().await?;
    Ok(inserted)
}

/// Hides the base expense for one month without deleting it.
///
/// Reuses the existing override row for `(base_id, year_month)` by
/// flipping `is_deleted`; when none exists, clones the base's fields
/// verbatim into a new hidden row.
///
/// # Errors
/// [`Error::InvalidMonth`] for a malformed month,
/// [`Error::ExpenseNotFound`] when the base expense does not exist.
pub async fn create_deleted_override(
    db: &DatabaseConnection,
    base_id: i32,
    year_month: i32,
) -> Result<expense::Model> {
    month::ensure_valid(year_month)?;

    let txn = db.begin().await?;

    if let Some(existing) = find_override(&txn, base_id, year_month).await? {
        let mut active: expense::ActiveModel = existing.into();
        active.is_deleted = Set(true);
        let updated = active.update(&txn).await?;
        txn.commit().await?;
        return Ok(updated);
    }

    let base = Expense::find_by_id(base_id)
        .one(&txn)
        .await?
        .ok_or(Error::ExpenseNotFound { id: base_id })?;

    let row = expense::ActiveModel {
        name: Set(base.name.clone()),
        amount: Set(base.amount),
        category_id: Set(base.category_id),
        expense_type: Set(ExpenseType::Fixed),
        payment_method: Set(base.payment_method),
        payment_status: Set(base.payment_status),
        year_month: Set(Some(year_month)),
        overrides_expense_id: Set(Some(base_id)),
        is_deleted: Set(true),
        is_transfer: Set(base.is_transfer),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let inserted = row.insert(&txn).await?;
    txn.commit().await?;
    Ok(inserted)
}
