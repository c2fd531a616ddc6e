//! Expense business logic - CRUD and month-scoped retrieval.
//!
//! Creation validates at the boundary (non-empty name, non-negative
//! finite amount, variable expenses need a month) and normalizes input:
//! names are capitalized and fixed expenses always get `year_month =
//! NULL`. Month-scoped retrieval fetches the full expense history and
//! delegates to [`crate::core::resolve::effective_for_month`], so the
//! tri-partite override logic lives in exactly one place.

use crate::{
    core::{month, resolve},
    entities::{
        Expense,
        expense::{self, ExpenseType, PaymentMethod, PaymentStatus},
    },
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Deserializer};

/// Payload for creating an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    /// Display name, capitalized on insert
    pub name: String,
    /// Monetary amount, must be non-negative and finite
    pub amount: f64,
    /// Optional category reference
    #[serde(default)]
    pub category_id: Option<i32>,
    /// Fixed (recurring) or variable (single month)
    pub expense_type: ExpenseType,
    /// Payment channel
    pub payment_method: PaymentMethod,
    /// Defaults to unpaid when omitted
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Required for variable expenses, ignored for fixed ones
    #[serde(default)]
    pub year_month: Option<i32>,
    /// Inter-account transfer marker
    #[serde(default)]
    pub is_transfer: bool,
}

/// Partial update for an expense. `None` leaves a field untouched; the
/// nullable columns use a double `Option` so "set to NULL" (`Some(None)`)
/// and "leave alone" (`None`) stay distinguishable after deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New amount
    #[serde(default)]
    pub amount: Option<f64>,
    /// New category (`Some(None)` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    /// New expense type
    #[serde(default)]
    pub expense_type: Option<ExpenseType>,
    /// New payment method
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// New payment status
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// New month scope (`Some(None)` clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub year_month: Option<Option<i32>>,
    /// New hide flag (only meaningful on override rows)
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// New transfer marker
    #[serde(default)]
    pub is_transfer: Option<bool>,
}

fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Uppercases the first character of a display name.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Turns a model into an active model with the patch's fields applied.
/// Fields absent from the patch keep their current values.
pub(crate) fn apply_patch(model: expense::Model, patch: &ExpensePatch) -> expense::ActiveModel {
    let mut active: expense::ActiveModel = model.into();
    if let Some(name) = &patch.name {
        active.name = Set(name.clone());
    }
    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(category_id) = patch.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(expense_type) = patch.expense_type {
        active.expense_type = Set(expense_type);
    }
    if let Some(payment_method) = patch.payment_method {
        active.payment_method = Set(payment_method);
    }
    if let Some(payment_status) = patch.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(year_month) = patch.year_month {
        active.year_month = Set(year_month);
    }
    if let Some(is_deleted) = patch.is_deleted {
        active.is_deleted = Set(is_deleted);
    }
    if let Some(is_transfer) = patch.is_transfer {
        active.is_transfer = Set(is_transfer);
    }
    active
}

/// Retrieves every expense row (bases, variables and overrides alike) in
/// display order. Used when the caller wants the raw history rather than
/// a resolved month view.
pub async fn get_all_expenses(db: &DatabaseConnection) -> Result<Vec<expense::Model>> {
    let mut expenses = Expense::find().all(db).await?;
    resolve::sort_for_display(&mut expenses);
    Ok(expenses)
}

/// Retrieves the effective expense set for one month, with overrides
/// applied and hidden bases removed.
///
/// # Errors
/// [`Error::InvalidMonth`] for a malformed month.
pub async fn get_expenses_for_month(
    db: &DatabaseConnection,
    year_month: i32,
) -> Result<Vec<expense::Model>> {
    month::ensure_valid(year_month)?;
    let expenses = Expense::find().all(db).await?;
    Ok(resolve::effective_for_month(&expenses, year_month))
}

/// Finds an expense by its unique ID.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    expense_id: i32,
) -> Result<Option<expense::Model>> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new base fixed or variable expense.
///
/// # Errors
/// [`Error::Validation`] for an empty name or a variable expense without
/// a month, [`Error::InvalidAmount`] for negative or non-finite amounts,
/// [`Error::InvalidMonth`] for a malformed month.
pub async fn create_expense(db: &DatabaseConnection, data: NewExpense) -> Result<expense::Model> {
    if data.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Expense name cannot be empty".to_string(),
        });
    }
    if data.amount < 0.0 || !data.amount.is_finite() {
        return Err(Error::InvalidAmount {
            amount: data.amount,
        });
    }

    // Fixed expenses recur, so they never carry a month; variable
    // expenses must name the one month they apply to.
    let year_month = match data.expense_type {
        ExpenseType::Fixed => None,
        ExpenseType::Variable => {
            let ym = data.year_month.ok_or_else(|| Error::Validation {
                message: "year_month is required for variable expenses".to_string(),
            })?;
            Some(month::ensure_valid(ym)?)
        }
    };

    let row = expense::ActiveModel {
        name: Set(capitalize(data.name.trim())),
        amount: Set(data.amount),
        category_id: Set(data.category_id),
        expense_type: Set(data.expense_type),
        payment_method: Set(data.payment_method),
        payment_status: Set(data.payment_status.unwrap_or(PaymentStatus::Unpaid)),
        year_month: Set(year_month),
        overrides_expense_id: Set(None),
        is_deleted: Set(false),
        is_transfer: Set(data.is_transfer),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to an expense by id.
///
/// # Errors
/// [`Error::ExpenseNotFound`] when the id does not exist,
/// [`Error::InvalidMonth`] when the patch carries a malformed month,
/// [`Error::InvalidAmount`] for negative or non-finite amounts.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i32,
    patch: ExpensePatch,
) -> Result<expense::Model> {
    if let Some(amount) = patch.amount {
        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount { amount });
        }
    }
    if let Some(Some(ym)) = patch.year_month {
        month::ensure_valid(ym)?;
    }

    let existing = Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or(Error::ExpenseNotFound { id: expense_id })?;

    apply_patch(existing, &patch)
        .update(db)
        .await
        .map_err(Into::into)
}

/// Hard-deletes an expense by id.
///
/// # Errors
/// [`Error::ExpenseNotFound`] when the id does not exist.
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i32) -> Result<()> {
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }
    Ok(())
}

/// Distinct months that carry dated expense rows (variable expenses and
/// overrides), newest first. Feeds the month picker in the UI.
pub async fn months_with_expenses(db: &DatabaseConnection) -> Result<Vec<i32>> {
    let expenses = Expense::find().all(db).await?;
    let mut months: Vec<i32> = expenses.iter().filter_map(|e| e.year_month).collect();
    months.sort_unstable_by(|a, b| b.cmp(a));
    months.dedup();
    Ok(months)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn new_fixed(name: &str, amount: f64) -> NewExpense {
        NewExpense {
            name: name.to_string(),
            amount,
            category_id: None,
            expense_type: ExpenseType::Fixed,
            payment_method: PaymentMethod::AutogiroGemensamt,
            payment_status: None,
            year_month: None,
            is_transfer: false,
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hyra"), "Hyra");
        assert_eq!(capitalize("El"), "El");
        assert_eq!(capitalize("äpple"), "Äpple");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_create_fixed_expense_has_no_month() -> Result<()> {
        let db = setup_test_db().await?;

        let expense = create_expense(&db, new_fixed("hyra", 10000.0)).await?;
        assert_eq!(expense.name, "Hyra");
        assert_eq!(expense.expense_type, ExpenseType::Fixed);
        assert_eq!(expense.year_month, None);
        assert_eq!(expense.overrides_expense_id, None);
        assert_eq!(expense.payment_status, PaymentStatus::Unpaid);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_fixed_expense_ignores_supplied_month() -> Result<()> {
        let db = setup_test_db().await?;

        let mut data = new_fixed("Hyra", 10000.0);
        data.year_month = Some(202601);
        let expense = create_expense(&db, data).await?;
        assert_eq!(expense.year_month, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_expense_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_expense(&db, new_fixed("   ", 100.0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_expense(&db, new_fixed("Hyra", -50.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { amount }) if amount == -50.0));

        let result = create_expense(&db, new_fixed("Hyra", f64::NAN)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let mut variable = new_fixed("Mat", 400.0);
        variable.expense_type = ExpenseType::Variable;
        let result = create_expense(&db, variable.clone()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        variable.year_month = Some(202613);
        let result = create_expense(&db, variable).await;
        assert!(matches!(result, Err(Error::InvalidMonth { value: 202613 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_expense_patch_semantics() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Boende").await?;
        let expense = create_fixed_expense(&db, "Hyra", 10000.0).await?;

        let updated = update_expense(
            &db,
            expense.id,
            ExpensePatch {
                amount: Some(10200.0),
                category_id: Some(Some(category.id)),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.amount, 10200.0);
        assert_eq!(updated.category_id, Some(category.id));
        assert_eq!(updated.name, "Hyra"); // untouched

        // Some(None) clears the nullable column.
        let cleared = update_expense(
            &db,
            expense.id,
            ExpensePatch {
                category_id: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cleared.category_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_payment_status_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let expense = create_fixed_expense(&db, "El", 500.0).await?;

        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Unpaid,
        ] {
            let updated = update_expense(
                &db,
                expense.id,
                ExpensePatch {
                    payment_status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
            assert_eq!(updated.payment_status, status);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_expense_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_expense(&db, 999, ExpensePatch::default()).await;
        assert!(matches!(result, Err(Error::ExpenseNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense() -> Result<()> {
        let db = setup_test_db().await?;
        let expense = create_fixed_expense(&db, "Hyra", 10000.0).await?;

        delete_expense(&db, expense.id).await?;
        assert!(get_expense_by_id(&db, expense.id).await?.is_none());

        let result = delete_expense(&db, expense.id).await;
        assert!(matches!(result, Err(Error::ExpenseNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_months_with_expenses_distinct_descending() -> Result<()> {
        let db = setup_test_db().await?;
        create_fixed_expense(&db, "Hyra", 10000.0).await?;
        create_variable_expense(&db, "Mat", 400.0, 202501).await?;
        create_variable_expense(&db, "Bil", 900.0, 202412).await?;
        create_variable_expense(&db, "Mer mat", 300.0, 202501).await?;

        let months = months_with_expenses(&db).await?;
        assert_eq!(months, vec![202501, 202412]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_expenses_for_month_rejects_invalid_month() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_expenses_for_month(&db, 123).await;
        assert!(matches!(result, Err(Error::InvalidMonth { value: 123 })));

        Ok(())
    }
}
