//! Range statistics - batched per-month aggregation for trend views.
//!
//! Runs the same tri-partite override resolution as
//! [`crate::core::resolve`] over a whole month range in one batched pass:
//! the base-fixed set, the range's variable expenses, override rows and
//! incomes are each fetched once and pre-grouped by month, then every
//! month in the range folds its slice into totals, a per-category map
//! and the payment-method histogram. The batching is an optimization
//! only; results match running the single-month pipeline per month.

use crate::{
    core::{month, overview::PaymentMethodTotals},
    entities::{
        Category, Expense, Income,
        expense::{self, ExpenseType},
        income,
    },
    errors::Result,
};
use sea_orm::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Category label for expenses without a (resolvable) category.
pub const UNCATEGORIZED_LABEL: &str = "Okategoriserat";

/// Per-month statistics record for the trend view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    /// The month this record covers (YYYYMM)
    pub year_month: i32,
    /// Sum of all income amounts for the month
    pub total_income: f64,
    /// Sum of all effective expense amounts for the month
    pub total_expenses: f64,
    /// Expense totals keyed by category name
    pub by_category: BTreeMap<String, f64>,
    /// Expense totals keyed by payment method
    pub by_payment_method: PaymentMethodTotals,
}

/// Computes one [`MonthlyStats`] per month in `start..=end`.
///
/// # Errors
/// [`crate::errors::Error::InvalidMonth`] for malformed endpoints,
/// [`crate::errors::Error::InvalidRange`] when `start > end`.
pub async fn monthly_statistics(
    db: &DatabaseConnection,
    start: i32,
    end: i32,
) -> Result<Vec<MonthlyStats>> {
    let months = month::months_in_range(start, end)?;

    // One fetch per collection, grouped up front, instead of one query
    // per month in the range.
    let fixed_expenses = Expense::find()
        .filter(expense::Column::ExpenseType.eq(ExpenseType::Fixed))
        .filter(expense::Column::YearMonth.is_null())
        .filter(expense::Column::OverridesExpenseId.is_null())
        .all(db)
        .await?;

    let variable_expenses = Expense::find()
        .filter(expense::Column::ExpenseType.eq(ExpenseType::Variable))
        .filter(expense::Column::YearMonth.between(start, end))
        .filter(expense::Column::OverridesExpenseId.is_null())
        .all(db)
        .await?;

    let overrides = Expense::find()
        .filter(expense::Column::OverridesExpenseId.is_not_null())
        .filter(expense::Column::YearMonth.between(start, end))
        .all(db)
        .await?;

    let category_names: HashMap<i32, String> = Category::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let incomes = Income::find()
        .filter(income::Column::YearMonth.between(start, end))
        .all(db)
        .await?;

    let variable_by_month = group_by_month(&variable_expenses);
    let overrides_by_month = group_by_month(&overrides);

    let mut income_by_month: HashMap<i32, f64> = HashMap::new();
    for i in &incomes {
        *income_by_month.entry(i.year_month).or_default() += i.amount;
    }

    let stats = months
        .into_iter()
        .map(|year_month| {
            let month_overrides = overrides_by_month.get(&year_month);
            let month_variable = variable_by_month.get(&year_month);

            let overridden: HashSet<i32> = month_overrides
                .into_iter()
                .flatten()
                .filter_map(|o| o.overrides_expense_id)
                .collect();

            let effective = fixed_expenses
                .iter()
                .filter(|e| !overridden.contains(&e.id))
                .chain(
                    month_overrides
                        .into_iter()
                        .flatten()
                        .copied()
                        .filter(|o| !o.is_deleted),
                )
                .chain(month_variable.into_iter().flatten().copied());

            let mut total_expenses = 0.0;
            let mut by_category: BTreeMap<String, f64> = BTreeMap::new();
            let mut by_payment_method = PaymentMethodTotals::default();

            for e in effective {
                total_expenses += e.amount;
                by_payment_method.add(e.payment_method, e.amount);

                let label = e
                    .category_id
                    .and_then(|id| category_names.get(&id))
                    .map_or(UNCATEGORIZED_LABEL, String::as_str);
                *by_category.entry(label.to_string()).or_default() += e.amount;
            }

            MonthlyStats {
                year_month,
                total_income: income_by_month.get(&year_month).copied().unwrap_or(0.0),
                total_expenses,
                by_category,
                by_payment_method,
            }
        })
        .collect();

    Ok(stats)
}

fn group_by_month(expenses: &[expense::Model]) -> HashMap<i32, Vec<&expense::Model>> {
    let mut grouped: HashMap<i32, Vec<&expense::Model>> = HashMap::new();
    for e in expenses {
        if let Some(ym) = e.year_month {
            grouped.entry(ym).or_default().push(e);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{expense as expense_core, overview, resolve};
    use crate::entities::income::Owner;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_statistics_resolve_overrides_per_month() -> Result<()> {
        let db = setup_test_db().await?;
        let hyra = create_fixed_expense(&db, "Hyra", 10000.0).await?;
        resolve::create_expense_override(
            &db,
            hyra.id,
            202502,
            expense_core::ExpensePatch {
                amount: Some(10500.0),
                ..Default::default()
            },
        )
        .await?;
        resolve::create_deleted_override(&db, hyra.id, 202503).await?;
        create_variable_expense(&db, "Semester", 8000.0, 202502).await?;

        let stats = monthly_statistics(&db, 202501, 202503).await?;
        assert_eq!(stats.len(), 3);

        assert_eq!(stats[0].year_month, 202501);
        assert_eq!(stats[0].total_expenses, 10000.0);

        assert_eq!(stats[1].year_month, 202502);
        assert_eq!(stats[1].total_expenses, 10500.0 + 8000.0);

        // Hidden for March: neither base nor override counts.
        assert_eq!(stats[2].year_month, 202503);
        assert_eq!(stats[2].total_expenses, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_group_by_category_with_sentinel() -> Result<()> {
        let db = setup_test_db().await?;
        let boende = create_test_category(&db, "Boende").await?;
        let hyra = create_fixed_expense(&db, "Hyra", 10000.0).await?;
        expense_core::update_expense(
            &db,
            hyra.id,
            expense_core::ExpensePatch {
                category_id: Some(Some(boende.id)),
                ..Default::default()
            },
        )
        .await?;
        create_fixed_expense(&db, "Diverse", 300.0).await?;

        let stats = monthly_statistics(&db, 202501, 202501).await?;
        let by_category = &stats[0].by_category;
        assert_eq!(by_category.get("Boende").copied(), Some(10000.0));
        assert_eq!(by_category.get(UNCATEGORIZED_LABEL).copied(), Some(300.0));

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_income_grouped_by_month() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_income(&db, "Lön", Owner::Jag, 30000.0, 202501).await?;
        create_test_income(&db, "Lön", Owner::Fruga, 25000.0, 202501).await?;
        create_test_income(&db, "Lön", Owner::Jag, 31000.0, 202502).await?;

        let stats = monthly_statistics(&db, 202501, 202502).await?;
        assert_eq!(stats[0].total_income, 55000.0);
        assert_eq!(stats[1].total_income, 31000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_range_crosses_year_boundary() -> Result<()> {
        let db = setup_test_db().await?;
        create_variable_expense(&db, "Julklappar", 5000.0, 202412).await?;
        create_variable_expense(&db, "Rea", 1000.0, 202501).await?;

        let stats = monthly_statistics(&db, 202411, 202501).await?;
        let months: Vec<i32> = stats.iter().map(|s| s.year_month).collect();
        assert_eq!(months, vec![202411, 202412, 202501]);
        assert_eq!(stats[0].total_expenses, 0.0);
        assert_eq!(stats[1].total_expenses, 5000.0);
        assert_eq!(stats[2].total_expenses, 1000.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_statistics_rejects_bad_ranges() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            monthly_statistics(&db, 202502, 202501).await,
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            monthly_statistics(&db, 202513, 202601).await,
            Err(Error::InvalidMonth { value: 202513 })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_batched_matches_single_month_pipeline() -> Result<()> {
        let db = setup_test_db().await?;
        let hyra = create_fixed_expense(&db, "Hyra", 10000.0).await?;
        create_fixed_expense(&db, "El", 800.0).await?;
        resolve::create_expense_override(
            &db,
            hyra.id,
            202502,
            expense_core::ExpensePatch {
                amount: Some(11000.0),
                ..Default::default()
            },
        )
        .await?;
        create_variable_expense(&db, "Bil", 3000.0, 202501).await?;
        create_test_income(&db, "Lön", Owner::Jag, 30000.0, 202502).await?;

        let stats = monthly_statistics(&db, 202501, 202503).await?;

        for stat in stats {
            let effective = expense_core::get_expenses_for_month(&db, stat.year_month).await?;
            let expected: f64 = overview::calculate_total_expenses(&effective, stat.year_month)
                + overview::calculate_total_transfers(&effective, stat.year_month);
            assert_eq!(stat.total_expenses, expected, "month {}", stat.year_month);

            let histogram =
                overview::calculate_expenses_by_payment_method(&effective, stat.year_month);
            assert_eq!(stat.by_payment_method, histogram);
        }

        Ok(())
    }
}
