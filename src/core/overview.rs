//! Monthly money-flow aggregation.
//!
//! Takes the effective expense set for a month (resolved by
//! [`crate::core::resolve`]) plus that month's incomes and derives the
//! overview the UI shows: totals, balance, unbudgeted residual, the
//! payment-method histogram, per-person "still owed" and liquidity
//! figures, and the transfer-to-joint split.
//!
//! Business rules baked in here:
//! - transfers are excluded from `total_expenses` but tracked separately,
//! - an expense is *handled* (settled, drops out of "owed" figures) when
//!   it is paid, or when it is a joint-account autogiro in `pending`
//!   state - pending there means the money already left the person's
//!   individual control and sits in the joint pool,
//! - the payment-method histogram includes transfer-flagged rows; it is
//!   a raw histogram, not an expense-only one,
//! - the joint split rounds half-up to 2 decimals.
//!
//! [`calculate_monthly_overview`] folds everything in one pass over the
//! expense list. The per-field helper functions compute the same numbers
//! with straightforward filters; the tests hold the two in agreement.

use crate::entities::{
    expense::{self, ExpenseType, PaymentMethod, PaymentStatus},
    income,
};
use serde::Serialize;

/// Sums per payment method. Serializes with the wire names of the six
/// payment-method values as keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaymentMethodTotals {
    /// E-invoice, person 1
    pub efaktura_jag: f64,
    /// E-invoice, person 2
    pub efaktura_fruga: f64,
    /// Direct debit, person 1
    pub autogiro_jag: f64,
    /// Direct debit, person 2
    pub autogiro_fruga: f64,
    /// Direct debit, joint account
    pub autogiro_gemensamt: f64,
    /// Transfer marker
    pub transfer: f64,
}

impl PaymentMethodTotals {
    /// Adds `amount` to the bucket for `method`.
    pub fn add(&mut self, method: PaymentMethod, amount: f64) {
        match method {
            PaymentMethod::EfakturaJag => self.efaktura_jag += amount,
            PaymentMethod::EfakturaFruga => self.efaktura_fruga += amount,
            PaymentMethod::AutogiroJag => self.autogiro_jag += amount,
            PaymentMethod::AutogiroFruga => self.autogiro_fruga += amount,
            PaymentMethod::AutogiroGemensamt => self.autogiro_gemensamt += amount,
            PaymentMethod::Transfer => self.transfer += amount,
        }
    }
}

/// Sums per person bucket. Payment methods owned by a person go to that
/// person; the joint autogiro and the transfer marker land in the joint
/// (gemensamt) bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PersonTotals {
    /// Person 1
    pub jag: f64,
    /// Person 2
    pub fruga: f64,
    /// Joint account
    pub gemensamt: f64,
}

impl PersonTotals {
    fn add(&mut self, method: PaymentMethod, amount: f64) {
        match method {
            PaymentMethod::EfakturaJag | PaymentMethod::AutogiroJag => self.jag += amount,
            PaymentMethod::EfakturaFruga | PaymentMethod::AutogiroFruga => self.fruga += amount,
            PaymentMethod::AutogiroGemensamt | PaymentMethod::Transfer => {
                self.gemensamt += amount;
            }
        }
    }
}

/// How much each person needs to move to the joint account this month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransferToJoint {
    /// Person 1's share
    pub jag: f64,
    /// Person 2's share
    pub fruga: f64,
}

/// Complete monthly overview, serialized as-is by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOverview {
    /// The month this overview covers (YYYYMM)
    pub year_month: i32,
    /// Sum of all incomes for the month
    pub total_income: f64,
    /// Sum of non-transfer expenses
    pub total_expenses: f64,
    /// Sum of transfer-flagged expenses
    pub total_transfers: f64,
    /// `total_income - total_expenses`
    pub balance: f64,
    /// `total_income - total_expenses - total_transfers`
    pub unbudgeted: f64,
    /// Joint-account split of still-outstanding joint autogiro expenses
    pub transfer_to_joint: TransferToJoint,
    /// Raw payment-method histogram (transfers included)
    pub expenses_by_payment_method: PaymentMethodTotals,
    /// Still-owed amounts per person, transfers excluded
    pub expenses_by_person: PersonTotals,
    /// Cash each person must move this month, transfers included
    pub liquidity_by_person: PersonTotals,
}

/// Default joint split when no `transferSplitRatio` setting exists.
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// True when the expense row belongs to `year_month`: base fixed rows
/// belong to every month, dated rows to their own month only.
fn applies_to_month(expense: &expense::Model, year_month: i32) -> bool {
    (expense.expense_type == ExpenseType::Fixed && expense.year_month.is_none())
        || expense.year_month == Some(year_month)
}

/// True when the expense no longer needs tracking as "owed": it is paid,
/// or it is a joint autogiro already pending (money in the joint pool).
fn is_handled(expense: &expense::Model) -> bool {
    expense.payment_status == PaymentStatus::Paid
        || (expense.payment_method == PaymentMethod::AutogiroGemensamt
            && expense.payment_status == PaymentStatus::Pending)
}

/// Half-up rounding to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of all income amounts.
#[must_use]
pub fn calculate_total_income(incomes: &[income::Model]) -> f64 {
    incomes.iter().map(|i| i.amount).sum()
}

/// Sum of non-transfer expenses applying to the month.
#[must_use]
pub fn calculate_total_expenses(expenses: &[expense::Model], year_month: i32) -> f64 {
    expenses
        .iter()
        .filter(|e| applies_to_month(e, year_month) && !e.is_transfer)
        .map(|e| e.amount)
        .sum()
}

/// Sum of transfer-flagged expenses applying to the month.
#[must_use]
pub fn calculate_total_transfers(expenses: &[expense::Model], year_month: i32) -> f64 {
    expenses
        .iter()
        .filter(|e| applies_to_month(e, year_month) && e.is_transfer)
        .map(|e| e.amount)
        .sum()
}

/// Payment-method histogram over all expenses applying to the month,
/// transfer-flagged rows included.
#[must_use]
pub fn calculate_expenses_by_payment_method(
    expenses: &[expense::Model],
    year_month: i32,
) -> PaymentMethodTotals {
    let mut totals = PaymentMethodTotals::default();
    for e in expenses.iter().filter(|e| applies_to_month(e, year_month)) {
        totals.add(e.payment_method, e.amount);
    }
    totals
}

/// Still-owed amounts per person: not handled, transfers excluded.
#[must_use]
pub fn calculate_expenses_by_person(expenses: &[expense::Model], year_month: i32) -> PersonTotals {
    let mut totals = PersonTotals::default();
    for e in expenses
        .iter()
        .filter(|e| applies_to_month(e, year_month) && !e.is_transfer && !is_handled(e))
    {
        totals.add(e.payment_method, e.amount);
    }
    totals
}

/// Liquidity per person: everything not handled, transfers included,
/// since transfer-bound money still has to leave the person's account.
#[must_use]
pub fn calculate_liquidity_by_person(expenses: &[expense::Model], year_month: i32) -> PersonTotals {
    let mut totals = PersonTotals::default();
    for e in expenses
        .iter()
        .filter(|e| applies_to_month(e, year_month) && !is_handled(e))
    {
        totals.add(e.payment_method, e.amount);
    }
    totals
}

/// Splits the still-outstanding joint autogiro total between the two
/// persons. Paid and pending rows are excluded - pending joint autogiro
/// money is already in the joint account.
#[must_use]
pub fn calculate_transfer_to_joint(
    expenses: &[expense::Model],
    year_month: i32,
    split_ratio: f64,
) -> TransferToJoint {
    let joint_total: f64 = expenses
        .iter()
        .filter(|e| {
            applies_to_month(e, year_month)
                && !e.is_transfer
                && e.payment_method == PaymentMethod::AutogiroGemensamt
                && e.payment_status != PaymentStatus::Paid
                && e.payment_status != PaymentStatus::Pending
        })
        .map(|e| e.amount)
        .sum();

    TransferToJoint {
        jag: round2(joint_total * split_ratio),
        fruga: round2(joint_total * (1.0 - split_ratio)),
    }
}

/// Running totals for the single-pass fold.
#[derive(Default)]
struct OverviewAccumulator {
    total_expenses: f64,
    total_transfers: f64,
    by_payment_method: PaymentMethodTotals,
    by_person: PersonTotals,
    liquidity: PersonTotals,
    joint_outstanding: f64,
}

impl OverviewAccumulator {
    fn fold(&mut self, e: &expense::Model) {
        self.by_payment_method.add(e.payment_method, e.amount);

        if e.is_transfer {
            self.total_transfers += e.amount;
        } else {
            self.total_expenses += e.amount;
        }

        if !is_handled(e) {
            self.liquidity.add(e.payment_method, e.amount);
            if !e.is_transfer {
                self.by_person.add(e.payment_method, e.amount);
            }
        }

        if !e.is_transfer
            && e.payment_method == PaymentMethod::AutogiroGemensamt
            && e.payment_status != PaymentStatus::Paid
            && e.payment_status != PaymentStatus::Pending
        {
            self.joint_outstanding += e.amount;
        }
    }
}

/// Computes the complete monthly overview in a single pass over the
/// expense list. Numerically identical to composing the per-field
/// helpers above.
#[must_use]
pub fn calculate_monthly_overview(
    incomes: &[income::Model],
    expenses: &[expense::Model],
    year_month: i32,
    split_ratio: f64,
) -> MonthlyOverview {
    let total_income = calculate_total_income(incomes);

    let mut acc = OverviewAccumulator::default();
    for e in expenses.iter().filter(|e| applies_to_month(e, year_month)) {
        acc.fold(e);
    }

    MonthlyOverview {
        year_month,
        total_income,
        total_expenses: acc.total_expenses,
        total_transfers: acc.total_transfers,
        balance: total_income - acc.total_expenses,
        unbudgeted: total_income - acc.total_expenses - acc.total_transfers,
        transfer_to_joint: TransferToJoint {
            jag: round2(acc.joint_outstanding * split_ratio),
            fruga: round2(acc.joint_outstanding * (1.0 - split_ratio)),
        },
        expenses_by_payment_method: acc.by_payment_method,
        expenses_by_person: acc.by_person,
        liquidity_by_person: acc.liquidity,
    }
}
