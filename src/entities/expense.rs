//! Expense entity - Represents recurring and one-off household expenses.
//!
//! A row is one of three shapes distinguished by `year_month` and
//! `overrides_expense_id`:
//! - base fixed expense: `expense_type = fixed`, both columns NULL,
//!   applies to every month unless overridden,
//! - variable expense: `year_month` set, applies to that month only,
//! - override/hide row: `overrides_expense_id` points at a base fixed
//!   expense and `year_month` names the month it replaces it for.
//!   `is_deleted = true` suppresses the base for that month entirely.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether an expense recurs every month or applies to a single month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    /// Recurs every month unless overridden or hidden for a specific month
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// Applies only to the month named in `year_month`
    #[sea_orm(string_value = "variable")]
    Variable,
}

/// How an expense gets paid. Two channels per person (e-invoice and
/// autogiro/direct debit), an autogiro on the joint account, and a pure
/// transfer marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// E-invoice paid by person 1
    #[sea_orm(string_value = "efaktura_jag")]
    EfakturaJag,
    /// E-invoice paid by person 2
    #[sea_orm(string_value = "efaktura_fruga")]
    EfakturaFruga,
    /// Direct debit from person 1's account
    #[sea_orm(string_value = "autogiro_jag")]
    AutogiroJag,
    /// Direct debit from person 2's account
    #[sea_orm(string_value = "autogiro_fruga")]
    AutogiroFruga,
    /// Direct debit from the joint account
    #[sea_orm(string_value = "autogiro_gemensamt")]
    AutogiroGemensamt,
    /// Money moved between own accounts, not a genuine expense
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Payment state of an expense for the month it applies to.
/// Cycles unpaid -> pending -> paid via user action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Payment initiated (for joint autogiro: money already moved to the joint account)
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Settled
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name, capitalized on creation (e.g., "Hyra", "El")
    pub name: String,
    /// Monetary amount, currency-agnostic
    pub amount: f64,
    /// Optional category; nulled out when the category is deleted
    pub category_id: Option<i32>,
    /// Fixed (recurring) or variable (single month)
    pub expense_type: ExpenseType,
    /// Payment channel, drives person attribution in the overview
    pub payment_method: PaymentMethod,
    /// Current payment state
    pub payment_status: PaymentStatus,
    /// YYYYMM the row applies to; NULL on base fixed expenses
    pub year_month: Option<i32>,
    /// Base expense this row overrides, NULL on base and variable rows
    pub overrides_expense_id: Option<i32>,
    /// On override rows: hides the base expense for that month
    pub is_deleted: bool,
    /// Inter-account transfer rather than a genuine expense
    pub is_transfer: bool,
    /// Creation timestamp, informational only
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
