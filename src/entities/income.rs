//! Income entity - Month-scoped income for one of the two tracked persons.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which of the two household members the income belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Person 1 (display name from the `person1Name` setting)
    #[sea_orm(string_value = "jag")]
    Jag,
    /// Person 2 (display name from the `person2Name` setting)
    #[sea_orm(string_value = "fruga")]
    Fruga,
}

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display name (e.g., "Lön", "Barnbidrag")
    pub name: String,
    /// Person the income belongs to
    pub owner: Owner,
    /// Monetary amount, currency-agnostic
    pub amount: f64,
    /// YYYYMM the income applies to
    pub year_month: i32,
}

/// Income has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
