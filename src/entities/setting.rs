//! Setting entity - Key-value pairs for display configuration.
//! Stores the two person display names and the optional transfer split
//! ratio used by the monthly overview.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Setting database model - stores key-value configuration pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Configuration key (e.g., `"person1Name"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Configuration value stored as string
    pub value: String,
}

/// Setting has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
