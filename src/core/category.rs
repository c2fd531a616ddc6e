//! Category business logic - CRUD with case-insensitive name uniqueness.
//!
//! Deleting a category never deletes expenses: referencing rows get
//! their `category_id` nulled out inside the same transaction.

use crate::{
    entities::{Category, Expense, category, expense},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Default display color for new categories.
pub const DEFAULT_COLOR: &str = "#6366f1";

/// Payload for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Display name, unique case-insensitively
    pub name: String,
    /// Optional hex color, defaults to [`DEFAULT_COLOR`]
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New hex color
    #[serde(default)]
    pub color: Option<String>,
}

/// Retrieves all categories ordered by name (case-insensitive).
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    let mut categories = Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?;
    categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(categories)
}

/// Finds a category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn name_taken<C>(db: &C, name: &str, exclude_id: Option<i32>) -> Result<bool>
where
    C: ConnectionTrait,
{
    let lowered = name.to_lowercase();
    let existing = Category::find().all(db).await?;
    Ok(existing
        .iter()
        .any(|c| Some(c.id) != exclude_id && c.name.to_lowercase() == lowered))
}

/// Creates a new category.
///
/// # Errors
/// [`Error::Validation`] for an empty name,
/// [`Error::DuplicateCategory`] when the name is already taken
/// (case-insensitively).
pub async fn create_category(db: &DatabaseConnection, data: NewCategory) -> Result<category::Model> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Category name cannot be empty".to_string(),
        });
    }
    if name_taken(db, name, None).await? {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
        });
    }

    let row = category::ActiveModel {
        name: Set(name.to_string()),
        color: Set(data.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
        ..Default::default()
    };

    row.insert(db).await.map_err(Into::into)
}

/// Applies a partial update to a category by id.
///
/// # Errors
/// [`Error::CategoryNotFound`] when the id does not exist,
/// [`Error::DuplicateCategory`] when renaming onto an existing name.
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i32,
    patch: CategoryPatch,
) -> Result<category::Model> {
    let existing = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    if let Some(name) = &patch.name {
        if name_taken(db, name, Some(category_id)).await? {
            return Err(Error::DuplicateCategory { name: name.clone() });
        }
    }

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(color) = patch.color {
        active.color = Set(color);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes a category and nulls out `category_id` on every expense that
/// referenced it, in one transaction.
///
/// # Errors
/// [`Error::CategoryNotFound`] when the id does not exist.
pub async fn delete_category(db: &DatabaseConnection, category_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    Expense::update_many()
        .col_expr(expense::Column::CategoryId, Expr::value(Option::<i32>::None))
        .filter(expense::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;

    Category::delete_by_id(category_id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}
