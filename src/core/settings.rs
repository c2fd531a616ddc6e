//! Settings business logic - a small key/value store for household
//! preferences (person names, transfer split ratio).

use crate::{
    entities::{Setting, setting},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use std::collections::BTreeMap;

use super::overview::DEFAULT_SPLIT_RATIO;

/// Key holding person 1's display name.
pub const PERSON1_NAME_KEY: &str = "person1Name";
/// Key holding person 2's display name.
pub const PERSON2_NAME_KEY: &str = "person2Name";
/// Key holding the transfer-to-joint split ratio for person 1.
pub const SPLIT_RATIO_KEY: &str = "transferSplitRatio";

/// Retrieves every setting as a key/value map.
pub async fn get_settings(db: &DatabaseConnection) -> Result<BTreeMap<String, String>> {
    let rows = Setting::find().all(db).await?;
    Ok(rows.into_iter().map(|s| (s.key, s.value)).collect())
}

/// Upserts the given key/value pairs.
///
/// # Errors
/// [`Error::Validation`] when `transferSplitRatio` is not a number in
/// `0.0..=1.0`.
pub async fn update_settings(
    db: &DatabaseConnection,
    values: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    for (key, value) in &values {
        if key == SPLIT_RATIO_KEY {
            let parsed: f64 = value.parse().map_err(|_| Error::Validation {
                message: format!("{SPLIT_RATIO_KEY} must be a number between 0 and 1"),
            })?;
            if !(0.0..=1.0).contains(&parsed) {
                return Err(Error::Validation {
                    message: format!("{SPLIT_RATIO_KEY} must be a number between 0 and 1"),
                });
            }
        }
    }

    for (key, value) in values {
        let existing = Setting::find_by_id(key.as_str()).one(db).await?;
        match existing {
            Some(model) => {
                let mut active: setting::ActiveModel = model.into();
                active.value = Set(value);
                active.update(db).await?;
            }
            None => {
                setting::ActiveModel {
                    key: Set(key),
                    value: Set(value),
                }
                .insert(db)
                .await?;
            }
        }
    }

    get_settings(db).await
}

/// Inserts the default person names unless already configured.
pub async fn seed_default_settings(db: &DatabaseConnection) -> Result<()> {
    for (key, value) in [(PERSON1_NAME_KEY, "Jag"), (PERSON2_NAME_KEY, "Fruga")] {
        if Setting::find_by_id(key).one(db).await?.is_none() {
            setting::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

/// Reads the configured split ratio, falling back to
/// [`DEFAULT_SPLIT_RATIO`] when unset or unparsable.
pub async fn get_transfer_split_ratio(db: &DatabaseConnection) -> Result<f64> {
    let ratio = Setting::find_by_id(SPLIT_RATIO_KEY)
        .one(db)
        .await?
        .and_then(|s| s.value.parse::<f64>().ok())
        .unwrap_or(DEFAULT_SPLIT_RATIO);
    Ok(ratio)
}
