//! Month arithmetic over the `YYYYMM` integer encoding.
//!
//! Calendar months are represented as integers like 202412 (December
//! 2024). Everything else in the core builds on these functions, so they
//! are pure and total over valid inputs. Validation failures are surfaced
//! as [`Error::InvalidMonth`], never clamped.

use crate::errors::{Error, Result};

/// Lowest accepted `YYYYMM` value.
pub const MIN_YEAR_MONTH: i32 = 190001;
/// Highest accepted `YYYYMM` value.
pub const MAX_YEAR_MONTH: i32 = 209912;

/// Returns the `YYYYMM` value `delta` months away from `year_month`,
/// rolling over year boundaries in both directions.
///
/// Symmetric: `add_months(add_months(m, n), -n) == m` for all valid `m`.
#[must_use]
pub fn add_months(year_month: i32, delta: i32) -> i32 {
    let year = year_month / 100;
    let month = year_month % 100;
    // Work in zero-based absolute months so div_euclid/rem_euclid handle
    // negative deltas without special-casing the year boundary.
    let total = year * 12 + (month - 1) + delta;
    total.div_euclid(12) * 100 + total.rem_euclid(12) + 1
}

/// True iff `value` is a well-formed `YYYYMM` between 190001 and 209912
/// with a month part in 1..=12.
#[must_use]
pub fn is_valid_year_month(value: i32) -> bool {
    (MIN_YEAR_MONTH..=MAX_YEAR_MONTH).contains(&value) && (1..=12).contains(&(value % 100))
}

/// Validates a `YYYYMM` value, passing it through unchanged on success.
///
/// # Errors
/// Returns [`Error::InvalidMonth`] when the value fails
/// [`is_valid_year_month`].
pub fn ensure_valid(value: i32) -> Result<i32> {
    if is_valid_year_month(value) {
        Ok(value)
    } else {
        Err(Error::InvalidMonth { value })
    }
}

/// All months from `start` to `end`, inclusive, in ascending order.
///
/// # Errors
/// Returns [`Error::InvalidMonth`] for malformed endpoints and
/// [`Error::InvalidRange`] when `start > end`.
pub fn months_in_range(start: i32, end: i32) -> Result<Vec<i32>> {
    ensure_valid(start)?;
    ensure_valid(end)?;
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = add_months(current, 1);
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_rolls_over_year_end() {
        assert_eq!(add_months(202412, 1), 202501);
        assert_eq!(add_months(202501, -1), 202412);
    }

    #[test]
    fn test_add_months_within_year() {
        assert_eq!(add_months(202403, 2), 202405);
        assert_eq!(add_months(202403, -2), 202401);
    }

    #[test]
    fn test_add_months_large_deltas() {
        assert_eq!(add_months(202406, 12), 202506);
        assert_eq!(add_months(202406, -18), 202212);
        assert_eq!(add_months(202401, 25), 202602);
    }

    #[test]
    fn test_add_months_round_trip() {
        for m in [190001, 199912, 202406, 202412, 209912] {
            for n in -120..=120 {
                assert_eq!(add_months(add_months(m, n), -n), m, "m={m} n={n}");
            }
        }
    }

    #[test]
    fn test_is_valid_year_month_accepts_bounds() {
        assert!(is_valid_year_month(MIN_YEAR_MONTH));
        assert!(is_valid_year_month(MAX_YEAR_MONTH));
        assert!(is_valid_year_month(202412));
    }

    #[test]
    fn test_is_valid_year_month_rejects_bad_values() {
        assert!(!is_valid_year_month(189912));
        assert!(!is_valid_year_month(210001));
        assert!(!is_valid_year_month(202400)); // month 0
        assert!(!is_valid_year_month(202413)); // month 13
        assert!(!is_valid_year_month(0));
        assert!(!is_valid_year_month(-202412));
    }

    #[test]
    fn test_ensure_valid_surfaces_error() {
        assert!(matches!(
            ensure_valid(202413),
            Err(crate::errors::Error::InvalidMonth { value: 202413 })
        ));
        assert_eq!(ensure_valid(202412).unwrap(), 202412);
    }

    #[test]
    fn test_months_in_range_crosses_year_boundary() {
        let months = months_in_range(202411, 202502).unwrap();
        assert_eq!(months, vec![202411, 202412, 202501, 202502]);
    }

    #[test]
    fn test_months_in_range_single_month() {
        assert_eq!(months_in_range(202406, 202406).unwrap(), vec![202406]);
    }

    #[test]
    fn test_months_in_range_rejects_reversed_range() {
        assert!(matches!(
            months_in_range(202502, 202411),
            Err(crate::errors::Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_months_in_range_rejects_invalid_endpoints() {
        assert!(months_in_range(202413, 202501).is_err());
        assert!(months_in_range(202401, 210001).is_err());
    }
}
