//! Value normalization: ceiling cap and fixed-point truncation.
//!
//! Raw feed values carry 18 implied decimals; published values carry 2.
//! The cap is applied before truncation so the ceiling itself is always
//! reachable exactly, however large the raw value grows:
//!
//! ```text
//! normalized = min(raw, ceiling) / TRUNCATION_UNIT
//! ```

use cvi_types::TRUNCATION_UNIT;

use crate::{OracleError, Result};

/// Cap `raw` at `ceiling` and truncate it to reporting units.
///
/// Total and side-effect free. A zero result is not rejected here; the
/// caller decides what a zero reading means.
///
/// # Examples
///
/// ```
/// use cvi_oracle::normalize::normalize;
/// use cvi_types::{to_raw, CVI_MAX_VALUE};
///
/// assert_eq!(normalize(to_raw(6000), CVI_MAX_VALUE), 6000);
/// assert_eq!(normalize(CVI_MAX_VALUE * 2, CVI_MAX_VALUE), 20000);
/// assert_eq!(normalize(to_raw(1) - 1, CVI_MAX_VALUE), 0);
/// ```
pub fn normalize(raw: u128, ceiling: u128) -> u128 {
    raw.min(ceiling) / TRUNCATION_UNIT
}

/// The largest value a reading can publish under `ceiling`.
///
/// # Errors
///
/// - [`OracleError::CeilingTooLarge`] if the value does not fit in `u32`
pub fn max_truncated_value(ceiling: u128) -> Result<u32> {
    u32::try_from(ceiling / TRUNCATION_UNIT).map_err(|_| OracleError::CeilingTooLarge { ceiling })
}

/// Normalize `raw` and reject readings that truncate to zero.
///
/// # Errors
///
/// - [`OracleError::NonPositiveValue`] if the normalized value is zero
/// - [`OracleError::CeilingTooLarge`] if the value does not fit in `u32`
pub fn positive_value(raw: u128, ceiling: u128) -> Result<u32> {
    let truncated = normalize(raw, ceiling);
    if truncated == 0 {
        return Err(OracleError::NonPositiveValue { raw, ceiling });
    }
    u32::try_from(truncated).map_err(|_| OracleError::CeilingTooLarge { ceiling })
}

#[cfg(test)]
mod tests {
    use cvi_types::{to_raw, CVI_MAX_VALUE, ETH_VOL_MAX_VALUE};

    use super::*;

    #[test]
    fn test_exact_units() {
        assert_eq!(normalize(to_raw(6000), CVI_MAX_VALUE), 6000);
        assert_eq!(normalize(to_raw(19999), CVI_MAX_VALUE), 19999);
    }

    #[test]
    fn test_truncates_fractional_part() {
        assert_eq!(normalize(to_raw(6000) + TRUNCATION_UNIT - 1, CVI_MAX_VALUE), 6000);
    }

    #[test]
    fn test_ceiling_clamp() {
        for raw in [
            CVI_MAX_VALUE,
            CVI_MAX_VALUE + 1,
            CVI_MAX_VALUE * 2,
            u128::MAX,
        ] {
            assert_eq!(normalize(raw, CVI_MAX_VALUE), 20_000);
        }
        assert_eq!(normalize(CVI_MAX_VALUE - 1, CVI_MAX_VALUE), 19_999);
        assert_eq!(normalize(ETH_VOL_MAX_VALUE + 1, ETH_VOL_MAX_VALUE), 22_000);
    }

    #[test]
    fn test_below_one_unit_is_zero() {
        assert_eq!(normalize(0, CVI_MAX_VALUE), 0);
        assert_eq!(normalize(TRUNCATION_UNIT - 1, CVI_MAX_VALUE), 0);
        assert_eq!(normalize(TRUNCATION_UNIT, CVI_MAX_VALUE), 1);
    }

    #[test]
    fn test_zero_ceiling_always_zero() {
        assert_eq!(normalize(to_raw(5000), 0), 0);
    }

    #[test]
    fn test_monotonic_up_to_ceiling() {
        // Strided walk across the whole range, including the ceiling itself
        let step = TRUNCATION_UNIT / 3 + 7;
        let mut previous = 0;
        let mut raw = 0;
        while raw <= CVI_MAX_VALUE {
            let current = normalize(raw, CVI_MAX_VALUE);
            assert!(current >= previous, "normalize({raw}) decreased");
            previous = current;
            raw += step;
        }
        assert!(normalize(CVI_MAX_VALUE, CVI_MAX_VALUE) >= previous);
    }

    #[test]
    fn test_max_truncated_value() {
        assert_eq!(max_truncated_value(CVI_MAX_VALUE).expect("fits"), 20_000);
        assert_eq!(max_truncated_value(0).expect("fits"), 0);
        let too_large = (u32::MAX as u128 + 1) * TRUNCATION_UNIT;
        assert!(matches!(
            max_truncated_value(too_large),
            Err(OracleError::CeilingTooLarge { .. })
        ));
    }

    #[test]
    fn test_positive_value_rejects_zero() {
        let err = positive_value(TRUNCATION_UNIT - 1, CVI_MAX_VALUE).unwrap_err();
        assert_eq!(
            err,
            OracleError::NonPositiveValue {
                raw: TRUNCATION_UNIT - 1,
                ceiling: CVI_MAX_VALUE,
            }
        );
        assert_eq!(positive_value(to_raw(1), CVI_MAX_VALUE).expect("positive"), 1);
    }
}
