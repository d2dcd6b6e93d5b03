//! Cross-feed deviation guard.
//!
//! When enabled, a primary reading is accepted only if it stays within a
//! relative distance of the sanity feed's latest reading:
//!
//! ```text
//! deviation_bps = |primary - sanity| * 10000 / sanity
//! accept iff deviation_bps <= max_deviation_bps
//! ```
//!
//! The sanity value is the denominator, not the primary value. Both inputs
//! are raw feed values; capping and truncation play no part here.
//!
//! The sanity feed is always read at its latest round, also when the primary
//! reading comes from a historical round.

use cvi_types::{DeviationConfig, BPS_PRECISION};

use crate::history::PriceFeed;
use crate::{OracleError, Result};

/// Relative divergence of `primary` from `sanity`, in basis points of
/// `sanity`, rounded down.
///
/// Saturates at `u128::MAX` when the intermediate product overflows.
///
/// # Errors
///
/// - [`OracleError::SanityFeedInvalid`] if `sanity` is zero
///
/// # Examples
///
/// ```
/// use cvi_oracle::deviation::deviation_bps;
///
/// assert_eq!(deviation_bps(5501, 5000).unwrap(), 1002);
/// assert_eq!(deviation_bps(5501, 5002).unwrap(), 997);
/// ```
pub fn deviation_bps(primary: u128, sanity: u128) -> Result<u128> {
    if sanity == 0 {
        return Err(OracleError::SanityFeedInvalid);
    }
    let delta = primary.abs_diff(sanity);
    Ok(delta
        .checked_mul(BPS_PRECISION)
        .map_or(u128::MAX, |scaled| scaled / sanity))
}

/// Holds the deviation configuration together with a version that is bumped
/// on every write.
///
/// Reads take a [`snapshot`](ConfigCell::snapshot) once per operation.
#[derive(Debug, Clone, Default)]
pub struct ConfigCell {
    config: DeviationConfig,
    version: u64,
}

impl ConfigCell {
    /// Create a cell at version 0.
    pub fn new(config: DeviationConfig) -> Self {
        Self { config, version: 0 }
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> DeviationConfig {
        self.config
    }

    /// Number of writes applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply `update` and bump the version.
    pub fn update(&mut self, update: impl FnOnce(&mut DeviationConfig)) -> u64 {
        update(&mut self.config);
        self.version = self.version.wrapping_add(1);
        self.version
    }
}

/// Checks primary readings against a sanity feed.
#[derive(Debug, Clone)]
pub struct DeviationGuard<S> {
    sanity: S,
}

impl<S: PriceFeed> DeviationGuard<S> {
    /// Create a guard consulting `sanity`.
    pub fn new(sanity: S) -> Self {
        Self { sanity }
    }

    /// Check `primary_raw` against the sanity feed's latest reading.
    ///
    /// Passes without touching the sanity feed when the guard is disabled.
    ///
    /// # Errors
    ///
    /// - [`OracleError::DeviationExceeded`] if the divergence is above the threshold
    /// - [`OracleError::SanityFeedInvalid`] if the sanity feed reports zero
    /// - any error of the sanity feed itself
    pub fn check(&self, primary_raw: u128, config: &DeviationConfig) -> Result<()> {
        if !config.enabled {
            return Ok(());
        }

        let sanity = self.sanity.latest_round_data()?;
        let deviation = deviation_bps(primary_raw, sanity.value).inspect_err(|_| {
            tracing::warn!(sanity_round = %sanity.round, "deviation guard: sanity feed reported zero");
        })?;

        if deviation > u128::from(config.max_deviation_bps) {
            tracing::warn!(
                primary = primary_raw,
                sanity = sanity.value,
                deviation_bps = deviation,
                max_deviation_bps = config.max_deviation_bps,
                "deviation guard: read rejected"
            );
            return Err(OracleError::DeviationExceeded {
                deviation_bps: deviation,
                max_deviation_bps: config.max_deviation_bps,
            });
        }
        Ok(())
    }

    /// The sanity feed.
    pub fn sanity_feed(&self) -> &S {
        &self.sanity
    }
}
