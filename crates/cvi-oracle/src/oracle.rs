//! The oracle's public surface.
//!
//! Both read paths run the same pipeline:
//!
//! 1. fetch the raw primary reading (latest or by round)
//! 2. cap at the ceiling and truncate to reporting units
//! 3. reject a zero result
//! 4. if enabled, check the raw primary value against the sanity feed
//! 5. return value, round and timestamp
//!
//! Reads take one snapshot of the deviation configuration and change no
//! state. The two admin operations are gated by the [`Authorizer`].

use cvi_types::{AccountId, DeviationConfig, NormalizedReading, RoundData, RoundId};

use crate::access::{require_authorized, Authorizer, OwnerAuthority};
use crate::deviation::{ConfigCell, DeviationGuard};
use crate::history::{PriceFeed, RoundHistory};
use crate::normalize::{max_truncated_value, positive_value};
use crate::Result;

/// Sanitizing oracle over a primary feed and a sanity feed.
#[derive(Debug, Clone)]
pub struct CviOracle<P, S, A = OwnerAuthority> {
    history: RoundHistory<P>,
    guard: DeviationGuard<S>,
    authority: A,
    ceiling: u128,
    config: ConfigCell,
}

impl<P: PriceFeed, S: PriceFeed, A: Authorizer> CviOracle<P, S, A> {
    /// Create an oracle with the guard disabled at the default threshold.
    ///
    /// # Errors
    ///
    /// - [`OracleError::CeilingTooLarge`](crate::OracleError::CeilingTooLarge)
    ///   if `ceiling` in reporting units does not fit in `u32`
    pub fn new(primary: P, sanity: S, ceiling: u128, authority: A) -> Result<Self> {
        Self::with_config(primary, sanity, ceiling, authority, DeviationConfig::default())
    }

    /// Create an oracle with an initial deviation configuration.
    ///
    /// A zero ceiling is accepted; every read then fails with
    /// [`OracleError::NonPositiveValue`](crate::OracleError::NonPositiveValue).
    ///
    /// # Errors
    ///
    /// - [`OracleError::CeilingTooLarge`](crate::OracleError::CeilingTooLarge)
    ///   if `ceiling` in reporting units does not fit in `u32`
    pub fn with_config(
        primary: P,
        sanity: S,
        ceiling: u128,
        authority: A,
        config: DeviationConfig,
    ) -> Result<Self> {
        max_truncated_value(ceiling)?;
        Ok(Self {
            history: RoundHistory::new(primary),
            guard: DeviationGuard::new(sanity),
            authority,
            ceiling,
            config: ConfigCell::new(config),
        })
    }

    /// The latest sanitized reading.
    ///
    /// # Errors
    ///
    /// - [`OracleError::NonPositiveValue`](crate::OracleError::NonPositiveValue)
    /// - [`OracleError::DeviationExceeded`](crate::OracleError::DeviationExceeded)
    /// - [`OracleError::SanityFeedInvalid`](crate::OracleError::SanityFeedInvalid)
    /// - any error of either feed
    pub fn latest(&self) -> Result<NormalizedReading> {
        let data = self.history.latest()?;
        self.sanitize(data)
    }

    /// The sanitized reading of `round`.
    ///
    /// The guard still compares against the sanity feed's latest reading,
    /// not the reading it had at `round`.
    ///
    /// # Errors
    ///
    /// As [`latest`](Self::latest), plus
    /// [`OracleError::UpstreamUnavailable`](crate::OracleError::UpstreamUnavailable)
    /// if the primary feed has no such round.
    pub fn at_round(&self, round: RoundId) -> Result<NormalizedReading> {
        let data = self.history.at_round(round)?;
        self.sanitize(data)
    }

    fn sanitize(&self, data: RoundData) -> Result<NormalizedReading> {
        let config = self.config.snapshot();

        let value = positive_value(data.value, self.ceiling).inspect_err(|_| {
            tracing::warn!(round = %data.round, raw = data.value, "oracle: non-positive value");
        })?;
        self.guard.check(data.value, &config)?;

        tracing::debug!(round = %data.round, value, timestamp = data.timestamp, "oracle: reading served");
        Ok(NormalizedReading {
            value,
            round: data.round,
            timestamp: data.timestamp,
        })
    }

    /// Turn the deviation guard on or off.
    ///
    /// The threshold is left untouched, so re-enabling restores the previous
    /// behavior exactly.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`](crate::OracleError::Unauthorized)
    pub fn set_deviation_check(&mut self, caller: &AccountId, enabled: bool) -> Result<()> {
        require_authorized(&self.authority, caller)?;
        let version = self.config.update(|config| config.enabled = enabled);
        tracing::info!(enabled, version, "oracle: deviation check updated");
        Ok(())
    }

    /// Set the largest accepted divergence in basis points.
    ///
    /// Not range checked: `0` accepts only identical readings and values
    /// above `10000` tolerate more than 100% divergence.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`](crate::OracleError::Unauthorized)
    pub fn set_max_deviation(&mut self, caller: &AccountId, max_deviation_bps: u16) -> Result<()> {
        require_authorized(&self.authority, caller)?;
        let version = self
            .config
            .update(|config| config.max_deviation_bps = max_deviation_bps);
        tracing::info!(max_deviation_bps, version, "oracle: max deviation updated");
        Ok(())
    }

    /// Whether the deviation guard is on.
    pub fn deviation_check_enabled(&self) -> bool {
        self.config.snapshot().enabled
    }

    /// The deviation threshold in basis points.
    pub fn max_deviation_bps(&self) -> u16 {
        self.config.snapshot().max_deviation_bps
    }

    /// Copy of the deviation configuration.
    pub fn deviation_config(&self) -> DeviationConfig {
        self.config.snapshot()
    }

    /// Number of configuration writes so far.
    pub fn config_version(&self) -> u64 {
        self.config.version()
    }

    /// The raw ceiling.
    pub fn ceiling(&self) -> u128 {
        self.ceiling
    }

    /// The ceiling in reporting units.
    pub fn max_truncated_value(&self) -> u32 {
        // Checked at construction.
        max_truncated_value(self.ceiling).unwrap_or(u32::MAX)
    }

    /// The primary feed.
    pub fn primary_feed(&self) -> &P {
        self.history.feed()
    }

    /// The sanity feed.
    pub fn sanity_feed(&self) -> &S {
        self.guard.sanity_feed()
    }

    /// The access-control collaborator.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Mutable access to the access-control collaborator, e.g. to transfer
    /// ownership.
    pub fn authority_mut(&mut self) -> &mut A {
        &mut self.authority
    }
}
