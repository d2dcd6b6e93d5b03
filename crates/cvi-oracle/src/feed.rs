//! In-memory append-only feed.
//!
//! Each [`set_price`](InMemoryFeed::set_price) publishes a new round; past
//! rounds never change. Clones share the same log, so a producer can keep a
//! handle and publish while the oracle reads through another.

use std::sync::{Arc, RwLock};

use cvi_types::{RoundData, RoundId};

use crate::history::PriceFeed;
use crate::{OracleError, Result};

#[derive(Debug)]
struct RoundLog {
    first_round: RoundId,
    /// `(value, timestamp)` per round, starting at `first_round`.
    entries: Vec<(u128, u64)>,
}

/// A feed backed by an in-memory round log.
#[derive(Debug, Clone)]
pub struct InMemoryFeed {
    log: Arc<RwLock<RoundLog>>,
}

impl InMemoryFeed {
    /// Create a feed whose first round is round 1, holding `value`.
    pub fn new(value: u128, timestamp: u64) -> Self {
        Self::starting_at(RoundId(1), value, timestamp)
    }

    /// Create a feed whose first round is `first_round`.
    pub fn starting_at(first_round: RoundId, value: u128, timestamp: u64) -> Self {
        Self {
            log: Arc::new(RwLock::new(RoundLog {
                first_round,
                entries: vec![(value, timestamp)],
            })),
        }
    }

    /// Publish `value` as a new round and return its id.
    ///
    /// # Errors
    ///
    /// - [`OracleError::UpstreamUnavailable`] if the round id space is
    ///   exhausted; the log is left unchanged
    pub fn set_price(&self, value: u128, timestamp: u64) -> Result<RoundId> {
        let mut log = self.log.write().map_err(|_| poisoned())?;
        let round = round_at(log.first_round, log.entries.len()).ok_or_else(|| {
            OracleError::UpstreamUnavailable("round ids exhausted".to_string())
        })?;
        log.entries.push((value, timestamp));
        tracing::trace!(%round, value, timestamp, "feed: round published");
        Ok(round)
    }

    /// Number of published rounds.
    pub fn round_count(&self) -> Result<usize> {
        Ok(self.log.read().map_err(|_| poisoned())?.entries.len())
    }
}

impl PriceFeed for InMemoryFeed {
    fn latest_round_data(&self) -> Result<RoundData> {
        let log = self.log.read().map_err(|_| poisoned())?;
        let index = log.entries.len().checked_sub(1).ok_or_else(|| {
            OracleError::UpstreamUnavailable("feed has no rounds".to_string())
        })?;
        let (value, timestamp) = log.entries[index];
        let round = round_at(log.first_round, index).ok_or_else(|| {
            OracleError::UpstreamUnavailable("round id out of range".to_string())
        })?;
        Ok(RoundData {
            round,
            value,
            timestamp,
        })
    }

    fn round_data(&self, round: RoundId) -> Result<RoundData> {
        let log = self.log.read().map_err(|_| poisoned())?;
        let (value, timestamp) = round
            .0
            .checked_sub(log.first_round.0)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|index| log.entries.get(index).copied())
            .ok_or_else(|| OracleError::UpstreamUnavailable(format!("round {round} not found")))?;
        Ok(RoundData {
            round,
            value,
            timestamp,
        })
    }
}

fn round_at(first: RoundId, index: usize) -> Option<RoundId> {
    let offset = u64::try_from(index).ok()?;
    first.0.checked_add(offset).map(RoundId)
}

fn poisoned() -> OracleError {
    OracleError::UpstreamUnavailable("feed lock poisoned".to_string())
}
