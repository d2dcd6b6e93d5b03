//! Normalized readings handed to downstream consumers.

use serde::{Deserialize, Serialize};

use crate::RoundId;

/// A sanitized reading: value in reporting units, plus the round and
/// timestamp reported by the primary feed.
///
/// Never persisted; every read computes a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedReading {
    /// Capped and truncated value, always positive.
    pub value: u32,
    /// Round id exactly as reported by the primary feed.
    pub round: RoundId,
    /// Timestamp exactly as reported by the primary feed.
    pub timestamp: u64,
}
