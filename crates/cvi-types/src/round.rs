//! Round identifiers and raw feed readings.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Identifier of one published reading of a feed.
///
/// Allocated by the feed, never by the oracle. Ids are strictly increasing
/// within a feed but need not start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

impl RoundId {
    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoundId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A raw reading as reported by a feed.
///
/// `value` keeps the feed's full fixed-point precision. It is serialized as
/// a decimal string since it does not fit every format's integer range.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    /// Round the reading was published in.
    pub round: RoundId,
    /// Raw fixed-point value.
    #[serde_as(as = "DisplayFromStr")]
    pub value: u128,
    /// Publication time, Unix seconds.
    pub timestamp: u64,
}
