//! Round-indexed access to an upstream feed.
//!
//! A feed is an append-only sequence of `(value, timestamp)` pairs indexed by
//! round ids the feed allocates itself. [`RoundHistory`] is a read-only view
//! over that sequence with two query shapes, latest and by id. It caches
//! nothing and never renumbers, so the first accessible round is whatever
//! the feed says it is.

use std::sync::Arc;

use cvi_types::{RoundData, RoundId};

use crate::Result;

/// An upstream feed publishing round-indexed raw readings.
///
/// Implementors must return the same value and timestamp for a given round
/// id every time it is queried.
pub trait PriceFeed {
    /// The most recently published reading.
    fn latest_round_data(&self) -> Result<RoundData>;

    /// The reading published in `round`.
    ///
    /// Fails with [`OracleError::UpstreamUnavailable`](crate::OracleError::UpstreamUnavailable)
    /// if the feed has no such round.
    fn round_data(&self, round: RoundId) -> Result<RoundData>;
}

impl<F: PriceFeed + ?Sized> PriceFeed for &F {
    fn latest_round_data(&self) -> Result<RoundData> {
        (**self).latest_round_data()
    }

    fn round_data(&self, round: RoundId) -> Result<RoundData> {
        (**self).round_data(round)
    }
}

impl<F: PriceFeed + ?Sized> PriceFeed for Box<F> {
    fn latest_round_data(&self) -> Result<RoundData> {
        (**self).latest_round_data()
    }

    fn round_data(&self, round: RoundId) -> Result<RoundData> {
        (**self).round_data(round)
    }
}

impl<F: PriceFeed + ?Sized> PriceFeed for Arc<F> {
    fn latest_round_data(&self) -> Result<RoundData> {
        (**self).latest_round_data()
    }

    fn round_data(&self, round: RoundId) -> Result<RoundData> {
        (**self).round_data(round)
    }
}

/// Read-only view of a feed's round history.
#[derive(Debug, Clone)]
pub struct RoundHistory<F> {
    feed: F,
}

impl<F: PriceFeed> RoundHistory<F> {
    /// Wrap `feed`.
    pub fn new(feed: F) -> Self {
        Self { feed }
    }

    /// The latest raw reading, with its round id and timestamp.
    pub fn latest(&self) -> Result<RoundData> {
        self.feed.latest_round_data()
    }

    /// The raw reading for `round`.
    ///
    /// Feed errors are propagated untouched.
    pub fn at_round(&self, round: RoundId) -> Result<RoundData> {
        self.feed.round_data(round)
    }

    /// The wrapped feed.
    pub fn feed(&self) -> &F {
        &self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryFeed, OracleError};

    #[test]
    fn test_latest_delegates_to_feed() {
        let feed = InMemoryFeed::new(100, 1_000);
        feed.set_price(200, 2_000).expect("append");
        let history = RoundHistory::new(feed);

        let latest = history.latest().expect("latest");
        assert_eq!(latest.round, RoundId(2));
        assert_eq!(latest.value, 200);
        assert_eq!(latest.timestamp, 2_000);
    }

    #[test]
    fn test_at_round_is_stable() {
        let feed = InMemoryFeed::new(100, 1_000);
        let history = RoundHistory::new(feed.clone());
        feed.set_price(200, 2_000).expect("append");
        feed.set_price(300, 3_000).expect("append");

        let first = history.at_round(RoundId(2)).expect("round 2");
        feed.set_price(400, 4_000).expect("append");
        let again = history.at_round(RoundId(2)).expect("round 2");
        assert_eq!(first, again);
        assert_eq!(again.value, 200);
    }

    #[test]
    fn test_numbering_starts_where_feed_starts() {
        let feed = InMemoryFeed::starting_at(RoundId(40), 100, 1_000);
        let history = RoundHistory::new(&feed);

        assert_eq!(history.latest().expect("latest").round, RoundId(40));
        assert!(matches!(
            history.at_round(RoundId(1)),
            Err(OracleError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn test_unknown_round_propagates() {
        let history = RoundHistory::new(InMemoryFeed::new(100, 1_000));
        let err = history.at_round(RoundId(9)).unwrap_err();
        assert!(matches!(err, OracleError::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_boxed_feed() {
        let feed: Box<dyn PriceFeed> = Box::new(InMemoryFeed::new(100, 1_000));
        let history = RoundHistory::new(feed);
        assert_eq!(history.latest().expect("latest").value, 100);
    }
}
