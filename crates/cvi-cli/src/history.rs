//! Feed history files.
//!
//! A history file lists the rounds of the primary and sanity feeds in
//! publication order. Values are raw decimal strings since they exceed the
//! TOML integer range.
//!
//! ```toml
//! primary_first_round = 1
//!
//! [[primary]]
//! value = "50000000000000000000"
//! timestamp = 1700000000
//!
//! [[sanity]]
//! value = "50000000000000000000"
//! timestamp = 1700000000
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use cvi_oracle::InMemoryFeed;
use cvi_types::RoundId;
use serde::{Deserialize, Serialize};

/// One published round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Raw value as a decimal string.
    pub value: String,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Round logs of both feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedHistory {
    /// Id of the first primary round.
    #[serde(default = "default_first_round")]
    pub primary_first_round: u64,
    /// Id of the first sanity round.
    #[serde(default = "default_first_round")]
    pub sanity_first_round: u64,
    /// Primary feed rounds, oldest first.
    #[serde(default)]
    pub primary: Vec<RoundEntry>,
    /// Sanity feed rounds, oldest first.
    #[serde(default)]
    pub sanity: Vec<RoundEntry>,
}

fn default_first_round() -> u64 {
    1
}

impl FeedHistory {
    /// Read a history file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading feed history {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse history from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("parsing feed history")
    }

    /// Replay both logs into in-memory feeds: `(primary, sanity)`.
    pub fn into_feeds(self) -> anyhow::Result<(InMemoryFeed, InMemoryFeed)> {
        let primary = replay("primary", RoundId(self.primary_first_round), &self.primary)?;
        let sanity = replay("sanity", RoundId(self.sanity_first_round), &self.sanity)?;
        Ok((primary, sanity))
    }
}

fn replay(name: &str, first_round: RoundId, entries: &[RoundEntry]) -> anyhow::Result<InMemoryFeed> {
    let Some((first, rest)) = entries.split_first() else {
        bail!("{name} feed has no rounds");
    };
    let feed = InMemoryFeed::starting_at(first_round, parse_value(name, first)?, first.timestamp);
    for entry in rest {
        feed.set_price(parse_value(name, entry)?, entry.timestamp)?;
    }
    tracing::debug!(feed = name, rounds = entries.len(), "history: feed replayed");
    Ok(feed)
}

fn parse_value(name: &str, entry: &RoundEntry) -> anyhow::Result<u128> {
    entry
        .value
        .trim()
        .parse()
        .with_context(|| format!("{name} feed: invalid value {:?}", entry.value))
}

#[cfg(test)]
mod tests {
    use cvi_oracle::PriceFeed;

    use super::*;

    const HISTORY: &str = r#"
        primary_first_round = 2

        [[primary]]
        value = "60000000000000000000"
        timestamp = 100

        [[primary]]
        value = "70000000000000000000"
        timestamp = 200

        [[sanity]]
        value = "50000000000000000000"
        timestamp = 150
    "#;

    #[test]
    fn test_replay_history() {
        let (primary, sanity) = FeedHistory::parse(HISTORY)
            .expect("parse")
            .into_feeds()
            .expect("replay");

        let latest = primary.latest_round_data().expect("latest");
        assert_eq!(latest.round, RoundId(3));
        assert_eq!(latest.value, 70 * cvi_types::RAW_ONE);
        assert_eq!(primary.round_data(RoundId(2)).expect("first").timestamp, 100);

        let sanity = sanity.latest_round_data().expect("latest");
        assert_eq!(sanity.round, RoundId(1));
    }

    #[test]
    fn test_empty_feed_rejected() {
        let history = FeedHistory::parse("[[primary]]\nvalue = \"1\"\ntimestamp = 1\n").expect("parse");
        assert!(history.into_feeds().is_err());
    }

    #[test]
    fn test_bad_value_rejected() {
        let history = FeedHistory::parse(
            "[[primary]]\nvalue = \"-5\"\ntimestamp = 1\n[[sanity]]\nvalue = \"1\"\ntimestamp = 1\n",
        )
        .expect("parse");
        assert!(history.into_feeds().is_err());
    }
}
