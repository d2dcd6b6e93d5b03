//! Rendering sanitized readings as JSON lines.

use cvi_oracle::{Authorizer, CviOracle, InMemoryFeed, PriceFeed};
use cvi_types::{NormalizedReading, RoundId};
use serde_json::Value;

/// One output line: the reading, or the requested round and the error.
pub fn render(
    requested: Option<RoundId>,
    result: cvi_oracle::Result<NormalizedReading>,
) -> anyhow::Result<Value> {
    Ok(match result {
        Ok(reading) => serde_json::to_value(reading)?,
        Err(err) => serde_json::json!({
            "round": requested,
            "error": err.to_string(),
        }),
    })
}

/// Sanitize every round the primary feed holds, oldest first.
///
/// Rejected rounds produce an error line; replay continues with the next
/// round.
pub fn replay_rounds<A: Authorizer>(
    oracle: &CviOracle<InMemoryFeed, InMemoryFeed, A>,
) -> anyhow::Result<Vec<Value>> {
    let feed = oracle.primary_feed();
    let latest = feed.latest_round_data()?.round;
    let count = feed.round_count()? as u64;
    let first = RoundId(latest.0.saturating_sub(count.saturating_sub(1)));

    let mut lines = Vec::with_capacity(count as usize);
    let mut round = first;
    loop {
        lines.push(render(Some(round), oracle.at_round(round))?);
        if round >= latest {
            break;
        }
        round = round.next();
    }
    Ok(lines)
}
