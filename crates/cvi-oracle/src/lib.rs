//! # cvi-oracle
//!
//! Price sanitization and deviation guard for the CVI volatility index.
//!
//! The oracle reads raw values from a primary feed, caps them at a fixed
//! ceiling, truncates them to reporting units and, when enabled, rejects
//! reads that diverge too far from an independent sanity feed. It owns no
//! round history: round ids and timestamps come straight from the feed.
//!
//! ## Modules
//!
//! - [`normalize`]: ceiling cap and fixed-point truncation
//! - [`history`]: the [`PriceFeed`](history::PriceFeed) seam and round lookups
//! - [`deviation`]: cross-feed deviation guard and its configuration cell
//! - [`access`]: authorization of administrative calls
//! - [`oracle`]: the public read and admin surface
//! - [`feed`]: in-memory append-only feed

pub mod access;
pub mod deviation;
pub mod feed;
pub mod history;
pub mod normalize;
pub mod oracle;

pub use access::{Authorizer, OwnerAuthority};
pub use feed::InMemoryFeed;
pub use history::PriceFeed;
pub use oracle::CviOracle;

/// Error types for oracle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The normalized value truncated to zero.
    #[error("value must be positive: raw {raw} capped at {ceiling} truncates to zero")]
    NonPositiveValue {
        /// Raw value reported by the primary feed.
        raw: u128,
        /// Configured ceiling.
        ceiling: u128,
    },

    /// The primary feed diverges from the sanity feed beyond the threshold.
    #[error("deviation too large: {deviation_bps} bps exceeds {max_deviation_bps} bps")]
    DeviationExceeded {
        /// Measured divergence in basis points of the sanity value.
        deviation_bps: u128,
        /// Configured threshold.
        max_deviation_bps: u16,
    },

    /// The sanity feed reported zero, so no ratio can be formed.
    #[error("sanity feed reported a zero value")]
    SanityFeedInvalid,

    /// The feed could not serve the request (unknown round, feed offline).
    #[error("upstream feed unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The caller may not perform administrative operations.
    #[error("caller is not authorized")]
    Unauthorized,

    /// The ceiling in reporting units does not fit the published value type.
    #[error("ceiling {ceiling} exceeds the reporting range")]
    CeilingTooLarge {
        /// The rejected ceiling.
        ceiling: u128,
    },
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
