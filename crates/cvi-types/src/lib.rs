//! # cvi-types
//!
//! Shared domain types for the CVI oracle workspace: round identifiers,
//! raw feed readings, normalized readings and the deviation guard
//! configuration.
//!
//! Raw feed values are fixed-point integers with 18 implied decimals and are
//! carried as `u128`. Published values are integers with 2 implied decimals
//! ("reporting units"), so `200.00` is published as `20000`.

pub mod config;
pub mod reading;
pub mod round;

pub use config::DeviationConfig;
pub use reading::NormalizedReading;
pub use round::{RoundData, RoundId};

/// Identity of a caller presented to the access-control collaborator.
pub type AccountId = [u8; 32];

/// Divisor converting a raw 18-decimal feed value into reporting units
/// (2 implied decimals).
pub const TRUNCATION_UNIT: u128 = 10_u128.pow(16);

/// One raw unit of an 18-decimal feed value.
pub const RAW_ONE: u128 = 10_u128.pow(18);

/// Basis points in 100%.
pub const BPS_PRECISION: u128 = 10_000;

/// Default maximum deviation between primary and sanity feed (10%).
pub const DEFAULT_MAX_DEVIATION_BPS: u16 = 1_000;

/// Ceiling for the CVI index: 200.00.
pub const CVI_MAX_VALUE: u128 = 200 * RAW_ONE;

/// Ceiling for the ETHVOL index: 220.00.
pub const ETH_VOL_MAX_VALUE: u128 = 220 * RAW_ONE;

/// Convert a value expressed in reporting units into a raw feed value.
///
/// `to_raw(5000)` is the raw encoding of `50.00`.
pub const fn to_raw(units: u128) -> u128 {
    units * TRUNCATION_UNIT
}
