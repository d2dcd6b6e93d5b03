//! Deviation guard configuration.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_DEVIATION_BPS;

/// Administrator-controlled settings of the cross-feed deviation guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationConfig {
    /// Whether reads are checked against the sanity feed. Off by default.
    #[serde(default)]
    pub enabled: bool,
    /// Largest accepted divergence, in basis points of the sanity value.
    #[serde(default = "default_max_deviation_bps")]
    pub max_deviation_bps: u16,
}

fn default_max_deviation_bps() -> u16 {
    DEFAULT_MAX_DEVIATION_BPS
}

impl Default for DeviationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_deviation_bps: DEFAULT_MAX_DEVIATION_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled_at_ten_percent() {
        let config = DeviationConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.max_deviation_bps, 1000);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: DeviationConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, DeviationConfig::default());

        let config: DeviationConfig =
            serde_json::from_str(r#"{"enabled":true}"#).expect("parse");
        assert!(config.enabled);
        assert_eq!(config.max_deviation_bps, DEFAULT_MAX_DEVIATION_BPS);
    }
}
