//! Configuration file management.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use cvi_types::{AccountId, DeviationConfig, CVI_MAX_VALUE, ETH_VOL_MAX_VALUE};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "CVI_ORACLE_CONFIG";

/// Complete oracle configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleFileConfig {
    /// Ceiling settings.
    #[serde(default)]
    pub oracle: CeilingConfig,
    /// Initial deviation guard settings.
    #[serde(default)]
    pub deviation: DeviationConfig,
    /// Access control.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ceiling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeilingConfig {
    /// Preset: "cvi" | "eth-vol".
    #[serde(default = "default_ceiling")]
    pub ceiling: String,
    /// Explicit raw ceiling as a decimal string. Overrides the preset.
    #[serde(default)]
    pub ceiling_raw: Option<String>,
}

/// Access control configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Hex-encoded 32-byte owner id. Empty = all zeroes.
    #[serde(default)]
    pub owner: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_ceiling() -> String {
    "cvi".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CeilingConfig {
    fn default() -> Self {
        Self {
            ceiling: default_ceiling(),
            ceiling_raw: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl OracleFileConfig {
    /// Load configuration from `path`, else from [`CONFIG_ENV`].
    ///
    /// Falls back to defaults if neither names a file.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::parse(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("parsing config")
    }

    /// The raw ceiling.
    pub fn ceiling(&self) -> anyhow::Result<u128> {
        if let Some(raw) = &self.oracle.ceiling_raw {
            return raw
                .trim()
                .parse()
                .with_context(|| format!("invalid ceiling_raw {raw:?}"));
        }
        match self.oracle.ceiling.as_str() {
            "cvi" => Ok(CVI_MAX_VALUE),
            "eth-vol" => Ok(ETH_VOL_MAX_VALUE),
            other => bail!("unknown ceiling preset {other:?}"),
        }
    }

    /// The owner account id.
    pub fn owner(&self) -> anyhow::Result<AccountId> {
        if self.admin.owner.is_empty() {
            return Ok([0u8; 32]);
        }
        let bytes = hex::decode(self.admin.owner.trim_start_matches("0x"))
            .context("owner is not valid hex")?;
        AccountId::try_from(bytes.as_slice())
            .map_err(|_| anyhow::anyhow!("owner must be 32 bytes, got {}", bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OracleFileConfig::default();
        assert_eq!(config.ceiling().expect("preset"), CVI_MAX_VALUE);
        assert!(!config.deviation.enabled);
        assert_eq!(config.deviation.max_deviation_bps, 1000);
        assert_eq!(config.owner().expect("owner"), [0u8; 32]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let config = OracleFileConfig::parse(
            r#"
            [oracle]
            ceiling = "eth-vol"

            [deviation]
            enabled = true
            max_deviation_bps = 1002

            [admin]
            owner = "0x0101010101010101010101010101010101010101010101010101010101010101"

            [logging]
            level = "debug"
            "#,
        )
        .expect("parse");
        assert_eq!(config.ceiling().expect("preset"), ETH_VOL_MAX_VALUE);
        assert!(config.deviation.enabled);
        assert_eq!(config.deviation.max_deviation_bps, 1002);
        assert_eq!(config.owner().expect("owner"), [1u8; 32]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_raw_ceiling_overrides_preset() {
        let config = OracleFileConfig::parse(
            r#"
            [oracle]
            ceiling = "eth-vol"
            ceiling_raw = "150000000000000000000"
            "#,
        )
        .expect("parse");
        assert_eq!(config.ceiling().expect("raw"), 150 * cvi_types::RAW_ONE);
    }

    #[test]
    fn test_bad_values_rejected() {
        let config = OracleFileConfig::parse("[oracle]\nceiling = \"vix\"\n").expect("parse");
        assert!(config.ceiling().is_err());

        let config = OracleFileConfig::parse("[admin]\nowner = \"abcd\"\n").expect("parse");
        assert!(config.owner().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = OracleFileConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize");
        let _parsed: OracleFileConfig = toml::from_str(&toml_str).expect("parse");
    }
}
