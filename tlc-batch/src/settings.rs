//! Batch settings: which protocols, which scales, and how to launch TLC.
//!
//! Settings come from serde defaults, then an optional TOML file, then
//! `TLC_BATCH_*` environment variables (`__` separates nested keys, e.g.
//! `TLC_BATCH_TLC__PROGRAM=tlc`).

use crate::protocol::{default_protocols, ProtocolDescriptor};
use crate::scale::{default_scales, Alphabet, ScalePoint};
use crate::{BatchError, BatchResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Abort bound for the generated state constraint
pub const DEFAULT_DISTINCT_STATE_LIMIT: u64 = 100_000_000;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "TLC_BATCH";

/// How the TLC process is launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlcSettings {
    /// Executable; a `tlc` wrapper script by default
    pub program: String,

    /// Arguments placed before the ones the runner adds
    pub args: Vec<String>,
}

impl Default for TlcSettings {
    fn default() -> Self {
        Self {
            program: "tlc".to_string(),
            args: Vec::new(),
        }
    }
}

/// Everything a batch run needs besides the output directory and worker count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Stop exploring once this many distinct states have been found
    pub distinct_state_limit: u64,

    /// Scale points, in run order
    pub scales: Vec<ScalePoint>,

    pub alphabet: Alphabet,

    pub tlc: TlcSettings,

    /// Protocols, in run order
    pub protocols: Vec<ProtocolDescriptor>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            distinct_state_limit: DEFAULT_DISTINCT_STATE_LIMIT,
            scales: default_scales(),
            alphabet: Alphabet::default(),
            tlc: TlcSettings::default(),
            protocols: default_protocols(),
        }
    }
}

impl BatchSettings {
    /// Load settings from an optional TOML file plus the environment, then validate.
    pub fn load(path: Option<&Path>) -> BatchResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let settings: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, ignoring the environment.
    pub fn from_toml(text: &str) -> BatchResult<Self> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> BatchResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the settings
    pub fn validate(&self) -> BatchResult<()> {
        if self.protocols.is_empty() {
            return Err(BatchError::InvalidSettings("no protocols configured".to_string()));
        }
        let mut names = HashSet::new();
        for protocol in &self.protocols {
            if !names.insert(protocol.name.as_str()) {
                return Err(BatchError::InvalidSettings(format!(
                    "duplicate protocol name `{}`",
                    protocol.name
                )));
            }
        }

        if self.scales.is_empty() {
            return Err(BatchError::InvalidSettings("no scale points configured".to_string()));
        }
        let mut seen = HashSet::new();
        for point in &self.scales {
            if !seen.insert(*point) {
                return Err(BatchError::InvalidSettings(format!(
                    "duplicate scale point {}",
                    point
                )));
            }
            self.alphabet.slice(*point)?;
        }

        if self.tlc.program.trim().is_empty() {
            return Err(BatchError::InvalidSettings("tlc.program is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = BatchSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.protocols.len(), 2);
        assert_eq!(settings.scales.len(), 10);
        assert_eq!(settings.distinct_state_limit, 100_000_000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = BatchSettings::from_toml(
            r#"
            scales = [[1, 1], [2, 3]]

            [tlc]
            program = "java"
            args = ["-cp", "tla2tools.jar", "tlc2.TLC"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.scales, vec![ScalePoint::new(1, 1), ScalePoint::new(2, 3)]);
        assert_eq!(settings.tlc.program, "java");
        assert_eq!(settings.tlc.args.len(), 3);
        assert_eq!(settings.protocols, default_protocols());
    }

    #[test]
    fn test_rejects_out_of_range_scale() {
        let err = BatchSettings::from_toml("scales = [[6, 2]]").unwrap_err();
        assert!(matches!(err, BatchError::InvalidSettings(_)));
    }

    #[test]
    fn test_rejects_duplicates() {
        assert!(BatchSettings::from_toml("scales = [[2, 2], [2, 2]]").is_err());

        let mut settings = BatchSettings::default();
        settings.protocols.push(settings.protocols[0].clone());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_toml_dump_round_trips() {
        let settings = BatchSettings::default();
        let text = settings.to_toml().unwrap();
        assert!(text.contains("distinct_state_limit = 100000000"));
        assert_eq!(BatchSettings::from_toml(&text).unwrap(), settings);
    }
}
