// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Settings for the distribution report suite.

use std::path::PathBuf;

use thiserror::Error;

use crate::testdata;

pub const DEFAULT_SAMPLES_PER_BIN: usize = 1024;
pub const DEFAULT_WIDE_BINS: usize = 8;
pub const DEFAULT_TOLERANCE_SIGMAS: f64 = 4.0;
pub const DEFAULT_SPEED_SAMPLES: usize = 1 << 20;
const DEFAULT_SEED_COUNT: usize = 4;

const ENV_SAMPLES_PER_BIN: &str = "BITSHAPE_SAMPLES_PER_BIN";
const ENV_WIDE_BINS: &str = "BITSHAPE_WIDE_BINS";
const ENV_TOLERANCE_SIGMAS: &str = "BITSHAPE_TOLERANCE_SIGMAS";
const ENV_SEEDS: &str = "BITSHAPE_SEEDS";
const ENV_SPEED_SAMPLES: &str = "BITSHAPE_SPEED_SAMPLES";
const ENV_RESULT_FILE: &str = "BITSHAPE_RESULT_FILE";
const ENV_LOG: &str = "BITSHAPE_LOG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?} as {expected}")]
    Parse {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Expected count of every histogram bin.
    pub samples_per_bin: usize,
    /// Bin count used for full-width and wide ranges.
    pub wide_bins: usize,
    /// Per-bin tolerance in binomial standard deviations.
    pub tolerance_sigmas: f64,
    pub seeds: Vec<u64>,
    /// Draws timed by the throughput measurement.
    pub speed_samples: usize,
    /// Report lines are appended here as well as printed.
    pub result_file: PathBuf,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            samples_per_bin: DEFAULT_SAMPLES_PER_BIN,
            wide_bins: DEFAULT_WIDE_BINS,
            tolerance_sigmas: DEFAULT_TOLERANCE_SIGMAS,
            seeds: testdata::rng_test::STATIC_TEST_SEEDS[0..DEFAULT_SEED_COUNT].to_vec(),
            speed_samples: DEFAULT_SPEED_SAMPLES,
            result_file: PathBuf::from("rslt.txt"),
            log_level: "info".to_owned(),
        }
    }
}

impl SuiteConfig {
    /// Defaults overridden by `BITSHAPE_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = SuiteConfig::default();
        if let Some(v) = lookup(ENV_SAMPLES_PER_BIN) {
            config.samples_per_bin = parse_usize(ENV_SAMPLES_PER_BIN, &v)?;
        }
        if let Some(v) = lookup(ENV_WIDE_BINS) {
            config.wide_bins = parse_usize(ENV_WIDE_BINS, &v)?;
        }
        if let Some(v) = lookup(ENV_TOLERANCE_SIGMAS) {
            config.tolerance_sigmas = v.trim().parse().map_err(|_| ConfigError::Parse {
                var: ENV_TOLERANCE_SIGMAS,
                value: v.clone(),
                expected: "a number",
            })?;
        }
        if let Some(v) = lookup(ENV_SEEDS) {
            config.seeds = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| parse_seed(ENV_SEEDS, s))
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = lookup(ENV_SPEED_SAMPLES) {
            config.speed_samples = parse_usize(ENV_SPEED_SAMPLES, &v)?;
        }
        if let Some(v) = lookup(ENV_RESULT_FILE) {
            config.result_file = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_LOG) {
            config.log_level = v;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples_per_bin == 0 {
            return Err(ConfigError::Invalid {
                var: ENV_SAMPLES_PER_BIN,
                reason: "must be at least 1",
            });
        }
        if self.wide_bins < 2 {
            return Err(ConfigError::Invalid {
                var: ENV_WIDE_BINS,
                reason: "must be at least 2",
            });
        }
        if !(self.tolerance_sigmas > 0.0) {
            return Err(ConfigError::Invalid {
                var: ENV_TOLERANCE_SIGMAS,
                reason: "must be positive",
            });
        }
        if self.seeds.is_empty() {
            return Err(ConfigError::Invalid {
                var: ENV_SEEDS,
                reason: "needs at least one seed",
            });
        }
        Ok(())
    }
}

fn parse_usize(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Parse {
        var,
        value: value.to_owned(),
        expected: "an unsigned integer",
    })
}

/// Decimal, or hex with a `0x` prefix.
fn parse_seed(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => value.replace('_', "").parse(),
    };
    parsed.map_err(|_| ConfigError::Parse {
        var,
        value: value.to_owned(),
        expected: "a 64-bit seed",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SuiteConfig::default());
        assert_eq!(config.samples_per_bin, 1024);
        assert_eq!(config.seeds.len(), 4);
    }

    #[test]
    fn test_overrides() {
        let config = SuiteConfig::from_lookup(lookup(&[
            ("BITSHAPE_SAMPLES_PER_BIN", "64"),
            ("BITSHAPE_SEEDS", "0xc0ffee, 42,1_000"),
            ("BITSHAPE_TOLERANCE_SIGMAS", "3.5"),
            ("BITSHAPE_RESULT_FILE", "/tmp/out.txt"),
        ]))
        .unwrap();
        assert_eq!(config.samples_per_bin, 64);
        assert_eq!(config.seeds, vec![0xc0ffee, 42, 1000]);
        assert_eq!(config.tolerance_sigmas, 3.5);
        assert_eq!(config.result_file, PathBuf::from("/tmp/out.txt"));
    }

    #[test]
    fn test_bad_values() {
        assert!(matches!(
            SuiteConfig::from_lookup(lookup(&[("BITSHAPE_WIDE_BINS", "eight")])),
            Err(ConfigError::Parse { var: "BITSHAPE_WIDE_BINS", .. })
        ));
        assert!(matches!(
            SuiteConfig::from_lookup(lookup(&[("BITSHAPE_WIDE_BINS", "1")])),
            Err(ConfigError::Invalid { var: "BITSHAPE_WIDE_BINS", .. })
        ));
        assert!(matches!(
            SuiteConfig::from_lookup(lookup(&[("BITSHAPE_SEEDS", " , ")])),
            Err(ConfigError::Invalid { var: "BITSHAPE_SEEDS", .. })
        ));
        assert!(matches!(
            SuiteConfig::from_lookup(lookup(&[("BITSHAPE_TOLERANCE_SIGMAS", "NaN")])),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
