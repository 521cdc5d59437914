//! Configuration loading and management.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use pd_core::types::BucketName;
use pd_core::{DistributionConfig, PayoutPolicy, SplitTable};

/// Application configuration.
///
/// The split table is stored as a name → fraction map; bucket ordering in
/// output follows the map's sorted keys, so reports are stable regardless
/// of the order buckets appear in the TOML file.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Named base-split fractions. Must sum to at most 1.
    pub split: BTreeMap<String, f64>,

    /// The bucket distributed across weighted candidates.
    pub pool_bucket: String,

    /// Default maximum fraction of the pool per candidate, in (0, 1].
    pub cap_fraction: f64,

    /// Default flag-exclusion policy.
    pub exclude_flagged: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("split", &self.split)
            .field("pool_bucket", &self.pool_bucket)
            .field("cap_fraction", &self.cap_fraction)
            .field("exclude_flagged", &self.exclude_flagged)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        // The canonical four-way split: agent, platform, creator, holders,
        // one quarter each, with the holder bucket as the distribution pool.
        let split = [
            ("agent", 0.25),
            ("platform", 0.25),
            ("creator", 0.25),
            ("holders", 0.25),
        ]
        .into_iter()
        .map(|(name, fraction)| (name.to_string(), fraction))
        .collect();

        Self {
            split,
            pool_bucket: "holders".to_string(),
            cap_fraction: 1.0,
            exclude_flagged: false,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        // Figment merges dicts recursively, which would blend a user-defined
        // split table with the default one. Seed with an empty table and
        // fall back to the default split only when nothing provides one.
        let defaults = Self {
            split: BTreeMap::new(),
            ..Self::default()
        };
        let mut figment = Figment::from(Serialized::defaults(defaults));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PD_*)
        figment = figment.merge(Env::prefixed("PD_"));

        let mut config: Self = figment.extract()?;
        if config.split.is_empty() {
            config.split = Self::default().split;
        }
        Ok(config)
    }

    /// Builds the validated split table from the configured fractions.
    pub fn split_table(&self) -> anyhow::Result<SplitTable> {
        let entries = self
            .split
            .iter()
            .map(|(name, fraction)| Ok((BucketName::new(name.clone())?, *fraction)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        SplitTable::new(entries).context("invalid split table in configuration")
    }

    /// Builds the distribution options, applying per-invocation overrides.
    pub fn distribution_config(
        &self,
        cap_override: Option<f64>,
        exclude_flagged: bool,
    ) -> DistributionConfig {
        DistributionConfig {
            exclude_flagged: exclude_flagged || self.exclude_flagged,
            cap_fraction: cap_override.unwrap_or(self.cap_fraction),
        }
    }

    /// Builds the validated payout policy used by the report command.
    pub fn policy(&self) -> anyhow::Result<PayoutPolicy> {
        let pool_bucket =
            BucketName::new(self.pool_bucket.clone()).context("invalid pool bucket name")?;
        PayoutPolicy::new(
            self.split_table()?,
            pool_bucket,
            self.distribution_config(None, false),
        )
        .context("invalid payout policy in configuration")
    }
}

/// Returns the platform-specific config directory for pd.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pd"))
}
