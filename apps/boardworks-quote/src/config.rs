//! # Quote Configuration
//!
//! Pricing and lead-time settings for the CLI.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BOARDWORKS_CURRENCY=cad                                            │
//! │     BOARDWORKS_CELL_PRICE_CENTS=450                                    │
//! │     BOARDWORKS_GROOVE_CENTS=2000                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/boardworks/quote.toml (Linux)                            │
//! │     ~/Library/Application Support/com.boardworks.quote/quote.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     PricingConfig::default(), LeadTimeRules::default()                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing values from the file and the environment both go through
//! [`PricingConfig::patched`]: a bad field is logged and skipped, the rest
//! still apply. Lead-time rules are strict and must pass validation.
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [pricing]
//! currency = "usd"
//! cellPrice = 400          # cents
//!
//! [pricing.base]
//! regular = 21000
//!
//! [pricing.extras]
//! juiceGroove = 2000
//! brassFeet = 1500
//!
//! [lead_time]
//! cellsPerExtraDay = 50
//! shipping = { min = 2, max = 4 }
//! ```

use std::path::{Path, PathBuf};

use boardworks_core::leadtime::LeadTimeRules;
use boardworks_core::money::Money;
use boardworks_core::pricing::{ExtrasPatch, PricingConfig, PricingPatch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{QuoteError, QuoteResult};

pub const ENV_CURRENCY: &str = "BOARDWORKS_CURRENCY";
pub const ENV_CELL_PRICE: &str = "BOARDWORKS_CELL_PRICE_CENTS";
pub const ENV_GROOVE: &str = "BOARDWORKS_GROOVE_CENTS";

/// Raw file shape. `pricing` stays loosely typed so it can be merged field
/// by field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteFile {
    pricing: Option<toml::Value>,
    #[serde(alias = "leadTime")]
    lead_time: Option<LeadTimeRules>,
}

/// Effective configuration for one CLI run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConfig {
    pub pricing: PricingConfig,
    pub lead_time: LeadTimeRules,
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist. The platform default path is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> QuoteResult<Self> {
        let path = match config_path {
            Some(path) => Some(path),
            None => Self::default_config_path().filter(|path| {
                let found = path.exists();
                if !found {
                    debug!(?path, "Config file not found, using defaults");
                }
                found
            }),
        };

        Self::load_with(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injected environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> QuoteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                info!(?path, "Loading quote config from file");
                let contents = std::fs::read_to_string(path).map_err(|source| QuoteError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&contents, path)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body on top of the defaults.
    pub fn from_toml_str(contents: &str, path: &Path) -> QuoteResult<Self> {
        let file: QuoteFile = toml::from_str(contents).map_err(|source| QuoteError::Toml {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::default();

        if let Some(pricing) = file.pricing {
            let raw = serde_json::to_value(&pricing)
                .map_err(|e| QuoteError::InvalidConfig(format!("[pricing] {e}")))?;
            let outcome = config.pricing.patched_from_json(&raw);
            if !outcome.is_clean() {
                warn!(
                    rejected = outcome.rejected.len(),
                    "Some pricing values in the config file were ignored"
                );
            }
            config.pricing = outcome.config;
        }

        if let Some(lead_time) = file.lead_time {
            config.lead_time = lead_time;
        }

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> QuoteResult<()> {
        self.lead_time.validate()?;

        if self.pricing.currency.trim().is_empty() {
            return Err(QuoteError::InvalidConfig("currency must not be blank".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut patch = PricingPatch::default();

        if let Some(currency) = env(ENV_CURRENCY) {
            debug!(%currency, "Overriding currency from environment");
            patch.currency = Some(currency);
        }

        if let Some(cents) = env_cents(&env, ENV_CELL_PRICE) {
            debug!(cents, "Overriding cell price from environment");
            patch.cell_price = Some(Money::from_cents(cents));
        }

        if let Some(cents) = env_cents(&env, ENV_GROOVE) {
            debug!(cents, "Overriding juice groove surcharge from environment");
            patch.extras = Some(ExtrasPatch {
                juice_groove: Some(Money::from_cents(cents)),
                ..ExtrasPatch::default()
            });
        }

        if !patch.is_empty() {
            self.pricing = self.pricing.patched(&patch).config;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "boardworks", "quote")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }
}

fn env_cents<F>(env: &F, key: &str) -> Option<i64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = env(key)?;
    match raw.trim().parse::<i64>() {
        Ok(cents) => Some(cents),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring non-integer amount in environment");
            None
        }
    }
}
