//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`BAZAAR_*`)
//! 2. Config file (`config.toml`, explicit `--config` path or the platform
//!    config dir)
//! 3. Defaults (this file)
//!
//! ## Example `config.toml`
//! ```toml
//! store_name = "Sharma General Store"
//! default_tax_rate_bps = 1800
//! global_discount_bps = 0
//! enforce_credit_limit = true
//! award_loyalty_points = true
//! allow_negative_stock = false
//! utc_offset = "+05:30"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use bazaar_core::cart::Pricing;
use bazaar_core::checkout::CheckoutPolicy;
use bazaar_core::validation::validate_rate_bps;
use bazaar_core::{DiscountRate, Money, TaxRate, ValidationError};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Config file name inside the platform config dir.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(#[from] bazaar_core::ValidationError),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (shown by `bazaar status`)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Default tax rate in basis points, e.g. 1800 = 18%
    pub default_tax_rate_bps: u32,

    /// Discount applied to every bill, in basis points
    pub global_discount_bps: u32,

    /// Database file. `None` means the platform data dir.
    pub db_path: Option<PathBuf>,

    pub enforce_credit_limit: bool,
    pub award_loyalty_points: bool,
    pub allow_negative_stock: bool,

    /// Store time zone as `+HH:MM`. `None` uses the machine's local zone.
    /// Decides "today" and the invoice year.
    pub utc_offset: Option<String>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Bazaar POS"
    /// - Currency: Rs.
    /// - Tax: 0%, no global discount
    /// - Checkout: strict policy
    fn default() -> Self {
        let policy = CheckoutPolicy::strict();
        ConfigState {
            store_name: "Bazaar POS".to_string(),
            currency_symbol: "Rs.".to_string(),
            default_tax_rate_bps: 0,
            global_discount_bps: 0,
            db_path: None,
            enforce_credit_limit: policy.enforce_credit_limit,
            award_loyalty_points: policy.award_loyalty_points,
            allow_negative_stock: policy.allow_negative_stock,
            utc_offset: None,
        }
    }
}

impl ConfigState {
    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => ConfigState::default(),
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, no file.
    pub fn from_env() -> Self {
        let mut config = ConfigState::default();
        config.apply_env();
        config
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading config file");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// ## Environment Variables
    /// - `BAZAAR_STORE_NAME`
    /// - `BAZAAR_TAX_RATE`, `BAZAAR_DISCOUNT_RATE`: percentages, e.g. "18"
    /// - `BAZAAR_DB_PATH`
    /// - `BAZAAR_ENFORCE_CREDIT_LIMIT`, `BAZAAR_AWARD_LOYALTY`,
    ///   `BAZAAR_ALLOW_NEGATIVE_STOCK`: true/false
    /// - `BAZAAR_UTC_OFFSET`: e.g. "+05:30"
    fn apply_env(&mut self) {
        if let Ok(store_name) = std::env::var("BAZAAR_STORE_NAME") {
            self.store_name = store_name;
        }
        if let Some(rate) = env_percentage("BAZAAR_TAX_RATE") {
            self.default_tax_rate_bps = TaxRate::from_percentage(rate).bps();
        }
        if let Some(rate) = env_percentage("BAZAAR_DISCOUNT_RATE") {
            self.global_discount_bps = DiscountRate::from_percentage(rate).bps();
        }
        if let Ok(path) = std::env::var("BAZAAR_DB_PATH") {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = env_flag("BAZAAR_ENFORCE_CREDIT_LIMIT") {
            self.enforce_credit_limit = flag;
        }
        if let Some(flag) = env_flag("BAZAAR_AWARD_LOYALTY") {
            self.award_loyalty_points = flag;
        }
        if let Some(flag) = env_flag("BAZAAR_ALLOW_NEGATIVE_STOCK") {
            self.allow_negative_stock = flag;
        }
        if let Ok(offset) = std::env::var("BAZAAR_UTC_OFFSET") {
            match parse_utc_offset(&offset) {
                Ok(_) => self.utc_offset = Some(offset),
                Err(_) => warn!(variable = "BAZAAR_UTC_OFFSET", value = %offset, "Ignoring invalid offset"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rate_bps("default_tax_rate_bps", self.default_tax_rate_bps)?;
        validate_rate_bps("global_discount_bps", self.global_discount_bps)?;
        if let Some(offset) = &self.utc_offset {
            parse_utc_offset(offset)?;
        }
        Ok(())
    }

    /// The store's time zone.
    pub fn time_zone(&self) -> FixedOffset {
        self.utc_offset
            .as_deref()
            .and_then(|offset| parse_utc_offset(offset).ok())
            .unwrap_or_else(|| *Local::now().offset())
    }

    /// The store's calendar date at `now`.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.time_zone()).date_naive()
    }

    /// Bill-level rates every new cart starts with.
    pub fn pricing(&self) -> Pricing {
        Pricing::new(
            DiscountRate::from_bps(self.global_discount_bps),
            TaxRate::from_bps(self.default_tax_rate_bps),
        )
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            enforce_credit_limit: self.enforce_credit_limit,
            award_loyalty_points: self.award_loyalty_points,
            allow_negative_stock: self.allow_negative_stock,
        }
    }

    /// Formats an amount with the configured symbol and thousands separators.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123_456)), "Rs. 1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{} {}", self.currency_symbol, amount.abs().grouped())
        } else {
            format!("{} {}", self.currency_symbol, amount.grouped())
        }
    }

    /// Database file: the configured path, or `bazaar.db` in the data dir.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.bazaar.pos/bazaar.db`
    /// - **Windows**: `%APPDATA%\bazaar\pos\data\bazaar.db`
    /// - **Linux**: `~/.local/share/pos/bazaar.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "bazaar", "pos").ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Read {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join("bazaar.db"))
    }
}

/// `config.toml` in the platform config dir, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "bazaar", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Parses `+05:30`, `-04:00`, `+0530` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ValidationError> {
    let invalid = || ValidationError::InvalidFormat {
        field: "utc_offset".to_string(),
        reason: format!("'{}' is not +HH:MM", raw),
    };

    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn env_percentage(name: &str) -> Option<f64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(rate) if (0.0..=100.0).contains(&rate) => Some(rate),
        _ => {
            warn!(variable = name, value = %raw, "Ignoring invalid percentage");
            None
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(variable = name, value = %raw, "Ignoring invalid flag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_minor(123_456)), "Rs. 1,234.56");
        assert_eq!(config.format_currency(Money::from_minor(1)), "Rs. 0.01");
        assert_eq!(config.format_currency(Money::zero()), "Rs. 0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_minor(-123_456)), "-Rs. 1,234.56");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ConfigState = toml::from_str(
            r#"
            store_name = "Sharma General Store"
            default_tax_rate_bps = 1800
            allow_negative_stock = true
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Sharma General Store");
        assert_eq!(config.pricing().tax_rate, TaxRate::from_bps(1800));
        assert!(config.enforce_credit_limit);
        assert!(config.checkout_policy().allow_negative_stock);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = ConfigState::load(Some(Path::new("/definitely/not/here/config.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_rates_over_100_percent_rejected() {
        let config = ConfigState {
            default_tax_rate_bps: 12_000,
            ..ConfigState::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_utc_offset_parse() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_utc_offset("-0400").unwrap().local_minus_utc(), -14_400);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("05:30").is_err());
        assert!(parse_utc_offset("+5:30").is_err());
        assert!(parse_utc_offset("+05:75").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
    }

    #[test]
    fn test_local_date_uses_store_offset() {
        let config = ConfigState {
            utc_offset: Some("+05:30".to_string()),
            ..ConfigState::default()
        };
        // 01:30 on 3 March in India
        let now = chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 3, 2, 20, 0, 0).unwrap();
        assert_eq!(config.local_date(now), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());

        let bad = ConfigState {
            utc_offset: Some("IST".to_string()),
            ..ConfigState::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_configured_db_path_wins() {
        let config = ConfigState {
            db_path: Some(PathBuf::from("/tmp/shop.db")),
            ..ConfigState::default()
        };
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));
    }
}
