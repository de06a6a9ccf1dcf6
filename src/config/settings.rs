//! User settings for pocket-ledger
//!
//! Stored as `config.json` in the base directory. Every field has a default,
//! so a partial or missing file still loads.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::paths::PocketPaths;
use crate::error::PocketError;
use crate::models::ledger::default_interest_rate;
use crate::reports::period::weekday_from_index;

/// User settings for pocket-ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Monthly interest rate for savings ledgers (0.05 = 5%)
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Decimal,

    /// How many entries rankings show
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// Owner name for the interactive session
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// Card number used for menu deposits and withdrawals
    #[serde(default = "default_card_number")]
    pub card_number: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_top_n() -> usize {
    3
}

fn default_first_day_of_week() -> u8 {
    1 // Monday
}

fn default_owner_name() -> String {
    "Owner".to_string()
}

fn default_card_number() -> String {
    "123456789".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            interest_rate: default_interest_rate(),
            top_n: default_top_n(),
            first_day_of_week: default_first_day_of_week(),
            owner_name: default_owner_name(),
            card_number: default_card_number(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &PocketPaths) -> Result<Self, PocketError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PocketError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| PocketError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PocketPaths) -> Result<(), PocketError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PocketError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PocketError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the ledger would refuse later
    pub fn validate(&self) -> Result<(), PocketError> {
        if self.interest_rate.is_sign_negative() && !self.interest_rate.is_zero() {
            return Err(PocketError::Config(format!(
                "interest_rate cannot be negative: {}",
                self.interest_rate
            )));
        }
        if self.first_day_of_week > 6 {
            return Err(PocketError::Config(format!(
                "first_day_of_week must be 0-6, got {}",
                self.first_day_of_week
            )));
        }
        if self.owner_name.trim().is_empty() {
            return Err(PocketError::Config("owner_name cannot be empty".into()));
        }
        Ok(())
    }

    /// The weekday weekly reports start on
    pub fn week_start(&self) -> Weekday {
        weekday_from_index(self.first_day_of_week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.interest_rate, Decimal::new(5, 2));
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.week_start(), Weekday::Mon);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            top_n: 5,
            first_day_of_week: 0,
            interest_rate: Decimal::new(2, 2),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.week_start(), Weekday::Sun);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"top_n": 10}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.top_n, 10);
        assert_eq!(loaded.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"interest_rate": "-0.5"}"#).unwrap();
        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(PocketError::Config(_))
        ));

        std::fs::write(paths.settings_file(), "not json").unwrap();
        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(PocketError::Config(_))
        ));
    }
}
