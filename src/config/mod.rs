//! Configuration loading for the marketplace seeder.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `SEEDER_`, producing a typed [`AppConfig`].

use std::{
    collections::{BTreeMap, BTreeSet},
    env,
    path::PathBuf,
};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const ENV_PREFIX: &str = "SEEDER_";

/// Connection parts that may replace `DATABASE_URL`.
const DATABASE_PART_KEYS: [&str; 5] = ["DB_USER", "DB_PASSWORD", "DB_HOST", "DB_PORT", "DB_NAME"];

/// Longest accepted gap between consecutive account timestamps (one year).
pub const MAX_ACCOUNT_WINDOW_MINUTES: i64 = 365 * 24 * 60;

/// Application configuration derived from `SEEDER_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_schema: Option<String>,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
    #[serde(default)]
    pub seed: SeedConfig,
    /// Database keys found without the `SEEDER_` prefix. They are not read.
    #[serde(skip)]
    pub unprefixed_keys: Vec<String>,
}

/// Inputs and generation parameters for one seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SeedConfig {
    /// City workbook path
    ///
    /// Environment variable: `SEEDER_CITY_FILE`
    #[serde(default = "default_city_file")]
    pub city_file: PathBuf,

    /// Environment variable: `SEEDER_CITY_SHEET`
    #[serde(default = "default_city_sheet")]
    pub city_sheet: String,

    /// Product workbook path
    ///
    /// Environment variable: `SEEDER_PRODUCT_FILE`
    #[serde(default = "default_product_file")]
    pub product_file: PathBuf,

    /// Environment variable: `SEEDER_PRODUCT_SHEET`
    #[serde(default = "default_product_sheet")]
    pub product_sheet: String,

    /// Number of synthetic accounts to generate (default: 100)
    ///
    /// Environment variable: `SEEDER_ACCOUNT_COUNT`
    #[serde(default = "default_account_count")]
    pub account_count: u32,

    /// Upper bound on the gap between consecutive account timestamps in
    /// minutes (default: 7200)
    ///
    /// Environment variable: `SEEDER_ACCOUNT_WINDOW_MINUTES`
    #[serde(default = "default_account_window_minutes")]
    pub account_window_minutes: i64,

    /// Maximum number of bids per active product, inclusive (default: 15)
    ///
    /// Environment variable: `SEEDER_BID_MAX_PER_PRODUCT`
    #[serde(default = "default_bid_max_per_product")]
    pub bid_max_per_product: u32,

    /// Relative price perturbation per bid (default: 0.05, range: 0.0 <= p < 1.0)
    ///
    /// Environment variable: `SEEDER_BID_PRICE_PRECISION`
    #[serde(default = "default_bid_price_precision")]
    pub bid_price_precision: f64,

    /// Fixed RNG seed for reproducible runs
    ///
    /// Environment variable: `SEEDER_RNG_SEED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl SeedConfig {
    /// Account window as a duration, clamped to `1..=MAX_ACCOUNT_WINDOW_MINUTES`.
    pub fn account_window(&self) -> TimeDelta {
        TimeDelta::minutes(
            self.account_window_minutes
                .clamp(1, MAX_ACCOUNT_WINDOW_MINUTES),
        )
    }

    /// Validate seeding parameter bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ACCOUNT_WINDOW_MINUTES).contains(&self.account_window_minutes) {
            return Err(ConfigError::InvalidAccountWindow {
                value: self.account_window_minutes,
            });
        }

        if !(0.0..1.0).contains(&self.bid_price_precision) {
            return Err(ConfigError::InvalidBidPricePrecision {
                value: self.bid_price_precision,
            });
        }

        if self.city_sheet.trim().is_empty() {
            return Err(ConfigError::EmptySheetName { field: "CITY_SHEET" });
        }

        if self.product_sheet.trim().is_empty() {
            return Err(ConfigError::EmptySheetName {
                field: "PRODUCT_SHEET",
            });
        }

        Ok(())
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            city_file: default_city_file(),
            city_sheet: default_city_sheet(),
            product_file: default_product_file(),
            product_sheet: default_product_sheet(),
            account_count: default_account_count(),
            account_window_minutes: default_account_window_minutes(),
            bid_max_per_product: default_bid_max_per_product(),
            bid_price_precision: default_bid_price_precision(),
            rng_seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_schema: None,
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            run_migrations: default_run_migrations(),
            seed: SeedConfig::default(),
            unprefixed_keys: Vec::new(),
        }
    }
}


/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("invalid value '{value}' for SEEDER_{key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid database url: {message}")]
    InvalidDatabaseUrl { message: String },
    #[error("invalid SEEDER_LOG_FORMAT '{value}' (expected 'json' or 'pretty')")]
    InvalidLogFormat { value: String },
    #[error("SEEDER_DB_MAX_CONNECTIONS must be at least 1")]
    InvalidMaxConnections,
    #[error("invalid account window {value} minutes (must be within 1..=525600)")]
    InvalidAccountWindow { value: i64 },
    #[error("invalid bid price precision {value} (must be within 0.0..1.0)")]
    InvalidBidPricePrecision { value: f64 },
    #[error("SEEDER_{field} must not be empty")]
    EmptySheetName { field: &'static str },
}

impl AppConfig {
    /// Serialises the configuration to pretty JSON with the database password masked.
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut redacted = self.clone();
        if let Ok(mut url) = Url::parse(&redacted.database_url) {
            if url.password().is_some() && url.set_password(Some("REDACTED")).is_ok() {
                redacted.database_url = url.to_string();
            }
        }
        serde_json::to_string_pretty(&redacted)
    }

    /// Validate configuration bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::InvalidDatabaseUrl {
                message: "database url cannot be empty".to_string(),
            });
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections);
        }

        self.seed.validate()
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_database_url() -> String {
    "postgres://postgres@localhost:5432/postgres".to_string()
}

fn default_db_max_connections() -> u32 {
    1
}

fn default_db_acquire_timeout_ms() -> u64 {
    5000
}

fn default_run_migrations() -> bool {
    true
}

fn default_city_file() -> PathBuf {
    PathBuf::from("files/city.xlsx")
}

fn default_city_sheet() -> String {
    "city".to_string()
}

fn default_product_file() -> PathBuf {
    PathBuf::from("files/car_product.xlsx")
}

fn default_product_sheet() -> String {
    "car_product".to_string()
}

fn default_account_count() -> u32 {
    100
}

fn default_account_window_minutes() -> i64 {
    7200
}

fn default_bid_max_per_product() -> u32 {
    15
}

fn default_bid_price_precision() -> f64 {
    0.05
}

/// Builds a Postgres URL from the `DB_*` parts, consuming them from `layered`.
/// Missing parts fall back to a local `postgres` superuser connection.
fn database_url_from_parts(
    layered: &mut BTreeMap<String, String>,
) -> Result<String, ConfigError> {
    let user = layered
        .remove("DB_USER")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "postgres".to_string());
    let password = layered.remove("DB_PASSWORD").filter(|v| !v.is_empty());
    let host = layered
        .remove("DB_HOST")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    let port = match layered.remove("DB_PORT").filter(|v| !v.is_empty()) {
        Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            key: "DB_PORT",
            value: raw.clone(),
        })?,
        None => 5432,
    };
    let name = layered
        .remove("DB_NAME")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "postgres".to_string());

    let invalid = |message: &str| ConfigError::InvalidDatabaseUrl {
        message: message.to_string(),
    };

    let mut url = Url::parse("postgres://localhost").map_err(|e| ConfigError::InvalidDatabaseUrl {
        message: e.to_string(),
    })?;
    url.set_host(Some(&host))
        .map_err(|e| ConfigError::InvalidDatabaseUrl {
            message: format!("invalid host '{host}': {e}"),
        })?;
    url.set_port(Some(port))
        .map_err(|_| invalid("port cannot be set"))?;
    url.set_username(&user)
        .map_err(|_| invalid("username cannot be set"))?;
    url.set_password(password.as_deref())
        .map_err(|_| invalid("password cannot be set"))?;
    url.set_path(&format!("/{name}"));

    Ok(url.to_string())
}

fn has_database_parts(layered: &BTreeMap<String, String>) -> bool {
    DATABASE_PART_KEYS
        .iter()
        .any(|key| layered.contains_key(*key))
}

fn parse_value<T: std::str::FromStr>(
    layered: &mut BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match layered.remove(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(None),
    }
}

fn parse_bool(
    layered: &mut BTreeMap<String, String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    match layered.remove(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
        None => Ok(None),
    }
}

/// Loads configuration using layered `.env` files and `SEEDER_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads and validates configuration.
    ///
    /// Later layers win: `.env`, `.env.local`, `.env.<profile>`,
    /// `.env.<profile>.local`, then the process environment. Relative input
    /// file paths are left relative to the working directory.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut unprefixed = BTreeSet::new();
        let (mut layered, profile_hint) = self.collect_layered_env(&mut unprefixed)?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            } else if DATABASE_PART_KEYS.contains(&key.as_str()) {
                unprefixed.insert(key);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);

        // A full URL wins over the individual connection parts.
        let database_url = match layered.remove("DATABASE_URL").filter(|v| !v.is_empty()) {
            Some(url) => url,
            None if has_database_parts(&layered) => database_url_from_parts(&mut layered)?,
            None => default_database_url(),
        };
        let db_schema = layered
            .remove("DB_SCHEMA")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let db_max_connections = parse_value(&mut layered, "DB_MAX_CONNECTIONS")?
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = parse_value(&mut layered, "DB_ACQUIRE_TIMEOUT_MS")?
            .unwrap_or_else(default_db_acquire_timeout_ms);
        let run_migrations =
            parse_bool(&mut layered, "RUN_MIGRATIONS")?.unwrap_or_else(default_run_migrations);

        let seed = SeedConfig {
            city_file: layered
                .remove("CITY_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_city_file),
            city_sheet: layered
                .remove("CITY_SHEET")
                .unwrap_or_else(default_city_sheet),
            product_file: layered
                .remove("PRODUCT_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_product_file),
            product_sheet: layered
                .remove("PRODUCT_SHEET")
                .unwrap_or_else(default_product_sheet),
            account_count: parse_value(&mut layered, "ACCOUNT_COUNT")?
                .unwrap_or_else(default_account_count),
            account_window_minutes: parse_value(&mut layered, "ACCOUNT_WINDOW_MINUTES")?
                .unwrap_or_else(default_account_window_minutes),
            bid_max_per_product: parse_value(&mut layered, "BID_MAX_PER_PRODUCT")?
                .unwrap_or_else(default_bid_max_per_product),
            bid_price_precision: parse_value(&mut layered, "BID_PRICE_PRECISION")?
                .unwrap_or_else(default_bid_price_precision),
            rng_seed: parse_value(&mut layered, "RNG_SEED")?,
        };

        let config = AppConfig {
            profile,
            log_level,
            log_format,
            database_url,
            db_schema,
            db_max_connections,
            db_acquire_timeout_ms,
            run_migrations,
            seed,
            unprefixed_keys: unprefixed.into_iter().collect(),
        };

        config.validate()?;
        Ok(config)
    }

    fn collect_layered_env(
        &self,
        unprefixed: &mut BTreeSet<String>,
    ) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values, unprefixed)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values, unprefixed)?;

        let profile = env::var(format!("{ENV_PREFIX}PROFILE"))
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
            unprefixed,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
            unprefixed,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
        unprefixed: &mut BTreeSet<String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.insert(stripped.to_string(), value);
                    } else if DATABASE_PART_KEYS.contains(&key.as_str()) {
                        unprefixed.insert(key);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
