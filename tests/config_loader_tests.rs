use marketplace_seeder::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

const KEYS: &[&str] = &[
    "SEEDER_PROFILE",
    "SEEDER_LOG_LEVEL",
    "SEEDER_LOG_FORMAT",
    "SEEDER_DATABASE_URL",
    "SEEDER_DB_USER",
    "SEEDER_DB_PASSWORD",
    "SEEDER_DB_HOST",
    "SEEDER_DB_PORT",
    "SEEDER_DB_NAME",
    "SEEDER_DB_SCHEMA",
    "SEEDER_ACCOUNT_COUNT",
    "SEEDER_ACCOUNT_WINDOW_MINUTES",
    "SEEDER_BID_MAX_PER_PRODUCT",
    "SEEDER_BID_PRICE_PRECISION",
    "SEEDER_RNG_SEED",
    "SEEDER_RUN_MIGRATIONS",
    "DB_USER",
    "DB_PASSWORD",
    "DB_HOST",
    "DB_PORT",
    "DB_NAME",
];

fn clear_env() {
    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.log_format, "json");
    assert!(cfg.run_migrations);
    assert_eq!(cfg.seed.account_count, 100);
    assert_eq!(cfg.seed.account_window_minutes, 7200);
    assert_eq!(cfg.seed.bid_max_per_product, 15);
    assert_eq!(cfg.seed.bid_price_precision, 0.05);
    assert_eq!(cfg.seed.city_file, PathBuf::from("files/city.xlsx"));
    assert_eq!(cfg.seed.product_sheet, "car_product");
    assert!(cfg.seed.rng_seed.is_none());
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "SEEDER_ACCOUNT_COUNT=10\n");
    write_env_file(&temp_dir, ".env.test", "SEEDER_ACCOUNT_COUNT=20\n");
    write_env_file(&temp_dir, ".env.test.local", "SEEDER_ACCOUNT_COUNT=30\n");

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "SEEDER_PROFILE=test\nSEEDER_ACCOUNT_COUNT=15\nSEEDER_RNG_SEED=7\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.seed.account_count, 30);
    assert_eq!(cfg.seed.rng_seed, Some(7));
    clear_env();
}

#[test]
fn process_env_overrides_files() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "SEEDER_BID_MAX_PER_PRODUCT=3\n");
    unsafe {
        env::set_var("SEEDER_BID_MAX_PER_PRODUCT", "9");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.seed.bid_max_per_product, 9);
    clear_env();
}

#[test]
fn database_parts_compose_url_and_redact_password() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "SEEDER_DB_USER=seeder\nSEEDER_DB_PASSWORD=p@ss word\nSEEDER_DB_HOST=db.internal\nSEEDER_DB_PORT=6543\nSEEDER_DB_NAME=market\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert!(cfg.database_url.starts_with("postgres://seeder:"));
    assert!(cfg.database_url.ends_with("@db.internal:6543/market"));
    assert!(!cfg.database_url.contains("p@ss word"));

    let redacted = cfg.redacted_json().unwrap();
    assert!(redacted.contains("REDACTED"));
    assert!(!redacted.contains("p%40ss"));
    clear_env();
}

#[test]
fn database_url_wins_over_parts() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "SEEDER_DB_HOST=ignored\nSEEDER_DATABASE_URL=sqlite::memory:\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.database_url, "sqlite::memory:");
    clear_env();
}

#[test]
fn invalid_precision_is_rejected() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "SEEDER_BID_PRICE_PRECISION=1.5\n");

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidBidPricePrecision { .. }));
    clear_env();
}

#[test]
fn non_numeric_count_is_rejected() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "SEEDER_ACCOUNT_COUNT=lots\n");

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    clear_env();
}

#[test]
fn unprefixed_database_keys_are_reported_and_ignored() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "DB_HOST=legacy-host\nDB_USER=legacy\nSEEDER_ACCOUNT_COUNT=5\n",
    );
    unsafe {
        env::set_var("DB_NAME", "legacy_db");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert_eq!(cfg.database_url, "postgres://postgres@localhost:5432/postgres");
    assert_eq!(cfg.seed.account_count, 5);
    assert_eq!(cfg.unprefixed_keys, vec!["DB_HOST", "DB_NAME", "DB_USER"]);
    assert!(!cfg.redacted_json().unwrap().contains("legacy"));
    clear_env();
}

#[test]
fn prefixed_only_configuration_reports_nothing() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "SEEDER_DB_HOST=db.internal\n");

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads");

    assert!(cfg.unprefixed_keys.is_empty());
    assert!(cfg.database_url.contains("@db.internal:5432/"));
    clear_env();
}
