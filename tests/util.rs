// tests/util.rs
// Shared test helpers for integration tests

#![allow(dead_code)]

use cold_wallet::core::config::{WalletConfig, CONFIG_FILE};
use cold_wallet::core::WalletManager;
use std::path::Path;
use tempfile::TempDir;

/// Cheap Argon2 cost so tests do not spend seconds per key derivation.
pub const FAST_CONFIG: &str = r#"
[security]
kdf = "argon2id"
argon2_memory_kib = 64
argon2_iterations = 1
argon2_parallelism = 1
"#;

pub const PHRASE_A: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
pub const PHRASE_B: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";

/// A throwaway wallet home containing `config.toml` with [`FAST_CONFIG`].
pub fn temp_home() -> TempDir {
    temp_home_with(FAST_CONFIG)
}

pub fn temp_home_with(config_toml: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp home");
    std::fs::write(dir.path().join(CONFIG_FILE), config_toml).expect("write config.toml");
    dir
}

pub fn load_config(home: &Path) -> WalletConfig {
    WalletConfig::load(Some(home), None).expect("load config")
}

/// Opens a manager over `{home}/main.db`.
pub fn open_manager(home: &Path) -> WalletManager {
    let config = load_config(home);
    config.ensure_data_dir().expect("data dir");
    WalletManager::open(&config).expect("open manager")
}
