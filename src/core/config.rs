use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::coins::CoinRegistry;
use crate::core::errors::{Result, VaultError};

/// Environment variable the CLI reads `--home` from.
pub const HOME_ENV: &str = "COLD_WALLET_HOME";

/// Name of the optional config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Passphrase-to-key transform used by the vault cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KdfKind {
    /// Argon2id with the configured cost parameters.
    Argon2id,
    /// hex(MD5(passphrase)) used directly as the AES-256 key.
    LegacyMd5,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "SecurityConfig::default_kdf")]
    pub kdf: KdfKind,

    /// Argon2 memory cost (KiB)
    #[serde(default = "SecurityConfig::default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count
    #[serde(default = "SecurityConfig::default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 lanes
    #[serde(default = "SecurityConfig::default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl SecurityConfig {
    fn default_kdf() -> KdfKind { KdfKind::Argon2id }
    fn default_argon2_memory_kib() -> u32 { 19_456 }
    fn default_argon2_iterations() -> u32 { 2 }
    fn default_argon2_parallelism() -> u32 { 1 }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            kdf: Self::default_kdf(),
            argon2_memory_kib: Self::default_argon2_memory_kib(),
            argon2_iterations: Self::default_argon2_iterations(),
            argon2_parallelism: Self::default_argon2_parallelism(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Resolved from `--home`, `COLD_WALLET_HOME` or the home directory,
    /// never from the config file itself.
    #[serde(skip, default = "StorageConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "StorageConfig::default_db_file")]
    pub db_file: String,
    #[serde(default = "StorageConfig::default_tree")]
    pub tree: String,
}

impl StorageConfig {
    fn default_data_dir() -> PathBuf { default_data_dir() }
    fn default_db_file() -> String { "main.db".to_string() }
    fn default_tree() -> String { "mainDataBucket".to_string() }

    /// Full path of the sled database directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            db_file: Self::default_db_file(),
            tree: Self::default_tree(),
        }
    }
}

/// Seed generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "SeedConfig::default_entropy_bits")]
    pub entropy_bits: usize,
}

impl SeedConfig {
    fn default_entropy_bits() -> usize { 128 }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { entropy_bits: Self::default_entropy_bits() }
    }
}

/// Which coin type testnet keys are derived under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestnetCoinType {
    /// Each coin keeps its own registered coin type on testnet.
    PerCoin,
    /// Every coin uses `shared_testnet_coin_type` on testnet.
    Shared,
}

/// Derivation path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    #[serde(default = "DerivationConfig::default_testnet_coin_type")]
    pub testnet_coin_type: TestnetCoinType,
    #[serde(default = "DerivationConfig::default_shared_testnet_coin_type")]
    pub shared_testnet_coin_type: u32,
}

impl DerivationConfig {
    fn default_testnet_coin_type() -> TestnetCoinType { TestnetCoinType::PerCoin }
    // SLIP-44: 1' is "testnet (all coins)".
    fn default_shared_testnet_coin_type() -> u32 { 1 }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            testnet_coin_type: Self::default_testnet_coin_type(),
            shared_testnet_coin_type: Self::default_shared_testnet_coin_type(),
        }
    }
}

/// wallet配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub derivation: DerivationConfig,

    /// Coin name to SLIP-44 coin type. Empty means the built-in registry.
    #[serde(default)]
    pub coins: BTreeMap<String, u32>,
}

impl WalletConfig {
    /// Builds the configuration for one process run.
    ///
    /// The data directory is `home` if given, else `~/.coldWallet`. The
    /// CLI fills `home` from `--home` or `COLD_WALLET_HOME`. The config file is
    /// `config_path` if given, else `{data_dir}/config.toml` when present.
    pub fn load(home: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let data_dir = home.map(Path::to_path_buf).unwrap_or_else(default_data_dir);

        let file = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE));

        let mut config = if file.exists() {
            info!(path = %file.display(), "Loading wallet config");
            let content = std::fs::read_to_string(&file)?;
            Self::from_toml_str(&content)?
        } else {
            if config_path.is_some() {
                return Err(VaultError::Config(format!(
                    "config file {} does not exist",
                    file.display()
                )));
            }
            debug!(path = %file.display(), "No config file, using defaults");
            Self::default()
        };

        config.storage.data_dir = data_dir;

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.seed.entropy_bits != 128 {
            return Err(VaultError::Config(format!(
                "seed.entropy_bits must be 128 (12-word phrases), got {}",
                self.seed.entropy_bits
            )));
        }
        if self.storage.db_file.is_empty() || self.storage.tree.is_empty() {
            return Err(VaultError::Config("storage.db_file and storage.tree must not be empty".into()));
        }
        if self.security.kdf == KdfKind::Argon2id {
            if self.security.argon2_iterations == 0 || self.security.argon2_parallelism == 0 {
                return Err(VaultError::Config("argon2 iterations and parallelism must be positive".into()));
            }
            if self.security.argon2_memory_kib < 8 * self.security.argon2_parallelism {
                return Err(VaultError::Config(format!(
                    "argon2_memory_kib must be at least {} for {} lanes",
                    8 * self.security.argon2_parallelism,
                    self.security.argon2_parallelism
                )));
            }
        }
        for (name, coin_type) in &self.coins {
            if name.is_empty() {
                return Err(VaultError::Config("coin names must not be empty".into()));
            }
            if *coin_type >= 0x8000_0000 {
                return Err(VaultError::Config(format!(
                    "coin type {} for {} is out of range",
                    coin_type, name
                )));
            }
        }
        if self.derivation.shared_testnet_coin_type >= 0x8000_0000 {
            return Err(VaultError::Config("shared_testnet_coin_type is out of range".into()));
        }
        Ok(())
    }

    /// The coin registry this configuration selects.
    pub fn coin_registry(&self) -> CoinRegistry {
        if self.coins.is_empty() {
            CoinRegistry::builtin()
        } else {
            CoinRegistry::from_map(self.coins.clone())
        }
    }

    /// Creates the data directory if it is missing (0o700 on unix).
    pub fn ensure_data_dir(&self) -> Result<()> {
        let dir = &self.storage.data_dir;
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
            }
            info!(path = %dir.display(), "Created wallet data directory");
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        return home.join(".coldWallet");
    }
    PathBuf::from(".coldWallet")
}
