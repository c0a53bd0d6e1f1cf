//! Wallet Manager Core Module
//!
//! Drives one logical wallet through its lifecycle on top of the vault store.
//!
//! ## Module Structure
//! - `lifecycle` - create, import and status
//! - `backup` - seed phrase backup and public key export

pub mod backup;
pub mod lifecycle;

pub use backup::write_export_json;

use crate::core::bip44::KeyDeriver;
use crate::core::coins::CoinRegistry;
use crate::core::config::{SecurityConfig, WalletConfig};
use crate::core::errors::{Result, VaultError};
use crate::core::mnemonic::SeedPhrase;
use crate::crypto::VaultCipher;
use crate::storage::records::SEED_KEY;
use crate::storage::VaultStore;

/// Whether the vault currently holds a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletState {
    NoWallet,
    Present,
}

impl std::fmt::Display for WalletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletState::NoWallet => f.write_str("absent"),
            WalletState::Present => f.write_str("present"),
        }
    }
}

/// wallet管理器
///
/// Owns the vault store and the settings every operation needs. Plaintext
/// secrets live only for the duration of one call.
pub struct WalletManager {
    store: VaultStore,
    security: SecurityConfig,
    entropy_bits: usize,
    registry: CoinRegistry,
    deriver: KeyDeriver,
}

impl WalletManager {
    /// Builds a manager over an already opened store.
    pub fn new(config: &WalletConfig, store: VaultStore) -> Self {
        Self {
            store,
            security: config.security.clone(),
            entropy_bits: config.seed.entropy_bits,
            registry: config.coin_registry(),
            deriver: KeyDeriver::new(&config.derivation),
        }
    }

    /// Opens the store at the configured database path.
    pub fn open(config: &WalletConfig) -> Result<Self> {
        let store = VaultStore::open(&config.storage.db_path(), &config.storage.tree)?;
        Ok(Self::new(config, store))
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    pub fn registry(&self) -> &CoinRegistry {
        &self.registry
    }

    /// Number of records a complete wallet occupies: the seed record plus a
    /// private and a public record per coin per network.
    pub fn expected_record_count(&self) -> usize {
        1 + self.registry.len() * 2 * 2
    }

    fn cipher(&self, passphrase: &str) -> Result<VaultCipher> {
        VaultCipher::new(passphrase, &self.security)
    }

    /// Reads and decrypts the seed record.
    fn unlock(&self, cipher: &VaultCipher) -> Result<SeedPhrase> {
        open_seed_record(cipher, self.store.get(SEED_KEY)?)
    }
}

/// Absent or empty sentinel means there is no wallet; a failed decryption
/// is a wrong passphrase.
pub(crate) fn open_seed_record(cipher: &VaultCipher, sealed: Option<Vec<u8>>) -> Result<SeedPhrase> {
    let sealed = match sealed {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(VaultError::NoWallet),
    };

    let phrase = SeedPhrase::from_stored(cipher.decrypt(&sealed)?)?;
    if phrase.is_empty() {
        return Err(VaultError::NoWallet);
    }
    Ok(phrase)
}
