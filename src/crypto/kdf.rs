use argon2::{Algorithm, Argon2, Params, Version};
use md5::{Digest, Md5};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::{KdfKind, SecurityConfig};
use crate::core::errors::{Result, VaultError};

/// Length of the AES-256 key produced by every KDF.
pub const KEY_LEN: usize = 32;

/// Domain separation salt for the vault key.
///
/// Fixed so the same passphrase always opens the same vault; the store holds
/// no per-wallet salt record.
pub const VAULT_KEY_SALT: &[u8] = b"cold-wallet/vault-key/v1";

/// Turns a passphrase into a 32-byte symmetric key.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyDerivation {
    /// Argon2id with explicit cost parameters.
    Argon2id { memory_kib: u32, iterations: u32, parallelism: u32 },
    /// Lowercase hex of MD5(passphrase); the 32 ASCII characters are the key.
    /// Only for reading vaults written by older builds.
    LegacyMd5,
}

impl KeyDerivation {
    pub fn from_config(config: &SecurityConfig) -> Self {
        match config.kdf {
            KdfKind::Argon2id => KeyDerivation::Argon2id {
                memory_kib: config.argon2_memory_kib,
                iterations: config.argon2_iterations,
                parallelism: config.argon2_parallelism,
            },
            KdfKind::LegacyMd5 => KeyDerivation::LegacyMd5,
        }
    }

    pub fn derive_key(&self, passphrase: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        match self {
            KeyDerivation::Argon2id { memory_kib, iterations, parallelism } => {
                debug!(memory_kib, iterations, parallelism, "Deriving vault key with Argon2id");
                derive_argon2id(passphrase, *memory_kib, *iterations, *parallelism)
            }
            KeyDerivation::LegacyMd5 => {
                debug!("Deriving vault key with legacy MD5 scheme");
                Ok(derive_legacy_md5(passphrase))
            }
        }
    }
}

fn derive_argon2id(
    passphrase: &[u8],
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
        .map_err(|e| VaultError::Config(format!("invalid Argon2 parameters: {}", e)))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase, VAULT_KEY_SALT, &mut key[..])
        .map_err(|e| VaultError::Config(format!("Argon2 derivation failed: {}", e)))?;
    Ok(key)
}

fn derive_legacy_md5(passphrase: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let digest = Md5::digest(passphrase);
    let hex_digest = Zeroizing::new(hex::encode(digest));

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(hex_digest.as_bytes());
    key
}
