//! Authenticated encryption for vault records.
//!
//! Layout of every sealed value: `12-byte nonce || ciphertext || 16-byte tag`.
//! A fresh random nonce is drawn per call, so sealing the same plaintext
//! twice never yields the same bytes.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::core::config::SecurityConfig;
use crate::core::errors::{Result, VaultError};
use crate::crypto::kdf::KeyDerivation;

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// AES-256-GCM bound to a key derived from the wallet passphrase.
pub struct VaultCipher {
    cipher: Aes256Gcm,
}

impl VaultCipher {
    /// Derives the key from `passphrase` with the configured KDF.
    pub fn new(passphrase: &str, config: &SecurityConfig) -> Result<Self> {
        let key = KeyDerivation::from_config(config).derive_key(passphrase.as_bytes())?;
        Self::from_key(&key)
    }

    pub fn from_key(key: &[u8; 32]) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| VaultError::Config("invalid AES-256 key length".into()))?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| VaultError::RandomSource(e.to_string()))?;
        let nonce = {
            #[allow(deprecated)]
            aes_gcm::Nonce::from_slice(&nonce_bytes)
        };

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(seal_failure)?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Opens a sealed value. Truncated input, a wrong key and tampered bytes
    /// all report [`VaultError::WrongPassphrase`].
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(VaultError::WrongPassphrase);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = {
            #[allow(deprecated)]
            aes_gcm::Nonce::from_slice(nonce_bytes)
        };

        self.cipher
            .decrypt(nonce, ciphertext)
            .map(Zeroizing::new)
            .map_err(|_| VaultError::WrongPassphrase)
    }
}

fn seal_failure(err: aes_gcm::Error) -> VaultError {
    VaultError::Encryption(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::KdfKind;

    fn cheap_config() -> SecurityConfig {
        SecurityConfig {
            kdf: KdfKind::Argon2id,
            argon2_memory_kib: 64,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_round_trip() {
        let cipher = VaultCipher::new("passphrase", &cheap_config()).unwrap();
        let sealed = cipher.encrypt(b"xprv-material").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + b"xprv-material".len() + TAG_LEN);
        assert_eq!(&cipher.decrypt(&sealed).unwrap()[..], b"xprv-material");
    }

    #[test]
    fn test_nonce_is_fresh() {
        let cipher = VaultCipher::new("passphrase", &cheap_config()).unwrap();
        let a = cipher.encrypt(b"same").unwrap();
        let b = cipher.encrypt(b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_passphrase() {
        let right = VaultCipher::new("right", &cheap_config()).unwrap();
        let wrong = VaultCipher::new("wrong", &cheap_config()).unwrap();
        let sealed = right.encrypt(b"secret").unwrap();
        assert!(matches!(wrong.decrypt(&sealed), Err(VaultError::WrongPassphrase)));
    }

    #[test]
    fn test_tampered_and_short_input() {
        let cipher = VaultCipher::new("p", &cheap_config()).unwrap();
        let mut sealed = cipher.encrypt(b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(cipher.decrypt(&sealed), Err(VaultError::WrongPassphrase)));
        assert!(matches!(cipher.decrypt(&[0u8; 5]), Err(VaultError::WrongPassphrase)));
        assert!(matches!(cipher.decrypt(&[]), Err(VaultError::WrongPassphrase)));
    }

    #[test]
    fn test_seal_failure_is_not_a_storage_error() {
        let err = seal_failure(aes_gcm::Error);
        assert!(matches!(err, VaultError::Encryption(_)));
    }

    #[test]
    fn test_legacy_md5_round_trip() {
        let config = SecurityConfig { kdf: KdfKind::LegacyMd5, ..cheap_config() };
        let cipher = VaultCipher::new("legacy", &config).unwrap();
        let sealed = cipher.encrypt(b"data").unwrap();
        assert_eq!(&cipher.decrypt(&sealed).unwrap()[..], b"data");
    }
}
