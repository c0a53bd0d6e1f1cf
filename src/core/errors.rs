use thiserror::Error;

/// Every failure a vault operation can surface.
///
/// The set is closed: callers match on the variant instead of inspecting
/// message text. Decryption failures are deliberately collapsed into
/// [`VaultError::WrongPassphrase`] so a caller cannot tell a bad
/// passphrase from tampered ciphertext.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Supplied seed phrase has the wrong word count or fails BIP-39 checks.
    #[error("Invalid seed phrase: {0}")]
    InvalidPhrase(String),

    /// Create/import without `force` against a wallet that already exists.
    #[error("wallet already exists")]
    WalletExists,

    /// Authenticated decryption failed.
    #[error("wrong password")]
    WrongPassphrase,

    /// Backup/export against a store with no seed record.
    #[error("no wallet found, create or import one first")]
    NoWallet,

    /// Sealing a record failed. Opening failures are never reported here.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The embedded store failed to open, read or commit.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The OS random source could not be read.
    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    /// Requested entropy size is not valid for BIP-39.
    #[error("Invalid entropy size: {0} bits")]
    Entropy(usize),

    /// A BIP-32 derivation step failed.
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or output failure outside the store.
    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl VaultError {
    /// True when the operation stopped because it would have destroyed an
    /// existing wallet without an explicit `force`.
    pub fn is_destructive_guard(&self) -> bool {
        matches!(self, VaultError::WalletExists)
    }
}

impl From<sled::Error> for VaultError {
    fn from(err: sled::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Io(err.to_string())
    }
}

impl From<bitcoin::bip32::Error> for VaultError {
    fn from(err: bitcoin::bip32::Error) -> Self {
        VaultError::KeyDerivation(err.to_string())
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_wallet_exists() {
        assert_eq!(VaultError::WalletExists.to_string(), "wallet already exists");
    }

    #[test]
    fn test_display_storage_error() {
        let err = VaultError::Storage("DB failure".to_string());
        assert_eq!(format!("{}", err), "Storage error: DB failure");
    }

    #[test]
    fn test_display_encryption_error() {
        let err = VaultError::Encryption("aead::Error".to_string());
        assert_eq!(err.to_string(), "Encryption error: aead::Error");
    }

    #[test]
    fn test_display_entropy_error() {
        assert_eq!(VaultError::Entropy(100).to_string(), "Invalid entropy size: 100 bits");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: VaultError = io.into();
        match err {
            VaultError::Io(msg) => assert_eq!(msg, "denied"),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_only_wallet_exists_guards_destruction() {
        assert!(VaultError::WalletExists.is_destructive_guard());
        assert!(!VaultError::WrongPassphrase.is_destructive_guard());
        assert!(!VaultError::NoWallet.is_destructive_guard());
    }
}
