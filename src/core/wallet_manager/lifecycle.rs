//! Wallet lifecycle management
//!
//! Creation and import share one path: check for an existing wallet, derive
//! every key pair, seal everything and commit it in a single write.

use super::{open_seed_record, WalletManager, WalletState};
use crate::core::bip44::ChainNetwork;
use crate::core::errors::{Result, VaultError};
use crate::core::mnemonic::{self, SeedPhrase};
use crate::crypto::VaultCipher;
use crate::storage::records::{key_record, KeyKind, SEED_KEY};
use tracing::{debug, info, warn};

impl WalletManager {
    /// Create a new wallet from a freshly generated seed phrase
    ///
    /// # Arguments
    /// * `passphrase` - Encrypts every record; never stored
    /// * `force` - Replace an existing wallet
    ///
    /// # Returns
    /// The new phrase. The caller shows it to the user once; nothing here
    /// keeps a copy.
    ///
    /// # Errors
    /// * `VaultError::WalletExists` - A wallet is present and `force` is false
    /// * `VaultError::WrongPassphrase` - Without `force`, the existing seed
    ///   record does not open under `passphrase`
    pub fn create(&self, passphrase: &str, force: bool) -> Result<SeedPhrase> {
        info!(force, "Creating wallet");

        let cipher = self.cipher(passphrase)?;
        self.ensure_replaceable(&cipher, force)?;

        let phrase = mnemonic::generate(self.entropy_bits)?;
        self.store_wallet(&cipher, &phrase, force)?;

        info!(coins = self.registry.len(), "Wallet created");
        Ok(phrase)
    }

    /// Import a wallet from a user-supplied 12-word phrase
    ///
    /// The phrase is validated before the store is touched. Existence and
    /// `force` rules match [`WalletManager::create`].
    pub fn import(&self, phrase: &str, passphrase: &str, force: bool) -> Result<()> {
        info!(force, "Importing wallet");

        let phrase = mnemonic::validate(phrase)?;
        let cipher = self.cipher(passphrase)?;
        self.ensure_replaceable(&cipher, force)?;

        self.store_wallet(&cipher, &phrase, force)?;

        info!(coins = self.registry.len(), "Wallet imported");
        Ok(())
    }

    /// Reports whether a seed record exists. Needs no passphrase.
    pub fn status(&self) -> Result<WalletState> {
        match self.store.get(SEED_KEY)? {
            Some(bytes) if !bytes.is_empty() => Ok(WalletState::Present),
            _ => Ok(WalletState::NoWallet),
        }
    }

    /// Fails unless the store may be (re)written. Checked once up front to
    /// skip derivation, and again inside the write that commits.
    fn ensure_replaceable(&self, cipher: &VaultCipher, force: bool) -> Result<()> {
        if force {
            return Ok(());
        }
        check_replaceable(cipher, self.store.get(SEED_KEY)?)
    }

    /// Derives, seals and commits the whole wallet in one write.
    fn store_wallet(&self, cipher: &VaultCipher, phrase: &SeedPhrase, force: bool) -> Result<()> {
        let seed = mnemonic::derive_seed(phrase)?;
        let pairs = self.deriver.derive_all(&seed[..], &self.registry)?;

        let written = self.store.write(|txn| {
            if force {
                txn.truncate()?;
                warn!("Force flag set, existing vault records are being replaced");
            } else {
                check_replaceable(cipher, txn.get(SEED_KEY)?)?;
            }

            for pair in &pairs {
                let private = cipher.encrypt(pair.serialize_private().as_bytes())?;
                let public = cipher.encrypt(pair.serialize_public().as_bytes())?;
                txn.put(key_record(pair.network, KeyKind::Private, &pair.coin), private);
                txn.put(key_record(pair.network, KeyKind::Public, &pair.coin), public);
            }
            txn.put(SEED_KEY, cipher.encrypt(phrase.as_bytes())?);

            Ok(pairs.len() * 2 + 1)
        })?;

        debug!(
            records = written,
            mainnet = pairs.iter().filter(|p| p.network == ChainNetwork::Mainnet).count(),
            testnet = pairs.iter().filter(|p| p.network == ChainNetwork::Testnet).count(),
            "Vault records committed"
        );
        Ok(())
    }
}

fn check_replaceable(cipher: &VaultCipher, sealed_seed: Option<Vec<u8>>) -> Result<()> {
    match open_seed_record(cipher, sealed_seed) {
        Ok(_) => Err(VaultError::WalletExists),
        Err(VaultError::NoWallet) => Ok(()),
        Err(e) => Err(e),
    }
}
