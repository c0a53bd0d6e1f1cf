//! 备份和导出模块
//!
//! Backup returns the stored seed phrase; export returns every public
//! extended key. Both are read-only.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use super::WalletManager;
use crate::core::bip44::ChainNetwork;
use crate::core::errors::{Result, VaultError};
use crate::core::mnemonic::SeedPhrase;
use crate::storage::records::{export_name, kind_prefix, KeyKind};

impl WalletManager {
    /// 备份wallet（导出mnemonic）
    ///
    /// # Errors
    /// * `VaultError::NoWallet` - No seed record, or it decrypts to nothing
    /// * `VaultError::WrongPassphrase` - The seed record does not open
    pub fn backup(&self, passphrase: &str) -> Result<SeedPhrase> {
        info!("Backing up seed phrase");
        let cipher = self.cipher(passphrase)?;
        self.unlock(&cipher)
    }

    /// Decrypts every public record on both networks.
    ///
    /// Keys of the returned map drop the kind marker (`main:pub:BTC` becomes
    /// `main:BTC`); values are the base58 xpub/tpub strings. One record that
    /// fails to open aborts the whole export.
    pub fn export(&self, passphrase: &str) -> Result<BTreeMap<String, String>> {
        info!("Exporting public keys");
        let cipher = self.cipher(passphrase)?;
        self.unlock(&cipher)?;

        let mut exported = BTreeMap::new();
        for network in ChainNetwork::ALL {
            for (key, sealed) in self.store.scan_prefix(&kind_prefix(network, KeyKind::Public))? {
                let name = export_name(&key, network, KeyKind::Public).ok_or_else(|| {
                    VaultError::Storage("public record key is not valid UTF-8".into())
                })?;
                let plain = cipher.decrypt(&sealed)?;
                let xpub = String::from_utf8(plain.to_vec())
                    .map_err(|_| VaultError::Storage(format!("record {} is not valid UTF-8", name)))?;
                exported.insert(name, xpub);
            }
        }

        debug!(count = exported.len(), "Public keys decrypted");
        Ok(exported)
    }
}

/// Writes an export map as JSON indented with four spaces.
pub fn write_export_json<W: Write>(writer: W, exported: &BTreeMap<String, String>) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    exported.serialize(&mut serializer)?;
    Ok(())
}
