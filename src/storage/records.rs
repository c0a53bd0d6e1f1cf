//! Record key layout inside the vault tree.
//!
//! ```text
//! mk                      encrypted seed phrase (wallet sentinel)
//! main:prv:BTC            encrypted mainnet xprv for BTC
//! test:pub:ETH            encrypted testnet xpub for ETH
//! ```

use crate::core::bip44::ChainNetwork;

/// Key of the encrypted seed phrase; its presence means a wallet exists.
pub const SEED_KEY: &[u8] = b"mk";

pub const MAINNET_MARKER: &str = "main:";
pub const TESTNET_MARKER: &str = "test:";

/// Which half of an extended key pair a record holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Private,
    Public,
}

impl KeyKind {
    pub fn marker(self) -> &'static str {
        match self {
            KeyKind::Private => "prv:",
            KeyKind::Public => "pub:",
        }
    }
}

pub fn network_marker(network: ChainNetwork) -> &'static str {
    match network {
        ChainNetwork::Mainnet => MAINNET_MARKER,
        ChainNetwork::Testnet => TESTNET_MARKER,
    }
}

/// `{network}{kind}{coin}`, e.g. `main:pub:BTC`.
pub fn key_record(network: ChainNetwork, kind: KeyKind, coin: &str) -> Vec<u8> {
    format!("{}{}{}", network_marker(network), kind.marker(), coin).into_bytes()
}

/// Prefix shared by every record of one kind on one network.
pub fn kind_prefix(network: ChainNetwork, kind: KeyKind) -> Vec<u8> {
    format!("{}{}", network_marker(network), kind.marker()).into_bytes()
}

/// Drops the kind marker: `main:pub:BTC` becomes `main:BTC`.
///
/// Returns `None` for keys that are not key-pair records.
pub fn export_name(record_key: &[u8], network: ChainNetwork, kind: KeyKind) -> Option<String> {
    let prefix = kind_prefix(network, kind);
    let coin = record_key.strip_prefix(prefix.as_slice())?;
    let coin = std::str::from_utf8(coin).ok()?;
    Some(format!("{}{}", network_marker(network), coin))
}
