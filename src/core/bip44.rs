//! BIP44 HD key derivation
//!
//! Derives one extended key pair per (network, coin) at the account-level
//! external chain:
//!
//! ```text
//! m / 44' / coin_type' / 0' / 0
//! ```
//!
//! The BIP32 math comes from `bitcoin::bip32`. Mainnet keys serialize with
//! `xprv`/`xpub` version bytes, testnet keys with `tprv`/`tpub`.

use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv, Xpub};
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::Network;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::coins::CoinRegistry;
use crate::core::config::{DerivationConfig, TestnetCoinType};
use crate::core::errors::Result;

/// BIP43 purpose level (44').
pub const PURPOSE: u32 = 44;

/// Network a key pair is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChainNetwork {
    Mainnet,
    Testnet,
}

impl ChainNetwork {
    pub const ALL: [ChainNetwork; 2] = [ChainNetwork::Mainnet, ChainNetwork::Testnet];

    pub fn to_bitcoin_network(self) -> Network {
        match self {
            ChainNetwork::Mainnet => Network::Bitcoin,
            ChainNetwork::Testnet => Network::Testnet,
        }
    }
}

impl fmt::Display for ChainNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainNetwork::Mainnet => f.write_str("mainnet"),
            ChainNetwork::Testnet => f.write_str("testnet"),
        }
    }
}

/// BIP44 derivation path structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip44Path {
    /// Coin type, hardened on derivation
    pub coin_type: u32,
    /// Account index, hardened on derivation
    pub account: u32,
    /// Address index (non-hardened)
    pub address_index: u32,
}

impl Bip44Path {
    pub fn new(coin_type: u32) -> Self {
        Self { coin_type, account: 0, address_index: 0 }
    }

    /// Child numbers for `m/44'/coin_type'/account'/address_index`.
    pub fn to_derivation_path(&self) -> Result<DerivationPath> {
        Ok(DerivationPath::from(vec![
            ChildNumber::from_hardened_idx(PURPOSE)?,
            ChildNumber::from_hardened_idx(self.coin_type)?,
            ChildNumber::from_hardened_idx(self.account)?,
            ChildNumber::from_normal_idx(self.address_index)?,
        ]))
    }
}

impl fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}",
            PURPOSE, self.coin_type, self.account, self.address_index
        )
    }
}

/// A derived (private, public, chain code) triple for one coin on one network.
#[derive(Debug, Clone)]
pub struct ExtendedKeyPair {
    pub coin: String,
    pub network: ChainNetwork,
    pub path: Bip44Path,
    xpriv: Xpriv,
    xpub: Xpub,
}

impl ExtendedKeyPair {
    /// Base58 `xprv`/`tprv` string.
    pub fn serialize_private(&self) -> Zeroizing<String> {
        Zeroizing::new(self.xpriv.to_string())
    }

    /// Base58 `xpub`/`tpub` string.
    pub fn serialize_public(&self) -> String {
        self.xpub.to_string()
    }

    /// Public half only.
    pub fn neuter(&self) -> Xpub {
        self.xpub
    }

    /// Chain code, read from the 78-byte BIP32 encoding (bytes 13..45).
    pub fn chain_code(&self) -> [u8; 32] {
        let encoded = self.xpub.encode();
        let mut code = [0u8; 32];
        code.copy_from_slice(&encoded[13..45]);
        code
    }
}

/// Walks BIP44 paths for every coin in a registry.
pub struct KeyDeriver {
    secp: Secp256k1<All>,
    testnet_coin_type: TestnetCoinType,
    shared_testnet_coin_type: u32,
}

impl KeyDeriver {
    pub fn new(config: &DerivationConfig) -> Self {
        Self {
            secp: Secp256k1::new(),
            testnet_coin_type: config.testnet_coin_type,
            shared_testnet_coin_type: config.shared_testnet_coin_type,
        }
    }

    /// Coin type actually used on `network` for a coin registered as `coin_type`.
    pub fn effective_coin_type(&self, network: ChainNetwork, coin_type: u32) -> u32 {
        match (network, self.testnet_coin_type) {
            (ChainNetwork::Testnet, TestnetCoinType::Shared) => self.shared_testnet_coin_type,
            _ => coin_type,
        }
    }

    /// Derives the key pair for one coin on one network.
    pub fn derive_key_pair(
        &self,
        seed: &[u8],
        network: ChainNetwork,
        coin: &str,
        coin_type: u32,
    ) -> Result<ExtendedKeyPair> {
        let path = Bip44Path::new(self.effective_coin_type(network, coin_type));
        let master = Xpriv::new_master(network.to_bitcoin_network(), seed)?;
        let xpriv = master.derive_priv(&self.secp, &path.to_derivation_path()?)?;
        let xpub = Xpub::from_priv(&self.secp, &xpriv);

        debug!(coin = %coin, network = %network, path = %path, "Derived extended key pair");

        Ok(ExtendedKeyPair {
            coin: coin.to_string(),
            network,
            path,
            xpriv,
            xpub,
        })
    }

    /// Derives every (network, coin) pair, mainnet first, coins in registry
    /// order. The first failure aborts the whole batch.
    pub fn derive_all(&self, seed: &[u8], registry: &CoinRegistry) -> Result<Vec<ExtendedKeyPair>> {
        let mut pairs = Vec::with_capacity(registry.len() * ChainNetwork::ALL.len());
        for network in ChainNetwork::ALL {
            for (coin, coin_type) in registry.iter() {
                pairs.push(self.derive_key_pair(seed, network, coin, coin_type)?);
            }
        }
        Ok(pairs)
    }
}
