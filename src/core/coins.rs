//! Supported coin registry.
//!
//! Maps a coin's short name to its SLIP-44 coin type. Iteration follows the
//! `BTreeMap` order of the names so every run derives, stores and logs the
//! coins in the same sequence.

use std::collections::BTreeMap;

/// SLIP-44 coin types shipped with the wallet.
pub const BUILTIN_COINS: &[(&str, u32)] = &[
    ("BTC", 0),
    ("LTC", 2),
    ("DOGE", 3),
    ("DASH", 5),
    ("ETH", 60),
    ("ETC", 61),
    ("BCH", 145),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRegistry {
    coins: BTreeMap<String, u32>,
}

impl CoinRegistry {
    pub fn builtin() -> Self {
        Self::from_map(
            BUILTIN_COINS
                .iter()
                .map(|(name, coin_type)| (name.to_string(), *coin_type))
                .collect(),
        )
    }

    pub fn from_map(coins: BTreeMap<String, u32>) -> Self {
        Self { coins }
    }

    /// Coins in stable name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.coins.iter().map(|(name, coin_type)| (name.as_str(), *coin_type))
    }

    pub fn coin_type(&self, name: &str) -> Option<u32> {
        self.coins.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

impl Default for CoinRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
