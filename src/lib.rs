// src/lib.rs

pub mod cli;
pub mod core;
pub mod crypto;
pub mod storage;

pub use crate::core::{VaultError, WalletManager, WalletState};
