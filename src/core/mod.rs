pub mod bip44;
pub mod coins;
pub mod config;
pub mod errors;
pub mod mnemonic;
pub mod wallet_manager;

// 重新导出关键结构
pub use errors::{Result, VaultError};
pub use wallet_manager::{WalletManager, WalletState};
