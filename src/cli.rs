use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::HOME_ENV;

/// Environment variable consulted when a passphrase argument is omitted.
pub const PASSPHRASE_ENV: &str = "COLD_WALLET_PASSPHRASE";

/// Offline cold wallet: encrypted multi-chain key vault
#[derive(Debug, Parser)]
#[command(name = "wallet-cli", version, about = "Offline cold wallet key vault", disable_help_subcommand = true)]
pub struct Cli {
    /// Replace an existing wallet (destroys every stored record)
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Data directory holding the vault and config.toml
    #[arg(long, global = true, env = HOME_ENV)]
    pub home: Option<PathBuf>,

    /// Explicit config file, overrides `{home}/config.toml`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new wallet and print its seed phrase once
    #[command(visible_alias = "c")]
    Create {
        #[arg(env = PASSPHRASE_ENV, hide_env_values = true)]
        passphrase: Option<String>,
    },
    /// Restore a wallet from a 12-word seed phrase
    #[command(visible_alias = "restore")]
    Import {
        /// Quoted 12-word phrase
        mnemonic: String,
        #[arg(env = PASSPHRASE_ENV, hide_env_values = true)]
        passphrase: Option<String>,
    },
    /// Print every public extended key as JSON
    #[command(visible_alias = "e")]
    Export {
        #[arg(env = PASSPHRASE_ENV, hide_env_values = true)]
        passphrase: Option<String>,
    },
    /// Print the stored seed phrase
    Backup {
        #[arg(env = PASSPHRASE_ENV, hide_env_values = true)]
        passphrase: Option<String>,
    },
    /// Print whether a wallet is present
    Status,
}
