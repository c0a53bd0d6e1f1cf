use anyhow::{Context, Result};
use clap::Parser;
use cold_wallet::cli::{Cli, Commands};
use cold_wallet::core::config::WalletConfig;
use cold_wallet::core::wallet_manager::write_export_json;
use cold_wallet::core::WalletManager;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zeroize::Zeroizing;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = WalletConfig::load(cli.home.as_deref(), cli.config.as_deref())
        .context("failed to load configuration")?;
    config.ensure_data_dir().context("failed to prepare data directory")?;

    let manager = WalletManager::open(&config).with_context(|| {
        format!("failed to open vault at {}", config.storage.db_path().display())
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Create { passphrase } => {
            let passphrase = resolve_passphrase(passphrase)?;
            let phrase = manager.create(&passphrase, cli.force)?;
            writeln!(out, "{}", phrase.as_str())?;
        }
        Commands::Import { mnemonic, passphrase } => {
            let mnemonic = Zeroizing::new(mnemonic);
            let passphrase = resolve_passphrase(passphrase)?;
            manager.import(&mnemonic, &passphrase, cli.force)?;
            writeln!(out, "imported")?;
        }
        Commands::Export { passphrase } => {
            let passphrase = resolve_passphrase(passphrase)?;
            let exported = manager.export(&passphrase)?;
            write_export_json(&mut out, &exported)?;
            writeln!(out)?;
        }
        Commands::Backup { passphrase } => {
            let passphrase = resolve_passphrase(passphrase)?;
            let phrase = manager.backup(&passphrase)?;
            writeln!(out, "{}", phrase.as_str())?;
        }
        Commands::Status => {
            writeln!(out, "{}", manager.status()?)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Argument (or `COLD_WALLET_PASSPHRASE`, filled in by clap), else one line
/// from stdin.
fn resolve_passphrase(arg: Option<String>) -> Result<Zeroizing<String>> {
    if let Some(passphrase) = arg {
        return Ok(Zeroizing::new(passphrase));
    }

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read passphrase from stdin")?;
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}
