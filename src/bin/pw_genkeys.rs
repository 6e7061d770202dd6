// src/bin/pw_genkeys.rs
//! Generate a new key pair into the configured stores and self-test it

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use encrypted_pw_vault::config::{self, Config};
use encrypted_pw_vault::consts::MSG_VALIDITY_OK;
use encrypted_pw_vault::crypto::{RsaProvider, RsaSettings};
use encrypted_pw_vault::store::SqliteKeyStore;
use encrypted_pw_vault::KeyGenerator;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pw-genkeys")]
#[command(about = "Append a new RSA key pair to the key stores and self-test it", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to $EPV_CONFIG or the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Private key store, overriding the configuration
    #[arg(long, value_name = "FILE")]
    privkey: Option<String>,

    /// Public key store, overriding the configuration
    #[arg(long, value_name = "FILE")]
    pubkey: Option<String>,
}

fn load(args: &Args) -> Result<Config> {
    let mut conf = match &args.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => config::load().context("failed to load configuration")?,
    };

    if let Some(file) = &args.privkey {
        conf.keys.private_key_file = Some(file.clone());
    }
    if let Some(file) = &args.pubkey {
        conf.keys.public_key_file = Some(file.clone());
    }

    Ok(conf)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let conf = load(&args)?;

    info!(
        bits = conf.crypto.key_bits,
        padding = ?conf.crypto.padding,
        "encrypted-pw-vault key generation"
    );

    let store = SqliteKeyStore::new(conf.store.passphrase.clone());
    let provider = Arc::new(RsaProvider::new(store, RsaSettings::from(&conf.crypto)));
    let generator = KeyGenerator::new(provider, conf.keys.clone());

    let diagnostics = generator.gen_keys();
    for line in diagnostics.iter() {
        println!("{line}");
    }

    Ok(if diagnostics.contains(MSG_VALIDITY_OK) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
