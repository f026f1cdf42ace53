//! Command line tool to derive ZooBC account addresses and sign payloads from a mnemonic.
//!
//! ```text
//! zoobc-slip10 --mnemonic "<words>" address
//! zoobc-slip10 --mnemonic "<words>" --account 2 sign --payload 0101010101
//! zoobc-slip10 --mnemonic "<words>" --path "m/44'/883'/0'/1'" address
//! ```

use std::error::Error;

use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use tracing_subscriber::EnvFilter;

use zoobc_slip10::{
    account_path, derive_for_path, seed_from_mnemonic, ExtendedSecretKey, DEFAULT_PASSPHRASE,
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "ZooBC ed25519 account keys from a mnemonic")]
struct Opts {
    /// The mnemonic phrase, words are not checked against a word list.
    #[clap(short, long)]
    mnemonic: String,

    /// Optional passphrase mixed into the seed.
    #[clap(long)]
    passphrase: Option<String>,

    /// Index of the ZooBC account, derived under m/44'/883'/<account>'.
    #[clap(short, long, default_value = "0", conflicts_with = "path")]
    account: u32,

    /// Full hardened derivation path, overrides the account index.
    #[clap(short, long)]
    path: Option<String>,

    /// Log level (error, warn, info, debug, trace), `RUST_LOG` is used when not set.
    #[clap(long)]
    log_level: Option<LevelFilter>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the account address.
    Address,
    /// Sign a payload and print the typed signature as hex.
    Sign {
        /// The payload to sign, hex encoded.
        #[clap(long)]
        payload: String,
    },
}

impl Opts {
    fn derivation_path(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => account_path(self.account),
        }
    }

    fn key(&self) -> Result<ExtendedSecretKey, zoobc_slip10::Error> {
        let passphrase = self.passphrase.as_deref().unwrap_or(DEFAULT_PASSPHRASE);
        let seed = seed_from_mnemonic(&self.mnemonic, passphrase);
        let path = self.derivation_path();
        debug!("using derivation path {}", path);
        Ok(derive_for_path(&path, &seed)?)
    }
}

/// Install the log output on stderr, records from the `log` macros are forwarded to it.
fn init_logger(level: Option<LevelFilter>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = match level {
        Some(level) => EnvFilter::new(level.to_string().to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = Opts::parse();
    init_logger(opts.log_level)?;
    let key = opts.key()?;

    match &opts.command {
        Command::Address => println!("{}", key.serialize()?),
        Command::Sign { payload } => {
            let payload = hex::decode(payload)?;
            let signature = key.sign(&payload)?;
            println!("{}", signature);
        }
    }
    Ok(())
}
