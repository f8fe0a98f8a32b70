//! Command-line interface for the `seedkey` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Deterministic RSA identities from a 12-word mnemonic.
#[derive(Parser, Debug)]
#[command(name = "seedkey", version, propagate_version = true)]
pub struct SeedKeyCli {
    /// Emit debug logs on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect `x y` pointer coordinates from stdin and print a fresh mnemonic.
    Entropy(EntropyArgs),
    /// Turn an entropy digest (hex) into a mnemonic.
    Mnemonic(MnemonicArgs),
    /// Regenerate the RSA keypair and address bound to a mnemonic.
    Keys(KeysArgs),
    /// Print the address of a PEM public key file.
    Address(AddressArgs),
}

#[derive(Args, Debug)]
pub struct EntropyArgs {
    /// Give up after this many coordinate lines
    #[arg(long)]
    pub max_samples: Option<u64>,
}

#[derive(Args, Debug)]
pub struct MnemonicArgs {
    /// Hex digest, at least 32 characters
    #[arg(long)]
    pub digest: String,
}

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// The 12-word phrase, quoted
    #[arg(long)]
    pub mnemonic: String,

    /// Salt mixed into the seeded stream
    #[arg(long, env = "SEEDKEY_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Modulus size; a multiple of 256 between 512 and 4096
    #[arg(long)]
    pub bits: Option<usize>,

    /// Worker threads for parallel generation, -1 for every core
    #[arg(long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Use the single-threaded reproducible path
    #[arg(long)]
    pub steps: bool,

    /// Print the identity as JSON
    #[arg(long)]
    pub json: bool,

    /// JSON generation config; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// SPKI PEM file
    #[arg(long)]
    pub public_key: PathBuf,
}
