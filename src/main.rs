//! `seedkey` binary: entropy collection, mnemonic derivation, key
//! regeneration and address lookup.

mod cli;

use std::fs;
use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Parser;

use seedkey::entropy::{Coordinates, EntropyPool};
use seedkey::utils::config::{GenerationConfig, GenerationMode};
use seedkey::utils::logging::enable_debug;
use seedkey::{
    derive_address, generate_identity, log_warn, make_mnemonic_from_entropy_sha, mnemonic_from_pool,
    Mnemonic,
};

use cli::{AddressArgs, Commands, EntropyArgs, KeysArgs, MnemonicArgs, SeedKeyCli};

fn main() -> Result<()> {
    let cli = SeedKeyCli::parse();
    if cli.verbose {
        enable_debug();
    }

    match cli.command {
        Commands::Entropy(args) => run_entropy(args),
        Commands::Mnemonic(args) => run_mnemonic(args),
        Commands::Keys(args) => run_keys(args),
        Commands::Address(args) => run_address(args),
    }
}

fn run_entropy(args: EntropyArgs) -> Result<()> {
    let stdin = io::stdin();
    let events = stdin
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .filter_map(|line| {
            let parsed = Coordinates::parse_line(&line);
            if parsed.is_none() && !line.trim().is_empty() {
                log_warn!("cli", "skipping malformed coordinate line");
            }
            parsed
        });

    let max_samples = args
        .max_samples
        .unwrap_or(GenerationConfig::default().max_entropy_samples);
    let mut pool = EntropyPool::new();
    pool.collect_from(events, max_samples)
        .context("not enough pointer movement to seed a mnemonic")?;

    let digest = pool.digest()?;
    let mnemonic = mnemonic_from_pool(&pool)?;
    println!("Entropy digest: {}", digest);
    println!("Mnemonic: {}", mnemonic);
    Ok(())
}

fn run_mnemonic(args: MnemonicArgs) -> Result<()> {
    let mnemonic = make_mnemonic_from_entropy_sha(&args.digest)?;
    println!("{}", mnemonic);
    Ok(())
}

fn run_keys(args: KeysArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GenerationConfig::from_json(&json)?
        }
        None => GenerationConfig::standard(),
    };
    if let Some(bits) = args.bits {
        config = config.with_bits(bits);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if args.steps {
        config = config.with_mode(GenerationMode::Stepwise);
    }
    if let Some(passphrase) = args.passphrase {
        config = config.with_passphrase(passphrase);
    }
    config.validate()?;

    for warning in config.warnings() {
        eprintln!("{}", warning);
    }

    let mnemonic = Mnemonic::parse(&args.mnemonic)?;
    let identity = generate_identity(&mnemonic, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
    } else {
        println!("{}", identity.public_key);
        println!("{}", identity.private_key);
        println!("Address: {}", identity.address);
    }
    Ok(())
}

fn run_address(args: AddressArgs) -> Result<()> {
    let pem = fs::read_to_string(&args.public_key)
        .with_context(|| format!("failed to read {}", args.public_key.display()))?;
    // Exported PEMs carry no trailing newline; files usually do
    println!("{}", derive_address(pem.trim_end()));
    Ok(())
}
