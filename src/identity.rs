//! Identity pipeline
//!
//! Glue from an entropy pool to a mnemonic, and from a mnemonic plus
//! configuration to a keypair and address.

use crate::entropy::EntropyPool;
use crate::error::SeedKeyResult;
use crate::keygen::KeyGenerator;
use crate::log_info;
use crate::seed::{make_mnemonic_from_entropy_sha, Mnemonic, SeededPrng};
use crate::types::GeneratedIdentity;
use crate::utils::config::{GenerationConfig, GenerationMode};

/// Mnemonic for a ready pool; `InsufficientEntropy` otherwise.
pub fn mnemonic_from_pool(pool: &EntropyPool) -> SeedKeyResult<Mnemonic> {
    let digest = pool.digest()?;
    // the digest is the mnemonic's entropy; never log it
    log_info!("identity", "entropy digest taken", samples = pool.samples());
    make_mnemonic_from_entropy_sha(digest.as_str())
}

/// Regenerate (or generate) the keypair bound to `mnemonic`.
pub fn generate_identity(mnemonic: &Mnemonic, config: &GenerationConfig) -> SeedKeyResult<GeneratedIdentity> {
    let opts = config.key_gen_options()?;
    let generator = KeyGenerator::new(SeededPrng::new(mnemonic, config.passphrase()));

    match config.mode {
        GenerationMode::Stepwise => generator.generate_keys_in_steps(&opts),
        GenerationMode::Parallel => generator.generate_keys(&opts),
    }
}
