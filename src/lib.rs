//! SeedKey Core Library
//!
//! Deterministic RSA identities recoverable from a 12-word mnemonic.
//!
//! # Architecture
//!
//! This crate provides:
//! - **entropy**: Pool of user-supplied randomness and its SHA-256 digest
//! - **seed**: BIP-39 mnemonic codec and the keystream seeded from it
//! - **keygen**: RSA prime search, stepwise and multi-worker
//! - **address**: SHA-224 addresses over the public key PEM
//! - **identity**: Pool -> mnemonic -> keypair pipeline
//!
//! # Security
//!
//! Entropy pools, keystream state and private key PEMs are zeroized on
//! drop and redacted from `Debug` output and logs.
//!
//! # Example
//!
//! ```rust,ignore
//! use seedkey::{generate_identity, GenerationConfig, Mnemonic};
//!
//! let mnemonic = Mnemonic::parse("deposit panther indicate desert tunnel lizard can vital stadium wink setup moment")?;
//! let identity = generate_identity(&mnemonic, &GenerationConfig::reproducible())?;
//! println!("Address: {}", identity.address);
//! ```

pub mod address;
pub mod entropy;
pub mod error;
pub mod identity;
pub mod keygen;
pub mod seed;
pub mod types;
pub mod utils;

// Re-export key types for convenience
pub use address::{derive_address, Address, ADDRESS_LEN};
pub use error::{ErrorCode, SeedKeyError, SeedKeyResult};
pub use identity::{generate_identity, mnemonic_from_pool};
pub use keygen::{CancellationToken, KeyGenOptions, KeyGenerator, StepwiseKeyGen, WorkerCount};
pub use seed::{
    entropy_to_mnemonic, make_mnemonic_from_entropy_sha, mnemonic_to_entropy, Mnemonic,
    RandomnessSource, SeededPrng,
};
pub use types::GeneratedIdentity;
pub use utils::config::{GenerationConfig, GenerationMode};
