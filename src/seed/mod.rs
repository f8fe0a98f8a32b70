//! Seed Module
//!
//! Mnemonic encoding and the deterministic keystream derived from a
//! mnemonic and passphrase.

mod mnemonic;
mod prng;
mod source;

pub use mnemonic::*;
pub use prng::*;
pub use source::*;
