//! Entropy Module
//!
//! Turns noisy user events into a fixed-size pool and a SHA-256 digest
//! that seeds mnemonic generation.

mod pool;
mod sample;

pub use pool::*;
pub use sample::*;
