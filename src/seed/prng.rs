//! Seeded Stream Generator
//!
//! ARC4 keystream keyed from a mnemonic and passphrase. The key schedule
//! runs over the 64-byte BIP-39 seed (the phrase salted with the
//! passphrase), then [`WARM_UP_STEPS`] outputs are discarded before the
//! generator is handed to the caller.
//!
//! The output sequence for a given (mnemonic, passphrase) pair is fixed
//! forever; reproducible key generation depends on it.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::mnemonic::Mnemonic;
use super::source::RandomnessSource;
use crate::error::SeedKeyResult;

/// Keystream outputs discarded right after key scheduling
pub const WARM_UP_STEPS: u64 = 300;

/// Bytes per `next_bytes_as_string` block
pub const STRING_BLOCK_LEN: usize = 32;

/// Deterministic byte generator owned by one generation session.
///
/// Not `Clone`; each session owns its state exclusively.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SeededPrng {
    state: [u8; 256],
    i: u8,
    j: u8,
    #[zeroize(skip)]
    draws: u64,
}

impl SeededPrng {
    /// Key the generator from a phrase and passphrase and run the warm-up
    pub fn new(mnemonic: &Mnemonic, passphrase: &str) -> Self {
        let seed = mnemonic.to_seed(passphrase);
        Self::from_key(seed.as_ref())
    }

    /// Key the generator from raw key material (must be non-empty)
    pub(crate) fn from_key(key: &[u8]) -> Self {
        debug_assert!(!key.is_empty());
        let mut state = [0u8; 256];
        for (slot, value) in state.iter_mut().zip(0u8..=255) {
            *slot = value;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
            state.swap(i, j as usize);
        }

        let mut prng = Self {
            state,
            i: 0,
            j: 0,
            draws: 0,
        };
        for _ in 0..WARM_UP_STEPS {
            prng.next();
        }
        prng
    }

    /// Advance the keystream by one byte
    pub fn next(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.state[self.i as usize]);
        self.state.swap(self.i as usize, self.j as usize);
        let t = self.state[self.i as usize].wrapping_add(self.state[self.j as usize]);
        self.draws += 1;
        self.state[t as usize]
    }

    /// Next [`STRING_BLOCK_LEN`] keystream bytes, hex-encoded
    pub fn next_bytes_as_string(&mut self) -> String {
        let mut block = [0u8; STRING_BLOCK_LEN];
        self.fill(&mut block);
        let encoded = hex::encode(block);
        block.zeroize();
        encoded
    }

    /// Fill `out` straight from the keystream. Byte for byte the same stream
    /// that consecutive `next_bytes_as_string` blocks would hex-encode.
    pub fn fill(&mut self, out: &mut [u8]) {
        for byte in out.iter_mut() {
            *byte = self.next();
        }
    }

    /// Keystream steps taken so far, warm-up included
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

/// Key generation reads raw bytes through `fill`, skipping the hex round trip.
impl RandomnessSource for SeededPrng {
    fn draw(&mut self, out: &mut [u8]) -> SeedKeyResult<()> {
        self.fill(out);
        Ok(())
    }
}

impl fmt::Debug for SeededPrng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededPrng")
            .field("draws", &self.draws)
            .finish_non_exhaustive()
    }
}
