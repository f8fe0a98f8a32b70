//! Entropy Pool
//!
//! Accumulates sampled bytes until at least [`POOL_READY_LEN`] are present,
//! then hands out a SHA-256 digest of everything collected.
//!
//! SECURITY: the pool buffer is zeroized on drop.

use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Instant;
use zeroize::Zeroize;

use super::sample::EntropySample;
use crate::error::{SeedKeyError, SeedKeyResult};
use crate::{log_debug, log_warn};

/// Minimum pool length before a digest may be taken.
pub const POOL_READY_LEN: usize = 256;

/// Accumulator for user-supplied randomness.
pub struct EntropyPool {
    bytes: Vec<u8>,
    samples: u64,
    started: Instant,
}

impl EntropyPool {
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(POOL_READY_LEN + 16),
            samples: 0,
            started: Instant::now(),
        }
    }

    /// Append one event plus two bytes of arrival-time jitter.
    pub fn sample<E>(&mut self, event: &E)
    where
        E: EntropySample + ?Sized,
    {
        event.write_entropy(&mut self.bytes);
        let jitter = self.started.elapsed().as_nanos() as u16;
        self.bytes.extend_from_slice(&jitter.to_le_bytes());
        self.samples += 1;
    }

    pub fn is_ready(&self) -> bool {
        self.bytes.len() >= POOL_READY_LEN
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of events sampled so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Sample events from `events` until the pool is ready.
    ///
    /// Fails with `InsufficientEntropy` when the feed dries up or
    /// `max_samples` events were not enough.
    pub fn collect_from<I, E>(&mut self, events: I, max_samples: u64) -> SeedKeyResult<()>
    where
        I: IntoIterator<Item = E>,
        E: EntropySample,
    {
        let mut taken = 0u64;
        let mut events = events.into_iter();
        while !self.is_ready() {
            if taken >= max_samples {
                log_warn!("entropy", "sample limit reached before pool was ready", samples = taken);
                return Err(self.not_ready("sample limit reached"));
            }
            let Some(event) = events.next() else {
                return Err(self.not_ready("event feed ended"));
            };
            self.sample(&event);
            taken += 1;
        }
        log_debug!("entropy", "pool ready", samples = self.samples, pool_len = self.bytes.len());
        Ok(())
    }

    /// SHA-256 over the whole pool, 64 lowercase hex chars.
    pub fn digest(&self) -> SeedKeyResult<EntropyDigest> {
        if !self.is_ready() {
            return Err(self.not_ready("digest requested before pool was ready"));
        }
        let hash = Sha256::digest(&self.bytes);
        Ok(EntropyDigest(hex::encode(hash)))
    }

    fn not_ready(&self, msg: &str) -> SeedKeyError {
        SeedKeyError::insufficient_entropy(msg).with_details(format!(
            "have {} of {} bytes",
            self.bytes.len(),
            POOL_READY_LEN
        ))
    }
}

impl Default for EntropyPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EntropyPool {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for EntropyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyPool")
            .field("len", &self.bytes.len())
            .field("samples", &self.samples)
            .finish()
    }
}

/// Hex-encoded SHA-256 of a ready pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyDigest(String);

impl EntropyDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntropyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntropyDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
