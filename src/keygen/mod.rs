//! Key Generation Module
//!
//! RSA keypair generation driven entirely by an injected
//! [`RandomnessSource`]:
//! - stepwise: single-threaded and reproducible for a given source
//! - parallel: a supervisor plus a bounded worker pool racing on primes

mod encode;
mod prime;
mod stepwise;
mod workers;

pub use prime::{miller_rabin_rounds, Candidate, WHEEL_DELTAS};
pub use stepwise::StepwiseKeyGen;
pub use workers::{CancellationToken, WorkerError, WorkerPool, WORKER_RANGE};

use num_bigint_dig::BigUint;

use crate::error::{SeedKeyError, SeedKeyResult};
use crate::seed::RandomnessSource;
use crate::types::GeneratedIdentity;
use crate::utils::config::DEFAULT_MAX_PRIME_CANDIDATES;
use crate::{log_debug, log_info};

/// Fixed public exponent
pub const PUBLIC_EXPONENT: u32 = 65537;

pub const MIN_BITS: usize = 512;
pub const MAX_BITS: usize = 4096;

/// Modulus sizes are multiples of 256 between 512 and 4096.
pub fn validate_bits(bits: usize) -> SeedKeyResult<()> {
    if (MIN_BITS..=MAX_BITS).contains(&bits) && bits % 256 == 0 {
        Ok(())
    } else {
        Err(SeedKeyError::invalid_bit_length(bits))
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerCount {
    /// One worker per available core
    Auto,
    Fixed(usize),
}

impl WorkerCount {
    /// `-1` selects [`WorkerCount::Auto`]; zero and other negatives are rejected.
    pub fn from_option(workers: i64) -> SeedKeyResult<Self> {
        match workers {
            -1 => Ok(WorkerCount::Auto),
            n if n >= 1 => usize::try_from(n)
                .map(WorkerCount::Fixed)
                .map_err(|_| SeedKeyError::invalid_worker_count(n)),
            n => Err(SeedKeyError::invalid_worker_count(n)),
        }
    }

    pub fn resolve(&self) -> usize {
        match self {
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            WorkerCount::Fixed(n) => *n,
        }
    }
}

/// Parameters for one key generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenOptions {
    pub bits: usize,
    pub workers: WorkerCount,
    /// Candidate tests allowed per prime
    pub max_candidates: u64,
}

impl KeyGenOptions {
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            workers: WorkerCount::Auto,
            max_candidates: DEFAULT_MAX_PRIME_CANDIDATES,
        }
    }

    pub fn with_workers(mut self, workers: WorkerCount) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> SeedKeyResult<()> {
        validate_bits(self.bits)?;
        if self.workers == WorkerCount::Fixed(0) {
            return Err(SeedKeyError::invalid_worker_count(0));
        }
        Ok(())
    }
}

/// Owns a randomness source and turns it into one keypair.
///
/// Generation consumes the generator, so a source left half-read by a
/// failed or cancelled run cannot be reused.
pub struct KeyGenerator<R: RandomnessSource> {
    source: R,
}

impl<R: RandomnessSource> KeyGenerator<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Hand out the stepwise state machine for callers that drive it themselves.
    pub fn into_steps(self, opts: &KeyGenOptions) -> SeedKeyResult<StepwiseKeyGen<R>> {
        opts.validate()?;
        Ok(StepwiseKeyGen::new(self.source, opts))
    }

    /// Single-threaded generation; the same source always yields the same keys.
    pub fn generate_keys_in_steps(self, opts: &KeyGenOptions) -> SeedKeyResult<GeneratedIdentity> {
        log_info!("keygen", "stepwise generation started", bits = opts.bits);
        let mut keygen = self.into_steps(opts)?;
        while !keygen.step()? {}
        let steps = keygen.steps();
        let identity = keygen.finish()?;
        log_info!(
            "keygen",
            "stepwise generation finished",
            steps = steps,
            address = identity.address.as_str()
        );
        Ok(identity)
    }

    /// Multi-worker generation. Faster, but not reproducible.
    pub fn generate_keys(self, opts: &KeyGenOptions) -> SeedKeyResult<GeneratedIdentity> {
        self.generate_keys_with_cancellation(opts, &CancellationToken::new())
    }

    pub fn generate_keys_with_cancellation(
        mut self,
        opts: &KeyGenOptions,
        cancel: &CancellationToken,
    ) -> SeedKeyResult<GeneratedIdentity> {
        opts.validate()?;
        let pool = WorkerPool::new(opts.workers.resolve());
        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let q_bits = opts.bits / 2;
        let p_bits = opts.bits - q_bits;

        log_info!(
            "keygen",
            "parallel generation started",
            bits = opts.bits,
            workers = pool.workers()
        );

        let p = pool.find_prime(&mut self.source, p_bits, &exponent, opts.max_candidates, cancel)?;
        let q = loop {
            let q = pool.find_prime(&mut self.source, q_bits, &exponent, opts.max_candidates, cancel)?;
            if q != p && (&p * &q).bits() == opts.bits {
                break q;
            }
            log_debug!("keygen", "second prime rejected, searching again", bits = q_bits);
        };
        let (p, q) = if p < q { (q, p) } else { (p, q) };

        let key = encode::assemble(p, q, &exponent)?;
        let identity = encode::export(&key)?;
        log_info!(
            "keygen",
            "parallel generation finished",
            address = identity.address.as_str()
        );
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::seed::SeededPrng;
    use rsa::traits::PublicKeyParts;

    #[test]
    fn test_validate_bits() {
        assert!(validate_bits(512).is_ok());
        assert!(validate_bits(2048).is_ok());
        assert!(validate_bits(4096).is_ok());
        for bits in [0, 256, 1000, 4352, 8192] {
            assert_eq!(validate_bits(bits).unwrap_err().code, ErrorCode::InvalidBitLength);
        }
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(WorkerCount::from_option(-1).unwrap(), WorkerCount::Auto);
        assert_eq!(WorkerCount::from_option(3).unwrap(), WorkerCount::Fixed(3));
        assert_eq!(
            WorkerCount::from_option(0).unwrap_err().code,
            ErrorCode::InvalidWorkerCount
        );
        assert_eq!(
            WorkerCount::from_option(-2).unwrap_err().code,
            ErrorCode::InvalidWorkerCount
        );
        assert!(WorkerCount::Auto.resolve() >= 1);
    }

    #[test]
    fn test_stepwise_is_reproducible() {
        let opts = KeyGenOptions::new(512);
        let a = KeyGenerator::new(SeededPrng::from_key(b"repro"))
            .generate_keys_in_steps(&opts)
            .unwrap();
        let b = KeyGenerator::new(SeededPrng::from_key(b"repro"))
            .generate_keys_in_steps(&opts)
            .unwrap();
        assert_eq!(a.public_key, b.public_key);
        assert_eq!(a.private_key, b.private_key);
        assert_eq!(a.address, b.address);

        let c = KeyGenerator::new(SeededPrng::from_key(b"other"))
            .generate_keys_in_steps(&opts)
            .unwrap();
        assert_ne!(a.public_key, c.public_key);
    }

    #[test]
    fn test_parallel_generates_valid_key() {
        let opts = KeyGenOptions::new(512).with_workers(WorkerCount::Fixed(3));
        let identity = KeyGenerator::new(SeededPrng::from_key(b"parallel"))
            .generate_keys(&opts)
            .unwrap();
        let key = identity.rsa_private_key().unwrap();
        assert_eq!(key.n().bits(), 512);
        assert_eq!(key.e(), &BigUint::from(PUBLIC_EXPONENT));
        assert!(key.validate().is_ok());
    }

    #[test]
    fn test_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let err = KeyGenerator::new(SeededPrng::from_key(b"cancel"))
            .generate_keys_with_cancellation(&KeyGenOptions::new(512), &token)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Cancelled);
    }

    #[test]
    fn test_cancel_during_parallel_run() {
        let token = CancellationToken::new();
        let opts = KeyGenOptions::new(4096).with_workers(WorkerCount::Fixed(2));
        let started = std::time::Instant::now();
        let result = std::thread::scope(|scope| {
            let remote = token.clone();
            scope.spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(50));
                remote.cancel();
            });
            KeyGenerator::new(SeededPrng::from_key(b"cancel mid-run"))
                .generate_keys_with_cancellation(&opts, &token)
        });
        assert_eq!(result.unwrap_err().code, ErrorCode::Cancelled);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_bad_options_before_drawing() {
        let err = KeyGenerator::new(SeededPrng::from_key(b"bits"))
            .generate_keys(&KeyGenOptions::new(1000))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBitLength);

        let opts = KeyGenOptions::new(512).with_workers(WorkerCount::Fixed(0));
        let err = KeyGenerator::new(SeededPrng::from_key(b"workers"))
            .generate_keys_in_steps(&opts)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWorkerCount);
    }
}
