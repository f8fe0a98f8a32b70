//! Stepwise key generation
//!
//! A single-threaded state machine advanced one unit of work per
//! [`StepwiseKeyGen::step`]: either one candidate draw from the source or one
//! candidate test. The sequence of draws depends only on the source, so a
//! given seed always yields the same primes.

use num_bigint_dig::BigUint;

use super::encode;
use super::prime::Candidate;
use super::{KeyGenOptions, PUBLIC_EXPONENT};
use crate::error::{SeedKeyError, SeedKeyResult};
use crate::log_debug;
use crate::seed::RandomnessSource;
use crate::types::GeneratedIdentity;

enum Phase {
    SearchP,
    SearchQ { p: BigUint },
    Done { p: BigUint, q: BigUint },
}

/// Resumable RSA key generation over an owned randomness source
pub struct StepwiseKeyGen<R: RandomnessSource> {
    source: R,
    bits: usize,
    exponent: BigUint,
    max_candidates: u64,
    phase: Phase,
    candidate: Option<Candidate>,
    tested: u64,
    steps: u64,
}

impl<R: RandomnessSource> StepwiseKeyGen<R> {
    pub(crate) fn new(source: R, opts: &KeyGenOptions) -> Self {
        Self {
            source,
            bits: opts.bits,
            exponent: BigUint::from(PUBLIC_EXPONENT),
            max_candidates: opts.max_candidates,
            phase: Phase::SearchP,
            candidate: None,
            tested: 0,
            steps: 0,
        }
    }

    /// Do one unit of work; `Ok(true)` once both primes are settled.
    pub fn step(&mut self) -> SeedKeyResult<bool> {
        if matches!(self.phase, Phase::Done { .. }) {
            return Ok(true);
        }
        self.steps += 1;

        let prime_bits = match self.phase {
            Phase::SearchP => self.bits - self.bits / 2,
            _ => self.bits / 2,
        };

        let Some(candidate) = self.candidate.as_mut() else {
            self.candidate = Some(Candidate::draw(&mut self.source, prime_bits)?);
            return Ok(false);
        };

        // Overflowed candidates count against the budget too
        self.tested += 1;
        if self.tested > self.max_candidates {
            return Err(SeedKeyError::insufficient_randomness(format!(
                "no {}-bit prime within {} candidates",
                prime_bits, self.max_candidates
            )));
        }

        if !candidate.fits() {
            self.candidate = None;
            return Ok(false);
        }

        if !candidate.is_usable_prime(&self.exponent) {
            candidate.advance();
            return Ok(false);
        }

        let Some(found) = self.candidate.take() else {
            return Ok(false);
        };
        let found = found.into_value();
        log_debug!("keygen", "prime found", bits = prime_bits, tested = self.tested, steps = self.steps);
        self.tested = 0;

        self.phase = match std::mem::replace(&mut self.phase, Phase::SearchP) {
            Phase::SearchP => Phase::SearchQ { p: found },
            Phase::SearchQ { p } => {
                if p == found || (&p * &found).bits() != self.bits {
                    Phase::SearchQ { p }
                } else if p < found {
                    Phase::Done { p: found, q: p }
                } else {
                    Phase::Done { p, q: found }
                }
            }
            done @ Phase::Done { .. } => done,
        };

        Ok(matches!(self.phase, Phase::Done { .. }))
    }

    /// Units of work done so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done { .. })
    }

    /// Assemble and encode the keypair once `step` has returned `true`
    pub fn finish(self) -> SeedKeyResult<GeneratedIdentity> {
        match self.phase {
            Phase::Done { p, q } => {
                let key = encode::assemble(p, q, &self.exponent)?;
                encode::export(&key)
            }
            _ => Err(SeedKeyError::internal("key generation has not finished")),
        }
    }
}
