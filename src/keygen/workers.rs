//! Multi-worker prime search
//!
//! The supervisor (the calling thread) owns the randomness source and
//! pre-draws one starting candidate per worker. Workers race along the
//! wheel from their start; the first prime reported wins, the round token
//! is cancelled and every other worker's progress is dropped.
//!
//! Which worker wins depends on scheduling, so results are not
//! reproducible across runs.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use num_bigint_dig::BigUint;

use super::prime::Candidate;
use crate::error::{SeedKeyError, SeedKeyResult};
use crate::seed::RandomnessSource;
use crate::{log_debug, log_warn};

/// Candidates each worker walks per round before reporting back
pub const WORKER_RANGE: u64 = 100;

/// Shared stop flag polled by workers between candidates
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Failure of a single worker, folded into one `WorkerPoolFailure`
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("worker {index} panicked: {reason}")]
    Panicked { index: usize, reason: String },

    #[error("worker {index} could not report its prime to the supervisor")]
    SupervisorGone { index: usize },
}

struct RoundOutcome {
    winner: Option<BigUint>,
    tested: u64,
    failures: Vec<WorkerError>,
}

/// Bounded pool of prime-search workers
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Race workers until one finds a usable prime of `bits` bits.
    pub fn find_prime<R>(
        &self,
        source: &mut R,
        bits: usize,
        exponent: &BigUint,
        max_candidates: u64,
        cancel: &CancellationToken,
    ) -> SeedKeyResult<BigUint>
    where
        R: RandomnessSource + ?Sized,
    {
        let mut tested = 0u64;
        let mut round = 0u64;

        loop {
            if cancel.is_cancelled() {
                return Err(SeedKeyError::cancelled("key generation was cancelled"));
            }
            if tested >= max_candidates {
                return Err(SeedKeyError::insufficient_randomness(format!(
                    "no {}-bit prime within {} candidates",
                    bits, max_candidates
                )));
            }

            // All draws happen here, in order, on the supervisor thread
            let starts = (0..self.workers)
                .map(|_| Candidate::draw(source, bits))
                .collect::<SeedKeyResult<Vec<_>>>()?;

            round += 1;
            let outcome = self.run_round(starts, exponent, cancel);
            tested += outcome.tested;

            if let Some(prime) = outcome.winner {
                log_debug!("keygen", "worker pool found prime", bits = bits, rounds = round, tested = tested);
                return Ok(prime);
            }

            if !outcome.failures.is_empty() {
                let failed = outcome.failures.len();
                let summary = outcome
                    .failures
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; ");
                if failed == self.workers {
                    return Err(SeedKeyError::worker_pool(format!(
                        "all {} workers failed",
                        failed
                    ))
                    .with_details(summary));
                }
                log_warn!("keygen", "workers failed during round", failed = failed, round = round);
            }
        }
    }

    fn run_round(
        &self,
        starts: Vec<Candidate>,
        exponent: &BigUint,
        cancel: &CancellationToken,
    ) -> RoundOutcome {
        let round_token = CancellationToken::new();

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<BigUint>();

            let handles: Vec<_> = starts
                .into_iter()
                .enumerate()
                .map(|(index, start)| {
                    let tx = tx.clone();
                    let round_token = &round_token;
                    scope.spawn(move || search(index, start, exponent, round_token, cancel, tx))
                })
                .collect();
            drop(tx);

            // Blocks until a prime arrives or every worker has hung up
            let winner = rx.recv().ok();
            round_token.cancel();

            let mut tested = 0u64;
            let mut failures = Vec::new();
            for (index, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(count)) => tested += count,
                    Ok(Err(err)) => failures.push(err),
                    Err(payload) => failures.push(WorkerError::Panicked {
                        index,
                        reason: panic_reason(payload.as_ref()),
                    }),
                }
            }

            RoundOutcome {
                winner,
                tested,
                failures,
            }
        })
    }
}

fn search(
    index: usize,
    mut candidate: Candidate,
    exponent: &BigUint,
    round: &CancellationToken,
    cancel: &CancellationToken,
    tx: mpsc::Sender<BigUint>,
) -> Result<u64, WorkerError> {
    let mut tested = 0u64;
    while tested < WORKER_RANGE {
        if round.is_cancelled() || cancel.is_cancelled() {
            break;
        }
        tested += 1;
        if !candidate.fits() {
            break;
        }
        if candidate.is_usable_prime(exponent) {
            tx.send(candidate.into_value())
                .map_err(|_| WorkerError::SupervisorGone { index })?;
            return Ok(tested);
        }
        candidate.advance();
    }
    Ok(tested)
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
