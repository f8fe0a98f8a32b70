//! Injectable randomness for key generation
//!
//! Key generation never reaches for an ambient RNG; it draws every byte
//! through this trait from a source it owns.

use crate::error::SeedKeyResult;

/// A byte stream the key generator can draw from.
pub trait RandomnessSource: Send {
    /// Fill `out` entirely or fail with `InsufficientRandomness`.
    fn draw(&mut self, out: &mut [u8]) -> SeedKeyResult<()>;
}

impl<R: RandomnessSource + ?Sized> RandomnessSource for Box<R> {
    fn draw(&mut self, out: &mut [u8]) -> SeedKeyResult<()> {
        (**self).draw(out)
    }
}
