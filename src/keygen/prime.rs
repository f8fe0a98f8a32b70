//! Prime candidate search
//!
//! Candidates are drawn from the injected source, forced to the exact bit
//! length, aligned to 1 mod 30 and then walked along the mod-30 wheel so
//! multiples of 2, 3 and 5 are never tested.

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use zeroize::Zeroizing;

use crate::error::SeedKeyResult;
use crate::seed::RandomnessSource;

/// Gaps between consecutive residues coprime to 30, starting from 1
pub const WHEEL_DELTAS: [u32; 8] = [6, 4, 2, 4, 2, 4, 6, 2];

/// Miller-Rabin rounds for a prime of `bits` bits
pub fn miller_rabin_rounds(bits: usize) -> usize {
    match bits {
        0..=100 => 27,
        101..=150 => 18,
        151..=200 => 15,
        201..=250 => 12,
        251..=300 => 9,
        301..=350 => 8,
        351..=400 => 7,
        401..=500 => 6,
        501..=600 => 5,
        601..=800 => 4,
        801..=1250 => 3,
        _ => 2,
    }
}

/// A position on the wheel; advanced until it lands on a usable prime.
#[derive(Debug, Clone)]
pub struct Candidate {
    value: BigUint,
    bits: usize,
    delta_index: usize,
}

impl Candidate {
    /// Draw `bits / 8` bytes, set the two top bits and the low bit, align to 1 mod 30.
    pub fn draw<R>(source: &mut R, bits: usize) -> SeedKeyResult<Self>
    where
        R: RandomnessSource + ?Sized,
    {
        let mut bytes = Zeroizing::new(vec![0u8; bits / 8]);
        source.draw(&mut bytes)?;
        bytes[0] |= 0xC0;
        let last = bytes.len() - 1;
        bytes[last] |= 0x01;

        let mut value = BigUint::from_bytes_be(&bytes);
        let rem = (&value % BigUint::from(30u32)).to_u32().unwrap_or(0);
        value += BigUint::from((31 - rem) % 30);

        Ok(Self {
            value,
            bits,
            delta_index: 0,
        })
    }

    /// Alignment or wheel steps may push past the requested length.
    pub fn fits(&self) -> bool {
        self.value.bits() == self.bits
    }

    pub fn advance(&mut self) {
        let delta = WHEEL_DELTAS[self.delta_index % WHEEL_DELTAS.len()];
        self.value += BigUint::from(delta);
        self.delta_index += 1;
    }

    /// Probable prime with `gcd(value - 1, e) == 1` (`e` itself is prime).
    pub fn is_usable_prime(&self, exponent: &BigUint) -> bool {
        if !probably_prime(&self.value, miller_rabin_rounds(self.bits)) {
            return false;
        }
        let rem = (&self.value - BigUint::one()) % exponent;
        !rem.is_zero()
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn into_value(self) -> BigUint {
        self.value
    }
}
