//! Address derivation
//!
//! An address is the SHA-224 digest of the public key PEM text, rendered
//! as 56 lowercase hex characters.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};
use subtle::ConstantTimeEq;

use crate::error::{SeedKeyError, SeedKeyResult};

/// Hex length of a SHA-224 digest
pub const ADDRESS_LEN: usize = 56;

/// Deserializing goes through [`Address::parse`], so a decoded address is
/// always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(s: &str) -> SeedKeyResult<Self> {
        let valid = s.len() == ADDRESS_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(SeedKeyError::invalid_address(format!(
                "expected {} lowercase hex characters",
                ADDRESS_LEN
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time check that this address belongs to `public_key_pem`
    pub fn matches(&self, public_key_pem: &str) -> bool {
        let derived = derive_address(public_key_pem);
        self.0.as_bytes().ct_eq(derived.0.as_bytes()).into()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = SeedKeyError;

    fn try_from(s: String) -> SeedKeyResult<Self> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// SHA-224 over the UTF-8 bytes of the PEM, byte for byte.
pub fn derive_address(public_key_pem: &str) -> Address {
    Address(hex::encode(Sha224::digest(public_key_pem.as_bytes())))
}
