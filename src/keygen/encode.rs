//! Keypair assembly and PEM export

use num_bigint_dig::{BigUint, ModInverse, ToBigUint};
use num_traits::One;
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;

use crate::address::derive_address;
use crate::error::{SeedKeyError, SeedKeyResult};
use crate::types::GeneratedIdentity;

/// Build the private key from two primes, `d = e^-1 mod (p-1)(q-1)`.
pub(crate) fn assemble(p: BigUint, q: BigUint, exponent: &BigUint) -> SeedKeyResult<RsaPrivateKey> {
    let totient = (&p - BigUint::one()) * (&q - BigUint::one());
    let d = exponent
        .mod_inverse(totient)
        .and_then(|d| d.to_biguint())
        .ok_or_else(|| SeedKeyError::primitive("public exponent is not invertible"))?;

    let n = &p * &q;
    let key = RsaPrivateKey::from_components(n, exponent.clone(), d, vec![p, q])?;
    key.validate()?;
    Ok(key)
}

/// PKCS#1 private PEM, SPKI public PEM (LF endings, no trailing newline) and address.
pub(crate) fn export(key: &RsaPrivateKey) -> SeedKeyResult<GeneratedIdentity> {
    let private_pem = key
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| SeedKeyError::primitive(format!("PKCS#1 encoding failed: {}", e)))?;
    let public_pem = key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| SeedKeyError::primitive(format!("SPKI encoding failed: {}", e)))?;

    let public_key = public_pem.trim_end().to_string();
    let private_key = private_pem.trim_end().to_string();
    let address = derive_address(&public_key);

    Ok(GeneratedIdentity {
        public_key,
        private_key,
        address,
    })
}
