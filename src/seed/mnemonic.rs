//! Mnemonic Codec
//!
//! Maps 128-bit entropy to 12-word BIP-39 phrases and back, and bridges a
//! wider entropy digest down to the 128-bit domain.
//!
//! SECURITY: entropy buffers are zeroized on drop.

use std::fmt;

use bip39::Language;
use zeroize::Zeroizing;

use crate::error::{ErrorCode, SeedKeyError, SeedKeyResult};

/// Entropy carried by a 12-word phrase
pub const ENTROPY_LEN: usize = 16;

/// Words in a phrase
pub const WORD_COUNT: usize = 12;

/// A validated 12-word English BIP-39 phrase
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(bip39::Mnemonic);

impl Mnemonic {
    /// Parse and validate a phrase (case and spacing are normalized)
    pub fn parse(phrase: &str) -> SeedKeyResult<Self> {
        let normalized = Zeroizing::new(
            phrase
                .split_whitespace()
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(" "),
        );

        let count = normalized.split(' ').filter(|w| !w.is_empty()).count();
        if count != WORD_COUNT {
            return Err(SeedKeyError::new(
                ErrorCode::InvalidWordCount,
                format!("expected {} words, got {}", WORD_COUNT, count),
            ));
        }

        let inner = bip39::Mnemonic::parse_in_normalized(Language::English, &normalized)
            .map_err(|e| match e {
                bip39::Error::UnknownWord(index) => SeedKeyError::invalid_word(format!(
                    "word {} is not in the wordlist",
                    index + 1
                )),
                other => SeedKeyError::from(other),
            })?;
        Ok(Self(inner))
    }

    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.word_iter()
    }

    /// The 16 bytes of entropy this phrase encodes
    pub fn to_entropy(&self) -> [u8; ENTROPY_LEN] {
        let (bytes, len) = self.0.to_entropy_array();
        debug_assert_eq!(len, ENTROPY_LEN);
        let mut out = [0u8; ENTROPY_LEN];
        out.copy_from_slice(&bytes[..ENTROPY_LEN]);
        out
    }

    /// BIP-39 seed salted with `passphrase` (PBKDF2-HMAC-SHA512, 2048 rounds)
    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.0.to_seed(passphrase))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic([REDACTED])")
    }
}

/// Encode 128 bits of entropy as 12 words (4-bit SHA-256 checksum appended)
pub fn entropy_to_mnemonic(entropy: &[u8; ENTROPY_LEN]) -> SeedKeyResult<Mnemonic> {
    let inner = bip39::Mnemonic::from_entropy_in(Language::English, entropy)?;
    Ok(Mnemonic(inner))
}

/// Decode a 12-word phrase, verifying its checksum
pub fn mnemonic_to_entropy(phrase: &str) -> SeedKeyResult<[u8; ENTROPY_LEN]> {
    Ok(Mnemonic::parse(phrase)?.to_entropy())
}

/// Derive a mnemonic from the leading 16 bytes of a hex digest
pub fn make_mnemonic_from_entropy_sha(digest_hex: &str) -> SeedKeyResult<Mnemonic> {
    let digest_hex = digest_hex.trim();
    if digest_hex.len() < ENTROPY_LEN * 2 {
        return Err(SeedKeyError::invalid_digest(format!(
            "digest must have at least {} hex chars, got {}",
            ENTROPY_LEN * 2,
            digest_hex.len()
        )));
    }
    if !digest_hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SeedKeyError::invalid_digest("digest is not hexadecimal"));
    }

    let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
    hex::decode_to_slice(&digest_hex[..ENTROPY_LEN * 2], entropy.as_mut())?;
    entropy_to_mnemonic(&entropy)
}
