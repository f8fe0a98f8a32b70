//! Generation Configuration
//!
//! Centralized configuration for identity generation with:
//! - Presets (standard, reproducible)
//! - JSON loading for the CLI's `--config` flag
//! - Validation of settings before any randomness is consumed

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{SeedKeyError, SeedKeyResult};
use crate::keygen::{validate_bits, KeyGenOptions, WorkerCount};

/// Default cap on entropy events before the pool is declared stalled
pub const DEFAULT_MAX_ENTROPY_SAMPLES: u64 = 10_000;

/// Default cap on prime candidates tested per prime
pub const DEFAULT_MAX_PRIME_CANDIDATES: u64 = 100_000;

/// Which key generation path to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Single-threaded, byte-reproducible
    Stepwise,
    /// Multi-worker prime race, not reproducible
    Parallel,
}

/// Settings consumed by the identity pipeline
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// RSA modulus size in bits
    pub bits: usize,
    /// Worker-pool size, or -1 for all available cores
    pub workers: i64,
    pub mode: GenerationMode,
    /// Entropy events accepted before giving up on a stalled feed
    pub max_entropy_samples: u64,
    /// Prime candidates tested per prime before giving up
    pub max_prime_candidates: u64,
    /// Salt mixed into the seeded stream, never serialized
    #[serde(skip)]
    pub passphrase: Option<SecretString>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl GenerationConfig {
    /// Standard preset: 4096-bit keys on every core
    pub fn standard() -> Self {
        Self {
            bits: 4096,
            workers: -1,
            mode: GenerationMode::Parallel,
            max_entropy_samples: DEFAULT_MAX_ENTROPY_SAMPLES,
            max_prime_candidates: DEFAULT_MAX_PRIME_CANDIDATES,
            passphrase: None,
        }
    }

    /// Reproducible preset: 4096-bit keys on the stepwise path
    pub fn reproducible() -> Self {
        Self {
            workers: 1,
            mode: GenerationMode::Stepwise,
            ..Self::standard()
        }
    }

    /// Parse a JSON config file; unspecified fields fall back to `standard()`
    pub fn from_json(json: &str) -> SeedKeyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_bits(mut self, bits: usize) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(SecretString::from(passphrase.into()));
        self
    }

    /// Passphrase as salt input, empty when unset
    pub fn passphrase(&self) -> &str {
        self.passphrase
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or("")
    }

    /// Hard errors: settings that can never produce a key
    pub fn validate(&self) -> SeedKeyResult<()> {
        validate_bits(self.bits)?;
        WorkerCount::from_option(self.workers)?;
        if self.max_entropy_samples == 0 {
            return Err(SeedKeyError::invalid_config(
                "max_entropy_samples must be at least 1",
            ));
        }
        if self.max_prime_candidates == 0 {
            return Err(SeedKeyError::invalid_config(
                "max_prime_candidates must be at least 1",
            ));
        }
        Ok(())
    }

    /// Soft warnings: settings that work but weaken the identity
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.bits < 2048 {
            warnings.push(format!(
                "Warning: {}-bit keys are below the 2048-bit minimum recommendation",
                self.bits
            ));
        }

        let passphrase_bits = estimate_passphrase_entropy(self.passphrase());
        if passphrase_bits == 0 {
            warnings.push("Warning: No passphrase set; the mnemonic alone regenerates the keys".to_string());
        } else if passphrase_bits < 40 {
            warnings.push(format!(
                "Warning: Passphrase is weak (~{} bits of entropy)",
                passphrase_bits
            ));
        }

        if self.mode == GenerationMode::Parallel {
            warnings.push(
                "Warning: Parallel generation does not reproduce stepwise keys for the same seed"
                    .to_string(),
            );
        }

        warnings
    }

    /// Options handed to the key generator
    pub fn key_gen_options(&self) -> SeedKeyResult<KeyGenOptions> {
        self.validate()?;
        Ok(KeyGenOptions {
            bits: self.bits,
            workers: WorkerCount::from_option(self.workers)?,
            max_candidates: self.max_prime_candidates,
        })
    }
}

/// Rough passphrase strength in bits: length times log2 of the character pool.
pub fn estimate_passphrase_entropy(passphrase: &str) -> u32 {
    // (class test, pool size); anything outside ASCII counts as a wide pool
    const CLASSES: [(fn(char) -> bool, u32); 5] = [
        (|c| c.is_ascii_lowercase(), 26),
        (|c| c.is_ascii_uppercase(), 26),
        (|c| c.is_ascii_digit(), 10),
        (|c| c.is_ascii_punctuation() || c == ' ', 33),
        (|c| !c.is_ascii(), 100),
    ];

    let pool: u32 = CLASSES
        .iter()
        .filter(|(test, _)| passphrase.chars().any(test))
        .map(|(_, size)| size)
        .sum();
    if pool == 0 {
        return 0;
    }
    (passphrase.chars().count() as f64 * f64::from(pool).log2()) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_presets() {
        let standard = GenerationConfig::standard();
        assert_eq!(standard.bits, 4096);
        assert_eq!(standard.workers, -1);
        assert_eq!(standard.mode, GenerationMode::Parallel);
        assert!(standard.validate().is_ok());

        let reproducible = GenerationConfig::reproducible();
        assert_eq!(reproducible.mode, GenerationMode::Stepwise);
        assert_eq!(reproducible.bits, 4096);
    }

    #[test]
    fn test_from_json_partial() {
        let config = GenerationConfig::from_json(r#"{"bits": 2048, "mode": "stepwise"}"#).unwrap();
        assert_eq!(config.bits, 2048);
        assert_eq!(config.mode, GenerationMode::Stepwise);
        assert_eq!(config.workers, -1);
        assert_eq!(config.max_prime_candidates, DEFAULT_MAX_PRIME_CANDIDATES);
        assert_eq!(config.passphrase(), "");
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = GenerationConfig::from_json(r#"{"bits": 1000}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBitLength);

        let err = GenerationConfig::from_json(r#"{"workers": 0}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidWorkerCount);

        let err = GenerationConfig::from_json(r#"{"bits": "many"}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::JsonError);
    }

    #[test]
    fn test_passphrase_is_not_deserialized() {
        let config = GenerationConfig::from_json(r#"{"passphrase": "leaked"}"#).unwrap();
        assert_eq!(config.passphrase(), "");
    }

    #[test]
    fn test_warnings() {
        let config = GenerationConfig::reproducible().with_passphrase("Correct-Horse-Battery-9");
        assert!(config.warnings().is_empty());

        let config = GenerationConfig::standard().with_bits(1024);
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_key_gen_options() {
        let config = GenerationConfig::reproducible().with_bits(2048);
        let opts = config.key_gen_options().unwrap();
        assert_eq!(opts.bits, 2048);
        assert_eq!(opts.workers, WorkerCount::Fixed(1));

        let opts = GenerationConfig::standard().key_gen_options().unwrap();
        assert_eq!(opts.workers, WorkerCount::Auto);
    }

    #[test]
    fn test_passphrase_entropy() {
        assert_eq!(estimate_passphrase_entropy(""), 0);
        assert!(estimate_passphrase_entropy("mypass") < 40);
        assert!(estimate_passphrase_entropy("MyP@ssw0rd!2024") > 60);
    }
}
