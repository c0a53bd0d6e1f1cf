//! BIP39 seed phrase generation, validation and seed derivation.
//!
//! Wordlist and checksum handling come from the `bip39` crate. This module
//! only adds the wallet's own rules on top: phrases entering from outside
//! must be exactly twelve words, entropy is drawn from the OS random source,
//! and the BIP39 passphrase extension is always empty (the wallet
//! passphrase protects storage, it never changes the keys).

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

use crate::core::errors::{Result, VaultError};

/// Word count every externally supplied phrase must have.
pub const PHRASE_WORD_COUNT: usize = 12;

/// A seed phrase held in a zeroizing buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase(Zeroizing<String>);

impl SeedPhrase {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Wraps raw phrase text read back from the vault.
    pub(crate) fn from_stored(bytes: Zeroizing<Vec<u8>>) -> Result<Self> {
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| VaultError::InvalidPhrase("stored phrase is not valid UTF-8".into()))?;
        Ok(Self(Zeroizing::new(text.to_string())))
    }
}

// Never print the words through Debug.
impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedPhrase(<{} words>)", self.word_count())
    }
}

fn is_valid_entropy_bits(bits: usize) -> bool {
    (128..=256).contains(&bits) && bits % 32 == 0
}

/// Generates a new phrase from `entropy_bits` of OS randomness.
///
/// 128 bits yields 12 words.
pub fn generate(entropy_bits: usize) -> Result<SeedPhrase> {
    if !is_valid_entropy_bits(entropy_bits) {
        return Err(VaultError::Entropy(entropy_bits));
    }

    let mut entropy = Zeroizing::new(vec![0u8; entropy_bits / 8]);
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| VaultError::RandomSource(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|_| VaultError::Entropy(entropy_bits))?;

    Ok(SeedPhrase(Zeroizing::new(mnemonic.to_string())))
}

/// Checks word count and BIP39 wordlist/checksum, returning the phrase in
/// canonical single-space form.
pub fn validate(phrase: &str) -> Result<SeedPhrase> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != PHRASE_WORD_COUNT {
        return Err(VaultError::InvalidPhrase(format!(
            "expected {} words, got {}",
            PHRASE_WORD_COUNT,
            words.len()
        )));
    }

    let canonical = Zeroizing::new(words.join(" ").to_lowercase());
    Mnemonic::parse_in_normalized(Language::English, &canonical)
        .map_err(|e| VaultError::InvalidPhrase(e.to_string()))?;

    Ok(SeedPhrase(canonical))
}

/// Derives the 64-byte BIP39 seed with an empty passphrase extension.
pub fn derive_seed(phrase: &SeedPhrase) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase.as_str())
        .map_err(|e| VaultError::InvalidPhrase(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized("")))
}
