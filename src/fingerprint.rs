use crate::DEFAULT_SEED;
use crate::const_hash::hash_bytes;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 64-bit fingerprint of a byte string.
///
/// Constructible in `const` context, so tables of pre-hashed literal keys can
/// be emitted by the compiler and compared against fingerprints computed at
/// run time.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("empty fingerprint")]
    Empty,
    #[error("fingerprint has {0} hex digits, at most 16 allowed")]
    TooLong(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

impl Fingerprint {
    /// Fingerprint under [`DEFAULT_SEED`].
    pub const fn of(bytes: &[u8]) -> Self {
        Self(hash_bytes(bytes, DEFAULT_SEED))
    }

    pub const fn with_seed(bytes: &[u8], seed: u64) -> Self {
        Self(hash_bytes(bytes, seed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<Fingerprint> for u64 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::LowerHex for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(FingerprintError::Empty);
        }
        if digits.len() > 16 {
            return Err(FingerprintError::TooLong(digits.len()));
        }
        digits
            .chars()
            .try_fold(0u64, |acc, c| match c.to_digit(16) {
                Some(d) => Ok((acc << 4) | d as u64),
                None => Err(FingerprintError::InvalidDigit(c)),
            })
            .map(Self)
    }
}
