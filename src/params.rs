use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tuning knobs of a Golomb-Coded Set.
///
/// `m` scales the hash range (F = N * M) and `p` is the number of remainder
/// bits written per Golomb-Rice codeword. BIP158 basic filters use
/// [`FilterParameters::BASIC`]; other filter types only need another profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterParameters {
    pub m: u64,
    pub p: u8,
}

impl FilterParameters {
    /// The BIP158 basic filter profile: M = 784931, P = 19.
    pub const BASIC: FilterParameters = FilterParameters { m: 784_931, p: 19 };

    /// Creates a validated parameter profile.
    pub fn new(m: u64, p: u8) -> Result<Self, Error> {
        let params = Self { m, p };
        params.validate()?;
        Ok(params)
    }

    /// Checks `m != 0` and `p` in `1..=63`.
    pub fn validate(&self) -> Result<(), Error> {
        validate_rice_parameter(self.p)?;
        if self.m == 0 {
            return Err(Error::ZeroScaleFactor);
        }
        Ok(())
    }

    /// Returns the hash range F = N * M for a set of `n` elements.
    pub fn range(&self, n: u64) -> Result<u64, Error> {
        n.checked_mul(self.m)
            .ok_or(Error::ArithmeticOverflow { n, m: self.m })
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::BASIC
    }
}

pub(crate) fn validate_rice_parameter(p: u8) -> Result<(), Error> {
    if (1..=63).contains(&p) {
        Ok(())
    } else {
        Err(Error::InvalidRiceParameter(p))
    }
}

/// The 128-bit SipHash key of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterKey([u8; 16]);

impl FilterKey {
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Derives the key from a block hash in internal (wire) byte order: its
    /// first 16 bytes, unhashed.
    pub fn from_block_hash(block_hash: &[u8; 32]) -> Self {
        let mut key = [0u8; 16];
        key.copy_from_slice(&block_hash[..16]);
        Self(key)
    }

    /// Derives the key from a block hash as conventionally displayed, which
    /// is the byte-reversed internal order.
    pub fn from_block_hash_hex(display_hex: &str) -> Result<Self, Error> {
        let mut block_hash = [0u8; 32];
        hex::decode_to_slice(display_hex.trim(), &mut block_hash)
            .map_err(|e| Error::InvalidBlockHash(e.to_string()))?;
        block_hash.reverse();
        Ok(Self::from_block_hash(&block_hash))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for FilterKey {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}
