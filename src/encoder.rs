use tracing::debug;

use crate::bitbuffer::{BitBuffer, BufferFull};
use crate::compact_size;
use crate::decoder::Decoder;
use crate::element::ElementSet;
use crate::error::Error;
use crate::mapper::hash_to_range;
use crate::params::{FilterKey, FilterParameters};

/// The Golomb-Coded Set builder.
///
/// Every element is hashed into `[0, N * M)`, the values are sorted, and the
/// gaps between consecutive values are written as Golomb-Rice codewords:
/// `delta >> P` one-bits, a zero-bit, then the low `P` bits of `delta`.
///
/// # Example
/// ```
/// use gcs::{ElementSet, Encoder, FilterKey, FilterParameters};
///
/// let elements: ElementSet = [b"alice".to_vec(), b"bob".to_vec()].into_iter().collect();
/// let key = FilterKey::new([0x42; 16]);
///
/// let filter = Encoder::new(FilterParameters::BASIC).encode(&elements, &key).unwrap();
/// assert_eq!(filter.n, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    params: FilterParameters,
    /// Maximum number of codec bytes a filter may occupy (`None` = unlimited).
    max_bytes: Option<usize>,
}

impl Encoder {
    pub fn new(params: FilterParameters) -> Self {
        Self {
            params,
            max_bytes: None,
        }
    }

    /// Creates an `Encoder` whose filters may not exceed `max_bytes` codec
    /// bytes. Larger filters fail with `Error::BufferFull`.
    pub fn with_limit(params: FilterParameters, max_bytes: usize) -> Self {
        Self {
            params,
            max_bytes: Some(max_bytes),
        }
    }

    pub fn params(&self) -> &FilterParameters {
        &self.params
    }

    /// Builds the filter for `elements` under `key`.
    pub fn encode(&self, elements: &ElementSet, key: &FilterKey) -> Result<Filter, Error> {
        let values = self.hashed_values(elements, key)?;

        let mut buf = match self.max_bytes {
            Some(max) => BitBuffer::with_limit(max),
            None => BitBuffer::with_capacity(codec_size_hint(values.len(), self.params.p)),
        };

        let mut prev = 0u64;
        for &value in &values {
            write_golomb_rice(&mut buf, value - prev, self.params.p)?;
            prev = value;
        }

        let filter = Filter {
            n: values.len() as u64,
            data: buf.into_bytes(),
        };
        debug!(
            n = filter.n,
            m = self.params.m,
            p = self.params.p,
            bytes = filter.data.len(),
            "built golomb-coded set"
        );
        Ok(filter)
    }

    /// Returns the ascending hash-range values the filter for `elements`
    /// encodes. Collisions are kept as repeated values.
    pub fn hashed_values(&self, elements: &ElementSet, key: &FilterKey) -> Result<Vec<u64>, Error> {
        self.params.validate()?;
        if elements.is_empty() {
            return Ok(Vec::new());
        }

        let f = self.params.range(elements.len() as u64)?;
        let mut values: Vec<u64> = elements
            .iter()
            .map(|element| hash_to_range(element, key, f))
            .collect();
        values.sort_unstable();
        Ok(values)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(FilterParameters::BASIC)
    }
}

/// Writes one Golomb-Rice codeword for `delta`: `(delta >> p) + 1 + p` bits.
pub fn write_golomb_rice(buf: &mut BitBuffer, delta: u64, p: u8) -> Result<(), BufferFull> {
    let quotient = delta >> p;
    let remainder = delta & ((1u64 << p) - 1);

    for _ in 0..quotient {
        buf.write_bit(true)?;
    }
    buf.write_bit(false)?;
    buf.write_bits(remainder, p)
}

/// Expected codec size: uniformly spread values average a delta near `2^P`,
/// so a codeword costs about `P + 2` bits.
fn codec_size_hint(n: usize, p: u8) -> usize {
    (n * (p as usize + 2)).div_ceil(8)
}

/// A built Golomb-Coded Set: the element count and the codec bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Number of elements the filter was built from.
    pub n: u64,
    /// Golomb-Rice codewords, zero-padded to a byte boundary.
    pub data: Vec<u8>,
}

impl Filter {
    /// Serializes the filter as `CompactSize(n) || data`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(compact_size::encoded_len(self.n) + self.data.len());
        compact_size::write(&mut out, self.n);
        out.extend_from_slice(&self.data);
        out
    }

    /// Parses the `CompactSize(n) || data` form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let (n, consumed) = compact_size::read(bytes)?;
        Ok(Self {
            n,
            data: bytes[consumed..].to_vec(),
        })
    }

    /// Lower-case hex of [`Filter::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s.trim()).map_err(Error::InvalidFilterHex)?;
        Self::from_bytes(&bytes)
    }

    /// Decodes exactly `n` values with Golomb-Rice parameter `p`.
    pub fn values(&self, p: u8) -> Result<Vec<u64>, Error> {
        Decoder::decode_exact(&self.data, p, self.n)
    }
}
