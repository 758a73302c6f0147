use tracing::trace;

use crate::bitbuffer::BitReader;
use crate::error::Error;
use crate::params::validate_rice_parameter;

/// The Golomb-Coded Set decoder.
///
/// Reconstructs the ascending hash-range values from Golomb-Rice codewords.
/// The original elements cannot be recovered; the hashing is one-way.
///
/// # Example
/// ```
/// use gcs::{Decoder, Filter};
///
/// let filter = Filter::from_hex("019dfca8").unwrap();
/// assert_eq!(Decoder::decode(&filter.data, 19).unwrap(), vec![769941]);
/// assert_eq!(filter.values(19).unwrap(), vec![769941]);
/// ```
pub struct Decoder;

impl Decoder {
    /// Decodes codewords until the stream runs out.
    ///
    /// The end of the stream is accepted at a codeword boundary or inside a
    /// remainder, which is how the zero padding after the last codeword is
    /// absorbed. Running out inside a unary quotient is `TruncatedStream`.
    ///
    /// With `p < 8` the padding can hold a whole zero-valued codeword and
    /// shows up as a trailing repeated value; use [`Decoder::decode_exact`]
    /// when the element count is known.
    pub fn decode(bytes: &[u8], p: u8) -> Result<Vec<u64>, Error> {
        let values = Self::iter(bytes, p)?.collect::<Result<Vec<_>, _>>()?;
        trace!(values = values.len(), bytes = bytes.len(), "decoded golomb-coded set");
        Ok(values)
    }

    /// Decodes exactly `n` codewords and ignores whatever follows them.
    ///
    /// Running out of bits anywhere inside the `n` codewords is
    /// `TruncatedStream`.
    pub fn decode_exact(bytes: &[u8], p: u8, n: u64) -> Result<Vec<u64>, Error> {
        validate_rice_parameter(p)?;
        let iter = DecoderIter {
            reader: BitReader::new(bytes),
            p,
            cumulative: 0,
            remaining: Some(n),
            done: false,
        };
        let values = iter.collect::<Result<Vec<_>, _>>()?;
        trace!(values = values.len(), bytes = bytes.len(), "decoded golomb-coded set");
        Ok(values)
    }

    /// Returns an iterator that lazily decodes values with the same rules as
    /// [`Decoder::decode`]. Callers bounding work on untrusted input can
    /// `take` from it.
    pub fn iter(bytes: &[u8], p: u8) -> Result<DecoderIter<'_>, Error> {
        validate_rice_parameter(p)?;
        Ok(DecoderIter {
            reader: BitReader::new(bytes),
            p,
            cumulative: 0,
            remaining: None,
            done: false,
        })
    }
}

enum Codeword {
    Value(u64),
    EndOfFilter,
}

/// Reads one codeword. With `lenient`, running out of bits before the first
/// bit or inside the remainder ends the filter instead of failing.
fn read_codeword(reader: &mut BitReader<'_>, p: u8, lenient: bool) -> Result<Codeword, Error> {
    let mut bit = match reader.read_bit() {
        Ok(bit) => bit,
        Err(_) if lenient => return Ok(Codeword::EndOfFilter),
        Err(_) => return Err(Error::TruncatedStream),
    };

    let mut quotient = 0u64;
    while bit {
        quotient += 1;
        bit = reader.read_bit().map_err(|_| Error::TruncatedStream)?;
    }

    let remainder = match reader.read_bits(p) {
        Ok(r) => r,
        Err(_) if lenient => return Ok(Codeword::EndOfFilter),
        Err(_) => return Err(Error::TruncatedStream),
    };

    if quotient > u64::MAX >> p {
        return Err(Error::ValueOverflow);
    }
    Ok(Codeword::Value((quotient << p) | remainder))
}

/// A lazy iterator over the cumulative values of a Golomb-Coded Set.
#[derive(Debug, Clone)]
pub struct DecoderIter<'a> {
    reader: BitReader<'a>,
    p: u8,
    cumulative: u64,
    /// Codewords still expected, or `None` to read until the stream ends.
    remaining: Option<u64>,
    done: bool,
}

impl<'a> Iterator for DecoderIter<'a> {
    type Item = Result<u64, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) {
            return None;
        }

        let lenient = self.remaining.is_none();
        let delta = match read_codeword(&mut self.reader, self.p, lenient) {
            Ok(Codeword::Value(delta)) => delta,
            Ok(Codeword::EndOfFilter) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let Some(value) = self.cumulative.checked_add(delta) else {
            self.done = true;
            return Some(Err(Error::ValueOverflow));
        };
        self.cumulative = value;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(Ok(value))
    }
}
