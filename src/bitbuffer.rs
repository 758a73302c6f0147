/// Error returned when a write would exceed the buffer's byte limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("write would exceed bit buffer byte limit")]
pub struct BufferFull;

/// Error returned when a read runs past the last bit of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("end of bit stream")]
pub struct EndOfStream;

/// A growable bit buffer written most-significant-bit first within each byte.
///
/// This is the bit order BIP158 filters are serialized in, so buffers produced
/// here are interchangeable with filters built by other implementations.
///
/// An optional byte limit can be set to cap memory usage. When the limit is
/// reached, write operations return `Err(BufferFull)` instead of growing.
#[derive(Debug, Clone)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    /// Number of valid bits in the last byte (1..=8, or 0 if empty).
    bit_count: u8,
    /// Maximum number of bytes the buffer is allowed to hold (`None` = unlimited).
    max_bytes: Option<usize>,
}

impl BitBuffer {
    /// Creates a new empty `BitBuffer` with no size limit.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_count: 0,
            max_bytes: None,
        }
    }

    /// Creates a `BitBuffer` with the given pre-allocated capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            bit_count: 0,
            max_bytes: None,
        }
    }

    /// Creates a `BitBuffer` with a maximum byte limit.
    ///
    /// Once the buffer contains `max_bytes` bytes, further writes that would
    /// require a new byte return `Err(BufferFull)`.
    pub fn with_limit(max_bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(max_bytes.min(128)),
            bit_count: 0,
            max_bytes: Some(max_bytes),
        }
    }

    /// Returns the current byte limit, if any.
    pub fn limit(&self) -> Option<usize> {
        self.max_bytes
    }

    /// Returns the total number of bits written.
    #[inline]
    pub fn len_bits(&self) -> usize {
        if self.bytes.is_empty() {
            0
        } else {
            (self.bytes.len() - 1) * 8 + self.bit_count as usize
        }
    }

    /// Returns `true` if no bits have been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the written bits as bytes. Unwritten bits of the final byte are zero.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer and returns the zero-padded byte vector.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Appends a single bit.
    ///
    /// Returns `Err(BufferFull)` if adding a new byte would exceed the limit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> Result<(), BufferFull> {
        if self.bit_count == 0 || self.bit_count == 8 {
            if let Some(max) = self.max_bytes {
                if self.bytes.len() >= max {
                    return Err(BufferFull);
                }
            }
            self.bytes.push(0);
            self.bit_count = 0;
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - self.bit_count);
            }
        }
        self.bit_count += 1;
        Ok(())
    }

    /// Writes the lowest `n` bits of `value`, high bit first. `n` must be <= 64.
    ///
    /// On `Err(BufferFull)` the buffer may hold part of this write.
    pub fn write_bits(&mut self, value: u64, n: u8) -> Result<(), BufferFull> {
        debug_assert!(n <= 64);
        for i in (0..n).rev() {
            self.write_bit((value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Returns the number of bytes that can still be added before hitting the
    /// limit, or `None` if no limit is set.
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.max_bytes.map(|max| max.saturating_sub(self.bytes.len()))
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A cursor for reading bits sequentially, most-significant-bit first.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    /// Total number of valid bits.
    total_bits: usize,
    /// Current bit position (0-indexed from the start).
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over every bit of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::from_raw(bytes, bytes.len() * 8)
    }

    /// Creates a reader over the bits written to `buffer`, excluding padding.
    pub fn from_buffer(buffer: &'a BitBuffer) -> Self {
        Self::from_raw(buffer.as_bytes(), buffer.len_bits())
    }

    /// Creates a `BitReader` from raw bytes and a total bit count.
    pub fn from_raw(bytes: &'a [u8], total_bits: usize) -> Self {
        debug_assert!(total_bits <= bytes.len() * 8);
        Self {
            bytes,
            total_bits,
            pos: 0,
        }
    }

    /// Returns the number of bits remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.total_bits.saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.total_bits
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool, EndOfStream> {
        if self.pos >= self.total_bits {
            return Err(EndOfStream);
        }
        let byte_idx = self.pos / 8;
        let bit_idx = self.pos % 8;
        self.pos += 1;
        Ok((self.bytes[byte_idx] >> (7 - bit_idx)) & 1 == 1)
    }

    /// Reads `n` bits as a `u64`, high bit first. `n` must be <= 64.
    ///
    /// If fewer than `n` bits remain, nothing is consumed.
    pub fn read_bits(&mut self, n: u8) -> Result<u64, EndOfStream> {
        debug_assert!(n <= 64);
        if self.remaining() < n as usize {
            return Err(EndOfStream);
        }
        let mut value: u64 = 0;
        for _ in 0..n {
            value = (value << 1) | (self.read_bit()? as u64);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read_bits() {
        let mut buf = BitBuffer::new();
        buf.write_bit(true).unwrap();
        buf.write_bit(false).unwrap();
        buf.write_bit(true).unwrap();
        buf.write_bit(true).unwrap();
        assert_eq!(buf.len_bits(), 4);

        let mut reader = BitReader::from_buffer(&buf);
        assert_eq!(reader.read_bit(), Ok(true));
        assert_eq!(reader.read_bit(), Ok(false));
        assert_eq!(reader.read_bit(), Ok(true));
        assert_eq!(reader.read_bit(), Ok(true));
        assert_eq!(reader.read_bit(), Err(EndOfStream));
    }

    #[test]
    fn test_msb_first_packing_and_zero_padding() {
        let mut buf = BitBuffer::new();
        buf.write_bits(0b101, 3).unwrap();
        assert_eq!(buf.as_bytes(), &[0b1010_0000]);

        buf.write_bits(0b11111, 5).unwrap();
        buf.write_bit(true).unwrap();
        assert_eq!(buf.into_bytes(), vec![0b1011_1111, 0b1000_0000]);
    }

    #[test]
    fn test_write_and_read_multi_bits() {
        let mut buf = BitBuffer::new();
        buf.write_bits(0b11010, 5).unwrap();
        buf.write_bits(0xFF, 8).unwrap();
        buf.write_bits(0x00, 8).unwrap();
        assert_eq!(buf.len_bits(), 21);

        let mut reader = BitReader::from_buffer(&buf);
        assert_eq!(reader.read_bits(5), Ok(0b11010));
        assert_eq!(reader.read_bits(8), Ok(0xFF));
        assert_eq!(reader.read_bits(8), Ok(0x00));
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_64_bit_value() {
        let mut buf = BitBuffer::new();
        let val: u64 = 0xDEAD_BEEF_CAFE_BABE;
        buf.write_bits(val, 64).unwrap();
        assert_eq!(buf.len_bits(), 64);

        let mut reader = BitReader::from_buffer(&buf);
        assert_eq!(reader.read_bits(64), Ok(val));
    }

    #[test]
    fn test_short_read_consumes_nothing() {
        let bytes = [0b1100_0000];
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(9), Err(EndOfStream));
        assert_eq!(reader.remaining(), 8);
        assert_eq!(reader.read_bits(2), Ok(0b11));
    }

    #[test]
    fn test_reader_over_whole_bytes_sees_padding() {
        let mut buf = BitBuffer::new();
        buf.write_bits(0b111, 3).unwrap();
        let bytes = buf.into_bytes();

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.remaining(), 8);
        assert_eq!(reader.read_bits(8), Ok(0b1110_0000));
    }

    #[test]
    fn test_empty_buffer() {
        let buf = BitBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_bits(), 0);

        let mut reader = BitReader::from_buffer(&buf);
        assert!(reader.is_exhausted());
        assert_eq!(reader.read_bit(), Err(EndOfStream));
        assert_eq!(reader.read_bits(0), Ok(0));
    }

    #[test]
    fn test_with_limit_rejects_overflow() {
        let mut buf = BitBuffer::with_limit(1);
        buf.write_bits(0xFF, 8).unwrap();
        assert_eq!(buf.remaining_capacity(), Some(0));
        // The 9th bit requires a second byte.
        assert_eq!(buf.write_bit(true), Err(BufferFull));
        assert_eq!(buf.len_bits(), 8);
    }

    #[test]
    fn test_with_limit_partial_byte_ok() {
        let mut buf = BitBuffer::with_limit(1);
        buf.write_bits(0b10101, 5).unwrap();
        buf.write_bits(0b010, 3).unwrap();
        assert_eq!(buf.len_bits(), 8);
        assert!(buf.write_bit(false).is_err());
    }

    #[test]
    fn test_no_limit_is_unlimited() {
        let mut buf = BitBuffer::new();
        assert_eq!(buf.limit(), None);
        assert_eq!(buf.remaining_capacity(), None);
        buf.write_bits(0xDEADBEEF, 32).unwrap();
        buf.write_bits(0xDEADBEEF, 32).unwrap();
    }
}
