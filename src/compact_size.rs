//! Bitcoin's CompactSize variable-length integer, used to prefix a filter
//! with its element count.
//!
//! | value range            | encoding                 |
//! |------------------------|--------------------------|
//! | `< 0xfd`               | 1 byte                   |
//! | `<= 0xffff`            | `0xfd` + 2 bytes LE      |
//! | `<= 0xffff_ffff`       | `0xfe` + 4 bytes LE      |
//! | otherwise              | `0xff` + 8 bytes LE      |

use crate::error::Error;

/// Returns the number of bytes `value` occupies when encoded.
pub fn encoded_len(value: u64) -> usize {
    match value {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Appends the CompactSize encoding of `value` to `out`.
pub fn write(out: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xfc => out.push(value as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

/// Reads a CompactSize from the front of `bytes`, returning the value and
/// the number of bytes consumed.
///
/// Non-canonical encodings (a wider form than the value needs) are rejected.
pub fn read(bytes: &[u8]) -> Result<(u64, usize), Error> {
    let (&marker, rest) = bytes
        .split_first()
        .ok_or(Error::MalformedCompactSize("empty input"))?;

    let (value, width, min) = match marker {
        0xfd => (read_le(rest, 2)?, 2, 0xfd),
        0xfe => (read_le(rest, 4)?, 4, 0x1_0000),
        0xff => (read_le(rest, 8)?, 8, 0x1_0000_0000),
        small => return Ok((small as u64, 1)),
    };

    if value < min {
        return Err(Error::MalformedCompactSize("non-canonical encoding"));
    }
    Ok((value, 1 + width))
}

fn read_le(bytes: &[u8], width: usize) -> Result<u64, Error> {
    let field = bytes
        .get(..width)
        .ok_or(Error::MalformedCompactSize("truncated"))?;
    let mut buf = [0u8; 8];
    buf[..width].copy_from_slice(field);
    Ok(u64::from_le_bytes(buf))
}
