//! Maps elements into the hash range `[0, F)`.
//!
//! Each element is hashed with SipHash-2-4 under the filter key, and the
//! 64-bit hash is scaled into `[0, F)` by taking the high 64 bits of the
//! 128-bit product `hash * F`. The product is emulated with four 32x32-bit
//! multiplications so results match other BIP158 implementations bit for bit.

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

use crate::params::FilterKey;

const LOW_32: u64 = 0xFFFF_FFFF;

/// SipHash-2-4 of `element` keyed by `key`.
pub fn siphash24(key: &FilterKey, element: &[u8]) -> u64 {
    let mut hasher = SipHasher24::new_with_key(key.as_bytes());
    hasher.write(element);
    hasher.finish()
}

/// Computes `floor(v * f / 2^64)` without 128-bit arithmetic or division.
#[inline]
pub fn fast_reduce(v: u64, f: u64) -> u64 {
    let (v_hi, v_lo) = (v >> 32, v & LOW_32);
    let (f_hi, f_lo) = (f >> 32, f & LOW_32);

    let hi_hi = v_hi * f_hi;
    let hi_lo = v_hi * f_lo;
    let lo_hi = v_lo * f_hi;
    let lo_lo = v_lo * f_lo;

    let carry = ((hi_lo & LOW_32) + (lo_hi & LOW_32) + (lo_lo >> 32)) >> 32;

    hi_hi + (hi_lo >> 32) + (lo_hi >> 32) + carry
}

/// Maps `element` to a value in `[0, f)`. `f` must be non-zero.
#[inline]
pub fn hash_to_range(element: &[u8], key: &FilterKey, f: u64) -> u64 {
    debug_assert!(f > 0, "hash range must be non-zero");
    fast_reduce(siphash24(key, element), f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(v: u64, f: u64) -> u64 {
        ((v as u128 * f as u128) >> 64) as u64
    }

    #[test]
    fn test_siphash_reference_vector() {
        // Reference vector from the SipHash paper: key 00..0f, message 00..0e.
        let key = FilterKey::new(core::array::from_fn(|i| i as u8));
        let message: Vec<u8> = (0..15).collect();
        assert_eq!(siphash24(&key, &message), 0xa129_ca61_49be_45e5);
    }

    #[test]
    fn test_fast_reduce_matches_wide_multiply() {
        let samples = [
            0u64,
            1,
            2,
            0xFFFF_FFFF,
            0x1_0000_0000,
            0x1_0000_0001,
            784_931,
            0x8000_0000_0000_0000,
            0xDEAD_BEEF_CAFE_BABE,
            0x0123_4567_89AB_CDEF,
            u64::MAX - 1,
            u64::MAX,
        ];
        for &v in &samples {
            for &f in &samples {
                assert_eq!(fast_reduce(v, f), exact(v, f), "v = {v:#x}, f = {f:#x}");
            }
        }
    }

    #[test]
    fn test_fast_reduce_stays_in_range() {
        let f = 1_000 * 784_931;
        for v in [0, 1, u64::MAX / 3, u64::MAX] {
            assert!(fast_reduce(v, f) < f);
        }
        assert_eq!(fast_reduce(u64::MAX, u64::MAX), u64::MAX - 1);
        assert_eq!(fast_reduce(1 << 63, 10), 5);
    }

    #[test]
    fn test_hash_to_range_is_deterministic() {
        let key = FilterKey::new([7; 16]);
        let f = 5 * 784_931;
        let a = hash_to_range(b"script", &key, f);
        assert_eq!(a, hash_to_range(b"script", &key, f));
        assert!(a < f);
        assert_ne!(
            siphash24(&key, b"script"),
            siphash24(&FilterKey::new([8; 16]), b"script")
        );
    }
}
