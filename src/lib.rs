//! # gcs
//!
//! Golomb-Coded Sets as used by Bitcoin's BIP158 compact block filters.
//!
//! ## Algorithm overview
//!
//! A Golomb-Coded Set compresses a set of N byte strings into a probabilistic
//! structure of roughly `N * (P + 2)` bits:
//!
//! - **Hashing**: every element is hashed with SipHash-2-4 under a 128-bit key
//!   (the first 16 bytes of the block hash) and scaled into `[0, N * M)` with a
//!   multiply-and-shift range reduction.
//!
//! - **Delta coding**: the hashed values are sorted and replaced by the gaps
//!   between neighbours, which are roughly geometrically distributed.
//!
//! - **Golomb-Rice coding**: each gap is written as a unary quotient
//!   (`gap >> P` one-bits and a zero-bit) followed by its low `P` bits.
//!
//! The serialized filter is the element count as a CompactSize integer
//! followed by the codewords, zero-padded to a byte boundary.
//!
//! ## Example
//!
//! ```rust
//! use gcs::{Decoder, ElementSet, Encoder, FilterKey, FilterParameters};
//!
//! // Testnet genesis block: a single output script.
//! let key = FilterKey::from_block_hash_hex(
//!     "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943",
//! )
//! .unwrap();
//! let mut elements = ElementSet::new();
//! elements.insert_output_script(&hex::decode(
//!     "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f\
//!      4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac",
//! ).unwrap());
//!
//! let filter = Encoder::new(FilterParameters::BASIC).encode(&elements, &key).unwrap();
//! assert_eq!(filter.to_hex(), "019dfca8");
//!
//! let values = Decoder::decode(&filter.data, FilterParameters::BASIC.p).unwrap();
//! assert_eq!(values.len(), 1);
//! ```

pub mod bitbuffer;
pub mod compact_size;
pub mod decoder;
pub mod element;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod params;

// Re-export primary types at the crate root.
pub use bitbuffer::{BitBuffer, BitReader, BufferFull, EndOfStream};
pub use decoder::{Decoder, DecoderIter};
pub use element::ElementSet;
pub use encoder::{write_golomb_rice, Encoder, Filter};
pub use error::Error;
pub use mapper::{fast_reduce, hash_to_range, siphash24};
pub use params::{FilterKey, FilterParameters};
