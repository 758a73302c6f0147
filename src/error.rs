use crate::bitbuffer::BufferFull;

/// Errors surfaced by filter construction, decoding and wire parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An element handed over by the ingestion side was not valid hex.
    #[error("element {index} is not valid hex: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: hex::FromHexError,
    },

    /// A block hash was not 32 bytes of valid hex.
    #[error("invalid block hash: {0}")]
    InvalidBlockHash(String),

    /// The Golomb-Rice parameter must lie in `1..=63`.
    #[error("Golomb-Rice parameter P must be in [1, 63], got {0}")]
    InvalidRiceParameter(u8),

    /// The hash range scale factor was zero.
    #[error("hash range scale factor M must be non-zero")]
    ZeroScaleFactor,

    /// N * M does not fit in 64 bits.
    #[error("hash range N * M overflows 64 bits (N = {n}, M = {m})")]
    ArithmeticOverflow { n: u64, m: u64 },

    /// The stream ended before a unary quotient was terminated, or before a
    /// declared codeword was complete.
    #[error("filter stream truncated inside a codeword")]
    TruncatedStream,

    /// A decoded quotient or running sum does not fit in 64 bits.
    #[error("decoded value exceeds 64 bits")]
    ValueOverflow,

    /// A filter's text form was not valid hex.
    #[error("filter is not valid hex: {0}")]
    InvalidFilterHex(hex::FromHexError),

    /// The CompactSize element count prefix was truncated or non-canonical.
    #[error("malformed CompactSize prefix: {0}")]
    MalformedCompactSize(&'static str),

    /// The encoder's output byte limit was reached.
    #[error(transparent)]
    BufferFull(#[from] BufferFull),
}
