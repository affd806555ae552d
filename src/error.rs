//! Error types for symbol encoding.

use crate::qrcode::EcLevel;
use thiserror::Error;

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, QrError>;

/// Ways an encode call can fail.
///
/// Every failure is reported before any symbol is exposed; a caller never sees
/// a partially built grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QrError {
    /// The source held no bytes to encode.
    #[error("no input data to encode")]
    EmptyInput,

    /// No allowed version holds the encoded data at the requested level.
    ///
    /// `bits` is the shortest encoded length found, or `None` when the data
    /// could not be represented in any version group at all.
    #[error("data does not fit at level {level:?} (encoded length: {bits:?} bits)")]
    CapacityExceeded {
        /// Encoded length of the data, if it could be computed.
        bits: Option<usize>,
        /// Requested error correction level.
        level: EcLevel,
    },

    /// An append ran past the bit stream's fixed capacity.
    ///
    /// Selection sizes every stream from the capacity tables, so this signals a
    /// table or logic defect rather than bad input.
    #[error("bit stream overflow: {needed} bits needed, capacity {capacity} bits")]
    BitstreamOverflow {
        /// Length the stream would have reached.
        needed: usize,
        /// Fixed capacity of the stream.
        capacity: usize,
    },

    /// A level, version, mask or length argument was out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
