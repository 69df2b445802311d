//! Error taxonomy for the coding core.
//!
//! One `thiserror`-derived enum per distinct failure kind, each a single
//! enum with one variant per failure mode and `#[error("...")]` messages
//! interpolating the offending values.

use thiserror::Error;

/// Top-level error returned by every fallible entry point.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CodingError {
    /// Counts out of range, `block_bytes == 0`, or `original_count +
    /// recovery_count > 256`.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Duplicate or out-of-range block index, or the wrong number of blocks
    /// supplied to `decode`.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The field's self-test failed at initialization; the library refuses
    /// to operate.
    #[error("GF(2^8) field self-test failed")]
    Init,

    /// A postcondition the library itself is responsible for was violated
    /// (e.g. a zero pivot during Cauchy LDU decomposition). Indicates a bug
    /// in this crate, not in the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParameterError {
    #[error("original_count must be in 1..=255, got {0}")]
    OriginalCountOutOfRange(u32),

    #[error("recovery_count must be in 1..=255, got {0}")]
    RecoveryCountOutOfRange(u32),

    #[error("original_count + recovery_count must be <= 256, got {original} + {recovery}")]
    TooManyTotalBlocks { original: u32, recovery: u32 },

    #[error("block_bytes must be > 0")]
    ZeroBlockBytes,

    #[error("expected {expected} recovery output blocks worth of space ({expected_bytes} bytes), got {actual_bytes}")]
    RecoveryBufferWrongSize {
        expected: u32,
        expected_bytes: usize,
        actual_bytes: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InputError {
    #[error("duplicate block index {0}")]
    DuplicateIndex(u8),

    #[error("block index {index} out of range for original_count={original_count}, recovery_count={recovery_count}")]
    IndexOutOfRange {
        index: u8,
        original_count: u8,
        recovery_count: u8,
    },

    #[error("expected {expected} original blocks for encode, got {actual}")]
    WrongOriginalCount { expected: u32, actual: usize },

    #[error("decode requires exactly original_count ({expected}) blocks total, got {actual}")]
    WrongBlockCount { expected: u32, actual: usize },

    #[error("blocks have mismatched lengths: expected {expected}, found {actual} at index {at}")]
    MismatchedBlockLength {
        expected: usize,
        actual: usize,
        at: usize,
    },

    #[error("{missing} original blocks missing but only {available} recovery blocks supplied")]
    UnderDetermined { missing: usize, available: usize },

    #[error("{available} recovery blocks supplied but only {missing} originals are missing")]
    OverDetermined { missing: usize, available: usize },
}
