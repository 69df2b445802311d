//! Block descriptors and stripe parameters.
//!
//! `Block`/`BlockMut` borrow the caller's buffers for the duration of one
//! `encode`/`decode` call only: the core never retains a pointer beyond
//! return.

use crate::error::{CodingError, ParameterError};

/// Three values fixed for one stripe: how many originals, how many
/// recoveries, and how big each block is. Validated once at construction so
/// `encode`/`decode` never re-check the counts on their hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParams {
    original_count: u8,
    recovery_count: u8,
    block_bytes: usize,
}

impl EncoderParams {
    /// Validate and construct stripe parameters.
    ///
    /// `original_count` and `recovery_count` must each be in `1..=255`,
    /// their sum must not exceed 256, and `block_bytes` must be nonzero.
    pub fn new(
        original_count: u32,
        recovery_count: u32,
        block_bytes: usize,
    ) -> Result<Self, CodingError> {
        if original_count == 0 || original_count > 255 {
            return Err(ParameterError::OriginalCountOutOfRange(original_count).into());
        }
        if recovery_count == 0 || recovery_count > 255 {
            return Err(ParameterError::RecoveryCountOutOfRange(recovery_count).into());
        }
        if original_count + recovery_count > 256 {
            return Err(ParameterError::TooManyTotalBlocks {
                original: original_count,
                recovery: recovery_count,
            }
            .into());
        }
        if block_bytes == 0 {
            return Err(ParameterError::ZeroBlockBytes.into());
        }
        Ok(EncoderParams {
            original_count: original_count as u8,
            recovery_count: recovery_count as u8,
            block_bytes,
        })
    }

    #[inline]
    pub fn original_count(&self) -> u8 {
        self.original_count
    }

    #[inline]
    pub fn recovery_count(&self) -> u8 {
        self.recovery_count
    }

    #[inline]
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Total distinct indices in `[0, original_count + recovery_count)`.
    #[inline]
    pub fn total_count(&self) -> u16 {
        self.original_count as u16 + self.recovery_count as u16
    }

    /// Whether `index` names an original block (as opposed to a recovery
    /// block or an out-of-range value).
    #[inline]
    pub fn is_original_index(&self, index: u8) -> bool {
        (index as u16) < self.original_count as u16
    }

    /// The recovery position (0-based, into `[0, recovery_count)`) named by
    /// `index`, or `None` if `index` is not a recovery index.
    #[inline]
    pub fn recovery_position(&self, index: u8) -> Option<u8> {
        let i = index as u16;
        let o = self.original_count as u16;
        if i >= o && i < self.total_count() {
            Some((i - o) as u8)
        } else {
            None
        }
    }
}

/// A read-only block borrowed from the caller: its data and its index in
/// `[0, original_count + recovery_count)`.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub index: u8,
    pub data: &'a [u8],
}

impl<'a> Block<'a> {
    pub fn new(index: u8, data: &'a [u8]) -> Self {
        Block { index, data }
    }
}

/// A mutable block borrowed from the caller. `decode` rewrites the data in
/// place and updates `index` from a recovery index to the original index it
/// now holds.
#[derive(Debug)]
pub struct BlockMut<'a> {
    pub index: u8,
    pub data: &'a mut [u8],
}

impl<'a> BlockMut<'a> {
    pub fn new(index: u8, data: &'a mut [u8]) -> Self {
        BlockMut { index, data }
    }
}
