//! Recovery-block computation.
//!
//! Walks each recovery slice and multiply-accumulates every input slice into
//! it through the bulk buffer ops: a two-nested-loop shape over Cauchy
//! coefficients and GF(2^8) bytes.

use crate::block::{Block, EncoderParams};
use crate::cauchy::CauchyMatrix;
use crate::error::{CodingError, InputError, ParameterError};
use crate::field::Gf256;

/// Compute `params.recovery_count()` recovery blocks from a complete set of
/// original blocks.
///
/// `originals` must contain exactly `params.original_count()` blocks, one per
/// index in `[0, original_count)`, each with `index < original_count`, no
/// duplicates, and `data.len() == params.block_bytes()`. `recovery_out` must
/// be exactly `params.recovery_count() * params.block_bytes()` bytes and is
/// organized as `recovery_count` contiguous blocks of `block_bytes` each, in
/// increasing recovery-index order; recovery block `i` is written
/// unconditionally (no accumulation with caller-supplied content).
pub fn encode(
    params: &EncoderParams,
    originals: &[Block<'_>],
    recovery_out: &mut [u8],
) -> Result<(), CodingError> {
    let field = Gf256::get()?;
    let block_bytes = params.block_bytes();
    let original_count = params.original_count();
    let recovery_count = params.recovery_count();

    if originals.len() != original_count as usize {
        return Err(InputError::WrongOriginalCount {
            expected: original_count as u32,
            actual: originals.len(),
        }
        .into());
    }

    let expected_recovery_bytes = recovery_count as usize * block_bytes;
    if recovery_out.len() != expected_recovery_bytes {
        return Err(ParameterError::RecoveryBufferWrongSize {
            expected: recovery_count as u32,
            expected_bytes: expected_recovery_bytes,
            actual_bytes: recovery_out.len(),
        }
        .into());
    }

    let mut seen = vec![false; original_count as usize];
    for block in originals {
        if !params.is_original_index(block.index) {
            return Err(InputError::IndexOutOfRange {
                index: block.index,
                original_count,
                recovery_count,
            }
            .into());
        }
        if seen[block.index as usize] {
            return Err(InputError::DuplicateIndex(block.index).into());
        }
        seen[block.index as usize] = true;
        if block.data.len() != block_bytes {
            return Err(InputError::MismatchedBlockLength {
                expected: block_bytes,
                actual: block.data.len(),
                at: block.index as usize,
            }
            .into());
        }
    }

    log::trace!(
        "encode: {} originals, {} recovery blocks, {} bytes each",
        original_count,
        recovery_count,
        block_bytes
    );

    let cauchy = CauchyMatrix::new(original_count, recovery_count);

    for recovery_index in 0..recovery_count {
        let out = &mut recovery_out
            [recovery_index as usize * block_bytes..(recovery_index as usize + 1) * block_bytes];
        out.fill(0);

        if recovery_index == 0 {
            // Row 0 is all ones: a plain XOR parity, no table lookups.
            for block in originals {
                field.add_mem(out, block.data);
            }
            continue;
        }

        for block in originals {
            let coeff = cauchy.coefficient(field, recovery_index, block.index);
            field.muladd_mem(out, coeff, block.data);
        }
    }

    Ok(())
}
