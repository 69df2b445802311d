//! Erasure reconstruction from a surviving mix of original and recovery
//! blocks.
//!
//! Identify what is missing, gather what recovery data is on hand, and
//! solve: partition, then a degenerate check, then a fast path for a single
//! erasure, then a general Cauchy-LDU path for more than one.

use crate::block::{BlockMut, EncoderParams};
use crate::cauchy::{CauchyMatrix, LduDecomposition};
use crate::error::{CodingError, InputError};
use crate::field::Gf256;

/// Reconstruct every missing original block in place.
///
/// `blocks` must contain exactly `params.original_count()` entries: one per
/// original index that survived, holding its original data unchanged, and
/// one per recovery block supplied as a substitute for some missing
/// original, holding that recovery block's data under its recovery index
/// (`original_count + position`). No index may repeat and every index must
/// be in `[0, original_count + recovery_count)`.
///
/// On success, every block that started out holding recovery data is
/// rewritten in place with the reconstructed original data and its `index`
/// updated to the original index it now represents; blocks that were
/// already original are left untouched. If every original block was already
/// present, this is a no-op.
pub fn decode(params: &EncoderParams, blocks: &mut [BlockMut<'_>]) -> Result<(), CodingError> {
    let field = Gf256::get()?;
    let original_count = params.original_count();
    let recovery_count = params.recovery_count();
    let block_bytes = params.block_bytes();

    if blocks.len() != original_count as usize {
        return Err(InputError::WrongBlockCount {
            expected: original_count as u32,
            actual: blocks.len(),
        }
        .into());
    }

    let mut present_original = vec![false; original_count as usize];
    // (position in `blocks`, recovery index) for every substitute supplied.
    let mut recovery_slots: Vec<(usize, u8)> = Vec::new();
    let mut seen_indices = vec![false; params.total_count() as usize];

    for (pos, block) in blocks.iter().enumerate() {
        let index = block.index;
        if index as u16 >= params.total_count() {
            return Err(InputError::IndexOutOfRange {
                index,
                original_count,
                recovery_count,
            }
            .into());
        }
        if seen_indices[index as usize] {
            return Err(InputError::DuplicateIndex(index).into());
        }
        seen_indices[index as usize] = true;

        if block.data.len() != block_bytes {
            return Err(InputError::MismatchedBlockLength {
                expected: block_bytes,
                actual: block.data.len(),
                at: pos,
            }
            .into());
        }

        if let Some(recovery_position) = params.recovery_position(index) {
            recovery_slots.push((pos, recovery_position));
        } else {
            present_original[index as usize] = true;
        }
    }

    let missing_indices: Vec<u8> = (0..original_count)
        .filter(|&i| !present_original[i as usize])
        .collect();

    // Invariant: with exactly `original_count` distinct blocks partitioned
    // between originals and recoveries, the counts always balance. Checked
    // explicitly rather than assumed, since a future relaxation of the
    // exact-length contract would make this reachable.
    if recovery_slots.len() < missing_indices.len() {
        return Err(InputError::UnderDetermined {
            missing: missing_indices.len(),
            available: recovery_slots.len(),
        }
        .into());
    }
    if recovery_slots.len() > missing_indices.len() {
        return Err(InputError::OverDetermined {
            missing: missing_indices.len(),
            available: recovery_slots.len(),
        }
        .into());
    }

    log::trace!(
        "decode initialized: {} erasures, {} recovery blocks supplied",
        missing_indices.len(),
        recovery_slots.len()
    );

    if missing_indices.is_empty() {
        log::trace!("decode solved: no erasures, nothing to reconstruct");
        return Ok(());
    }

    let cauchy = CauchyMatrix::new(original_count, recovery_count);

    if missing_indices.len() == 1 {
        log::trace!("decode solving: single erasure, fast path");
        let missing_index = missing_indices[0];
        let (slot_pos, recovery_index) = recovery_slots[0];

        let mut rhs = vec![0u8; block_bytes];
        rhs.copy_from_slice(&*blocks[slot_pos].data);
        for (pos, block) in blocks.iter().enumerate() {
            if pos == slot_pos {
                continue;
            }
            let coeff = cauchy.coefficient(field, recovery_index, block.index);
            field.muladd_mem(&mut rhs, coeff, &*block.data);
        }

        let coeff = cauchy.coefficient(field, recovery_index, missing_index);
        if coeff == 1 {
            // Recovery index 0's all-ones row: no division needed.
            blocks[slot_pos].data.copy_from_slice(&rhs);
        } else {
            let mut solved = vec![0u8; block_bytes];
            field.div_mem(&mut solved, &rhs, coeff);
            blocks[slot_pos].data.copy_from_slice(&solved);
        }
        blocks[slot_pos].index = missing_index;
        log::trace!("decode solved: single erasure restored at index {}", missing_index);
        return Ok(());
    }

    log::trace!(
        "decode solving: {} simultaneous erasures, Cauchy-LDU path",
        missing_indices.len()
    );
    let recovery_rows: Vec<u8> = recovery_slots.iter().map(|&(_, r)| r).collect();
    let matrix = cauchy.submatrix(field, &recovery_rows, &missing_indices);
    let ldu = LduDecomposition::decompose(field, &matrix).inspect_err(|e| {
        log::error!("decode failed: {}", e);
    })?;

    let mut rhs: Vec<Vec<u8>> = Vec::with_capacity(recovery_slots.len());
    for &(slot_pos, recovery_index) in &recovery_slots {
        let mut r = vec![0u8; block_bytes];
        r.copy_from_slice(&*blocks[slot_pos].data);
        for block in blocks.iter() {
            if params.recovery_position(block.index).is_some() {
                continue;
            }
            let coeff = cauchy.coefficient(field, recovery_index, block.index);
            field.muladd_mem(&mut r, coeff, &*block.data);
        }
        rhs.push(r);
    }

    let solved = ldu.solve_blocks(field, &rhs);

    for (slot_index, &(slot_pos, _)) in recovery_slots.iter().enumerate() {
        blocks[slot_pos].data.copy_from_slice(&solved[slot_index]);
        blocks[slot_pos].index = missing_indices[slot_index];
    }

    log::trace!("decode solved: {} erasures restored", missing_indices.len());
    Ok(())
}
