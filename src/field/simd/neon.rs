//! NEON-based GF(2^8) multiply-accumulate for aarch64.
//!
//! Same nibble-table-shuffle technique as the x86_64 PSHUFB kernel
//! (`vqtbl1q_u8` is ARM's table lookup, equivalent to `pshufb`), processing
//! 16 bytes per iteration.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// # Safety
/// Caller must be running on an aarch64 target with NEON available (NEON is
/// mandatory on aarch64, so this is safe on that architecture unconditionally;
/// the function is still marked unsafe for symmetry with the other tiers and
/// because it dereferences raw slice pointers via intrinsics).
#[cfg(target_arch = "aarch64")]
pub unsafe fn muladd_neon(input: &[u8], output: &mut [u8], lo: &[u8; 16], hi: &[u8; 16], row: &[u8; 256]) {
    let len = input.len().min(output.len());
    let lo_vec = vld1q_u8(lo.as_ptr());
    let hi_vec = vld1q_u8(hi.as_ptr());
    let mask_0f = vdupq_n_u8(0x0F);

    let mut pos = 0;
    let end = (len / 16) * 16;
    while pos < end {
        let in_vec = vld1q_u8(input.as_ptr().add(pos));
        let out_vec = vld1q_u8(output.as_ptr().add(pos));

        let lo_nib = vandq_u8(in_vec, mask_0f);
        let hi_nib = vandq_u8(vshrq_n_u8(in_vec, 4), mask_0f);

        let lo_part = vqtbl1q_u8(lo_vec, lo_nib);
        let hi_part = vqtbl1q_u8(hi_vec, hi_nib);
        let product = veorq_u8(lo_part, hi_part);
        let result = veorq_u8(out_vec, product);

        vst1q_u8(output.as_mut_ptr().add(pos), result);
        pos += 16;
    }

    super::common::muladd_scalar(&input[pos..len], &mut output[pos..len], row);
}
