//! PSHUFB-based GF(2^8) multiply-accumulate for x86_64.
//!
//! Implements the table-vector shuffle technique from James Plank's
//! "Screaming Fast Galois Field Arithmetic Using Intel SIMD Instructions":
//! split the byte being multiplied into its low and high nibble, look each
//! up in a 16-entry table via `pshufb`, and XOR the two partial products.
//!
//! Unlike the 16-bit-word split used for GF(2^16), GF(2^8) multiplication by
//! a constant maps a byte directly to a byte, so there is only one pair of
//! nibble tables per constant rather than two.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// AVX2 multiply-accumulate: processes 32 bytes per iteration.
///
/// # Safety
/// Caller must have verified `is_x86_feature_detected!("avx2")`. `lo`/`hi`
/// must each be 32 bytes containing the low/high nibble table duplicated
/// across both 128-bit lanes (see [`super::common::widen_nibble_table`]).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn muladd_avx2(
    input: &[u8],
    output: &mut [u8],
    lo: &[u8; 32],
    hi: &[u8; 32],
    row: &[u8; 256],
) {
    let len = input.len().min(output.len());
    let lo_vec = _mm256_loadu_si256(lo.as_ptr() as *const __m256i);
    let hi_vec = _mm256_loadu_si256(hi.as_ptr() as *const __m256i);
    let mask_0f = _mm256_set1_epi8(0x0F);

    let mut pos = 0;
    let end = (len / 32) * 32;
    while pos < end {
        let in_vec = _mm256_loadu_si256(input.as_ptr().add(pos) as *const __m256i);
        let out_vec = _mm256_loadu_si256(output.as_ptr().add(pos) as *const __m256i);

        let lo_nib = _mm256_and_si256(in_vec, mask_0f);
        let hi_nib = _mm256_and_si256(_mm256_srli_epi16(in_vec, 4), mask_0f);

        let lo_part = _mm256_shuffle_epi8(lo_vec, lo_nib);
        let hi_part = _mm256_shuffle_epi8(hi_vec, hi_nib);
        let product = _mm256_xor_si256(lo_part, hi_part);
        let result = _mm256_xor_si256(out_vec, product);

        _mm256_storeu_si256(output.as_mut_ptr().add(pos) as *mut __m256i, result);
        pos += 32;
    }

    super::common::muladd_scalar(&input[pos..len], &mut output[pos..len], row);
}

/// SSSE3 multiply-accumulate: processes 16 bytes per iteration.
///
/// # Safety
/// Caller must have verified `is_x86_feature_detected!("ssse3")`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
pub unsafe fn muladd_ssse3(
    input: &[u8],
    output: &mut [u8],
    lo: &[u8; 16],
    hi: &[u8; 16],
    row: &[u8; 256],
) {
    let len = input.len().min(output.len());
    let lo_vec = _mm_loadu_si128(lo.as_ptr() as *const __m128i);
    let hi_vec = _mm_loadu_si128(hi.as_ptr() as *const __m128i);
    let mask_0f = _mm_set1_epi8(0x0F);

    let mut pos = 0;
    let end = (len / 16) * 16;
    while pos < end {
        let in_vec = _mm_loadu_si128(input.as_ptr().add(pos) as *const __m128i);
        let out_vec = _mm_loadu_si128(output.as_ptr().add(pos) as *const __m128i);

        let lo_nib = _mm_and_si128(in_vec, mask_0f);
        let hi_nib = _mm_and_si128(_mm_srli_epi16(in_vec, 4), mask_0f);

        let lo_part = _mm_shuffle_epi8(lo_vec, lo_nib);
        let hi_part = _mm_shuffle_epi8(hi_vec, hi_nib);
        let product = _mm_xor_si128(lo_part, hi_part);
        let result = _mm_xor_si128(out_vec, product);

        _mm_storeu_si128(output.as_mut_ptr().add(pos) as *mut __m128i, result);
        pos += 16;
    }

    super::common::muladd_scalar(&input[pos..len], &mut output[pos..len], row);
}
