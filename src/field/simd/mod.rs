//! Runtime CPU-capability dispatch for the GF(2^8) multiply-buffer kernels.
//!
//! An enum of capability tiers, a one-shot probe cached behind a `OnceLock`,
//! and a `match` that calls into the fastest kernel the running CPU
//! supports, with a scalar tail for the remainder. The portable tier is a
//! plain stable-Rust scalar loop, keeping the crate on stable Rust.

pub mod common;
#[cfg(target_arch = "x86_64")]
pub mod pshufb;
#[cfg(target_arch = "aarch64")]
pub mod neon;

/// Which multiply-buffer kernel this process will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdTier {
    /// x86_64 AVX2 (256-bit PSHUFB).
    Avx2,
    /// x86_64 SSSE3 (128-bit PSHUFB).
    Ssse3,
    /// aarch64 NEON (128-bit table lookup).
    Neon,
    /// No recognized vector tier; scalar table lookups only.
    Portable,
}

/// Probe the running CPU for the best available tier. Called once at
/// [`super::Gf256`] initialization and cached.
pub fn detect() -> SimdTier {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            return SimdTier::Avx2;
        }
        if is_x86_feature_detected!("ssse3") {
            return SimdTier::Ssse3;
        }
        return SimdTier::Portable;
    }

    #[cfg(target_arch = "aarch64")]
    {
        return SimdTier::Neon;
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdTier::Portable
    }
}

/// Minimum buffer length worth handing to a vector kernel; below this the
/// scalar loop runs directly and a kernel dispatch would only add overhead.
pub const MIN_VECTOR_LEN: usize = 16;

/// Dispatch a multiply-accumulate (`output[i] ^= row[input[i]]`) to the
/// tier's kernel, falling back to scalar for short buffers or an
/// unrecognized tier.
///
/// `lo16`/`hi16` are the 16-byte nibble tables; `lo32`/`hi32` are the same
/// tables widened to 32 bytes for the AVX2 kernel (see
/// [`common::widen_nibble_table`]). `row` is the full 256-entry row, used
/// for the scalar tail and as the whole-buffer path when no vector tier
/// applies.
#[allow(clippy::too_many_arguments)]
pub fn muladd_dispatch(
    tier: SimdTier,
    input: &[u8],
    output: &mut [u8],
    lo16: &[u8; 16],
    hi16: &[u8; 16],
    lo32: &[u8; 32],
    hi32: &[u8; 32],
    row: &[u8; 256],
) {
    let len = input.len().min(output.len());
    if len < MIN_VECTOR_LEN {
        common::muladd_scalar(input, output, row);
        return;
    }

    match tier {
        SimdTier::Avx2 => {
            #[cfg(target_arch = "x86_64")]
            {
                if is_x86_feature_detected!("avx2") {
                    unsafe {
                        pshufb::muladd_avx2(input, output, lo32, hi32, row);
                    }
                    return;
                }
            }
            common::muladd_scalar(input, output, row);
        }
        SimdTier::Ssse3 => {
            #[cfg(target_arch = "x86_64")]
            {
                if is_x86_feature_detected!("ssse3") {
                    unsafe {
                        pshufb::muladd_ssse3(input, output, lo16, hi16, row);
                    }
                    return;
                }
            }
            common::muladd_scalar(input, output, row);
        }
        SimdTier::Neon => {
            #[cfg(target_arch = "aarch64")]
            unsafe {
                neon::muladd_neon(input, output, lo16, hi16, row);
            }
            #[cfg(not(target_arch = "aarch64"))]
            common::muladd_scalar(input, output, row);
        }
        SimdTier::Portable => {
            common::muladd_scalar(input, output, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_returns_a_tier() {
        let tier = detect();
        #[cfg(target_arch = "x86_64")]
        assert_ne!(tier, SimdTier::Neon);
        #[cfg(target_arch = "aarch64")]
        assert_eq!(tier, SimdTier::Neon);
    }

    fn reference_row(y: u8) -> [u8; 256] {
        // Peasant multiplication using the canonical 0x11D polynomial,
        // independent of Gf256's own tables, as an oracle for the dispatch
        // tests below.
        let mut row = [0u8; 256];
        for x in 0..256usize {
            let mut a = x as u8;
            let mut b = y;
            let mut result = 0u8;
            for _ in 0..8 {
                if b & 1 != 0 {
                    result ^= a;
                }
                let carry = a & 0x80 != 0;
                a <<= 1;
                if carry {
                    a ^= 0x1D;
                }
                b >>= 1;
            }
            row[x] = result;
        }
        row
    }

    #[test]
    fn muladd_dispatch_matches_scalar_for_every_tier_and_length() {
        let row = reference_row(0x53);
        let (lo16, hi16) = common::split_nibble_tables(&row);
        let lo32 = common::widen_nibble_table(&lo16);
        let hi32 = common::widen_nibble_table(&hi16);

        for &len in &[0usize, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 200] {
            let input: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let mut expected = vec![0xAAu8; len];
            common::muladd_scalar(&input, &mut expected, &row);

            for tier in [
                SimdTier::Avx2,
                SimdTier::Ssse3,
                SimdTier::Neon,
                SimdTier::Portable,
            ] {
                let mut actual = vec![0xAAu8; len];
                muladd_dispatch(tier, &input, &mut actual, &lo16, &hi16, &lo32, &hi32, &row);
                assert_eq!(actual, expected, "tier {:?} length {}", tier, len);
            }
        }
    }
}
