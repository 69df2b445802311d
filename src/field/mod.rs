//! GF(2^8) arithmetic engine: scalar operations, precomputed tables, and the
//! SIMD-dispatching bulk buffer operations built on top of them.
//!
//! A process-wide, lazily-initialized table set backs cheap scalar lookups,
//! with a capability-tiered dispatcher for the buffer multiply kernels.

pub mod simd;

use simd::SimdTier;
use std::sync::OnceLock;

use crate::error::CodingError;

/// Default PAR2/leopard-style GF(2^8) generator polynomial, 0x11D with the
/// high bit implicit. Fixed for this crate; no alternate-polynomial table
/// is carried since there is exactly one deployment convention to support.
const POLY: u16 = 0x11D;

/// A known self-test vector and its expected product, checked at init time:
/// 0x53 and 0x8C are multiplicative inverses of each other in GF(2^8) with
/// polynomial 0x11D and primitive element 0x02.
const SELF_TEST_A: u8 = 0x53;
const SELF_TEST_B: u8 = 0x8C;
const SELF_TEST_PRODUCT: u8 = 0x01;

/// The process-wide GF(2^8) table set and SIMD capability tier.
///
/// Immutable after construction; any number of threads may share a `&Gf256`
/// concurrently. Obtain the single process-wide instance via [`Gf256::get`].
pub struct Gf256 {
    log: [u16; 256],
    exp: Vec<u8>,
    mul: Box<[[u8; 256]; 256]>,
    div: Box<[[u8; 256]; 256]>,
    inv: [u8; 256],
    sqr: [u8; 256],
    table_lo: Box<[[u8; 16]; 256]>,
    table_hi: Box<[[u8; 16]; 256]>,
    table_lo_wide: Box<[[u8; 32]; 256]>,
    table_hi_wide: Box<[[u8; 32]; 256]>,
    tier: SimdTier,
}

static FIELD: OnceLock<Gf256> = OnceLock::new();

impl Gf256 {
    /// Return the process-wide field instance, performing one-shot
    /// initialization (table construction, SIMD probe, self-test) on first
    /// call. Idempotent; safe to call from any number of threads. There is
    /// no separate init call; `OnceLock` already gives the happens-before
    /// guarantee needed between init and first use.
    pub fn get() -> Result<&'static Gf256, CodingError> {
        if let Some(field) = FIELD.get() {
            return Ok(field);
        }
        let field = Gf256::build();
        field.self_test()?;
        log::debug!(
            "gf256 field initialized: polynomial=0x{:X} simd_tier={:?}",
            POLY,
            field.tier
        );
        Ok(FIELD.get_or_init(|| field))
    }

    fn build() -> Gf256 {
        let tier = simd::detect();

        // EXP/LOG tables: walk the multiplicative group generated by 0x02
        // (a primitive element for 0x11D) and record discrete logs.
        let mut log = [0u16; 256];
        let mut exp_base = [0u8; 255];
        let mut x = 1u16;
        for i in 0..255usize {
            exp_base[i] = x as u8;
            log[x as usize] = i as u16;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= POLY;
            }
        }
        // LOG[0] is a sentinel; no discrete log exists for zero.
        log[0] = 255;

        // EXP doubled and extended so `exp[log_sum]` never needs a modulo
        // when log_sum is computed as a raw (possibly >254) sum of two logs
        // in [0,254].
        let mut exp = vec![0u8; 255 * 2 + 1];
        for i in 0..exp.len() {
            exp[i] = exp_base[i % 255];
        }

        let mut inv = [0u8; 256];
        for x in 1..256usize {
            // x^-1 = g^(255 - log(x)) = g^(-log(x) mod 255)
            let lx = log[x] as usize;
            inv[x] = exp[255 - lx];
        }
        // INV[0] = 0 by convention.

        let mut sqr = [0u8; 256];
        for x in 0..256usize {
            sqr[x] = Self::mul_raw(&log, &exp, x as u8, x as u8);
        }

        let mut mul = Box::new([[0u8; 256]; 256]);
        let mut div = Box::new([[0u8; 256]; 256]);
        for y in 0..256usize {
            for x in 0..256usize {
                mul[y][x] = Self::mul_raw(&log, &exp, x as u8, y as u8);
                div[y][x] = if y == 0 {
                    0
                } else {
                    Self::div_raw(&log, &exp, x as u8, y as u8)
                };
            }
        }

        let mut table_lo = Box::new([[0u8; 16]; 256]);
        let mut table_hi = Box::new([[0u8; 16]; 256]);
        let mut table_lo_wide = Box::new([[0u8; 32]; 256]);
        let mut table_hi_wide = Box::new([[0u8; 32]; 256]);
        for y in 0..256usize {
            let (lo, hi) = simd::common::split_nibble_tables(&mul[y]);
            table_lo_wide[y] = simd::common::widen_nibble_table(&lo);
            table_hi_wide[y] = simd::common::widen_nibble_table(&hi);
            table_lo[y] = lo;
            table_hi[y] = hi;
        }

        Gf256 {
            log,
            exp,
            mul,
            div,
            inv,
            sqr,
            table_lo,
            table_hi,
            table_lo_wide,
            table_hi_wide,
            tier,
        }
    }

    fn mul_raw(log: &[u16; 256], exp: &[u8], x: u8, y: u8) -> u8 {
        if x == 0 || y == 0 {
            return 0;
        }
        exp[log[x as usize] as usize + log[y as usize] as usize]
    }

    fn div_raw(log: &[u16; 256], exp: &[u8], x: u8, y: u8) -> u8 {
        // Caller guarantees y != 0.
        if x == 0 {
            return 0;
        }
        let lx = log[x as usize] as i32;
        let ly = log[y as usize] as i32;
        let diff = ((lx - ly).rem_euclid(255)) as usize;
        exp[diff]
    }

    fn self_test(&self) -> Result<(), CodingError> {
        if self.mul(SELF_TEST_A, SELF_TEST_B) != SELF_TEST_PRODUCT {
            return Err(CodingError::Init);
        }
        if self.div(self.mul(7, 41), 41) != 7 {
            return Err(CodingError::Init);
        }
        if self.inv(1) != 1 || self.inv(0) != 0 {
            return Err(CodingError::Init);
        }
        Ok(())
    }

    /// Which SIMD tier this field instance will use for buffer multiplies.
    pub fn simd_tier(&self) -> SimdTier {
        self.tier
    }

    // ---- Scalar operations ----

    #[inline]
    pub fn add(&self, x: u8, y: u8) -> u8 {
        x ^ y
    }

    #[inline]
    pub fn mul(&self, x: u8, y: u8) -> u8 {
        self.mul[y as usize][x as usize]
    }

    /// Division; result for `y == 0` is unspecified but never faults.
    /// Callers never divide by zero.
    #[inline]
    pub fn div(&self, x: u8, y: u8) -> u8 {
        self.div[y as usize][x as usize]
    }

    #[inline]
    pub fn inv(&self, x: u8) -> u8 {
        self.inv[x as usize]
    }

    #[inline]
    pub fn sqr(&self, x: u8) -> u8 {
        self.sqr[x as usize]
    }

    // ---- Bulk buffer operations ----

    /// `x[i] ^= y[i]` for all i.
    pub fn add_mem(&self, x: &mut [u8], y: &[u8]) {
        let n = x.len().min(y.len());
        for i in 0..n {
            x[i] ^= y[i];
        }
    }

    /// `z[i] ^= x[i] ^ y[i]`.
    pub fn add2_mem(&self, z: &mut [u8], x: &[u8], y: &[u8]) {
        let n = z.len().min(x.len()).min(y.len());
        for i in 0..n {
            z[i] ^= x[i] ^ y[i];
        }
    }

    /// `z[i] = x[i] ^ y[i]`.
    pub fn addset_mem(&self, z: &mut [u8], x: &[u8], y: &[u8]) {
        let n = z.len().min(x.len()).min(y.len());
        for i in 0..n {
            z[i] = x[i] ^ y[i];
        }
    }

    /// `z[i] = x[i] * y` (y is a scalar constant).
    pub fn mul_mem(&self, z: &mut [u8], x: &[u8], y: u8) {
        if y == 0 {
            let n = z.len().min(x.len());
            for b in &mut z[..n] {
                *b = 0;
            }
            return;
        }
        if y == 1 {
            let n = z.len().min(x.len());
            z[..n].copy_from_slice(&x[..n]);
            return;
        }
        let row = &self.mul[y as usize];
        let n = z.len().min(x.len());
        simd::common::mul_scalar(&x[..n], &mut z[..n], row);
    }

    /// `z[i] ^= x[i] * y` (y is a scalar constant). The hot path of both
    /// encoder and decoder.
    pub fn muladd_mem(&self, z: &mut [u8], y: u8, x: &[u8]) {
        if y == 0 {
            return;
        }
        if y == 1 {
            self.add_mem(z, x);
            return;
        }
        let n = z.len().min(x.len());
        simd::muladd_dispatch(
            self.tier,
            &x[..n],
            &mut z[..n],
            &self.table_lo[y as usize],
            &self.table_hi[y as usize],
            &self.table_lo_wide[y as usize],
            &self.table_hi_wide[y as usize],
            &self.mul[y as usize],
        );
    }

    /// `z[i] = x[i] / y`. Implemented as `mul_mem` by `INV[y]`; `y == 1`
    /// short-circuits to a copy.
    pub fn div_mem(&self, z: &mut [u8], x: &[u8], y: u8) {
        if y == 1 {
            let n = z.len().min(x.len());
            z[..n].copy_from_slice(&x[..n]);
            return;
        }
        self.mul_mem(z, x, self.inv(y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> &'static Gf256 {
        Gf256::get().expect("field self-test must pass")
    }

    #[test]
    fn add_is_involution() {
        let f = field();
        for x in 0..256u16 {
            for y in (0..256u16).step_by(17) {
                let x = x as u8;
                let y = y as u8;
                assert_eq!(f.add(f.add(x, y), y), x);
            }
        }
    }

    #[test]
    fn div_undoes_mul_for_every_nonzero_divisor() {
        let f = field();
        for x in 0..256u16 {
            for y in 1..256u16 {
                let x = x as u8;
                let y = y as u8;
                assert_eq!(f.div(f.mul(x, y), y), x, "x={} y={}", x, y);
            }
        }
    }

    #[test]
    fn inv_is_multiplicative_inverse() {
        let f = field();
        for y in 1..256u16 {
            let y = y as u8;
            assert_eq!(f.mul(f.inv(y), y), 1, "y={}", y);
        }
        assert_eq!(f.inv(0), 0);
    }

    #[test]
    fn sqr_matches_self_multiply() {
        let f = field();
        for x in 0..256u16 {
            let x = x as u8;
            assert_eq!(f.sqr(x), f.mul(x, x));
        }
    }

    #[test]
    fn mul_by_zero_and_one() {
        let f = field();
        for x in 0..256u16 {
            let x = x as u8;
            assert_eq!(f.mul(x, 0), 0);
            assert_eq!(f.mul(x, 1), x);
        }
    }

    #[test]
    fn self_test_passes_on_the_shared_instance() {
        field().self_test().expect("self-test must succeed");
    }

    #[test]
    fn muladd_mem_matches_scalar_reference_for_assorted_lengths_and_coefficients() {
        let f = field();
        for &y in &[0u8, 1, 2, 7, 0x53, 0xFF] {
            for &n in &[0usize, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65] {
                let x: Vec<u8> = (0..n).map(|i| (i * 31 + 3) as u8).collect();
                let mut z: Vec<u8> = (0..n).map(|i| (i * 5 + 9) as u8).collect();
                let mut expected = z.clone();

                f.muladd_mem(&mut z, y, &x);
                for i in 0..n {
                    expected[i] ^= f.mul(x[i], y);
                }
                assert_eq!(z, expected, "y={} n={}", y, n);
            }
        }
    }

    #[test]
    fn mul_mem_matches_scalar_reference() {
        let f = field();
        let x: Vec<u8> = (0..200u32).map(|i| (i * 13) as u8).collect();
        for &y in &[0u8, 1, 2, 200] {
            let mut z = vec![0u8; x.len()];
            f.mul_mem(&mut z, &x, y);
            for i in 0..x.len() {
                assert_eq!(z[i], f.mul(x[i], y));
            }
        }
    }

    #[test]
    fn div_mem_undoes_mul_mem() {
        let f = field();
        let x: Vec<u8> = (0..64u32).map(|i| (i * 7 + 1) as u8).collect();
        for &y in &[1u8, 2, 9, 250] {
            let mut mulled = vec![0u8; x.len()];
            f.mul_mem(&mut mulled, &x, y);
            let mut restored = vec![0u8; x.len()];
            f.div_mem(&mut restored, &mulled, y);
            assert_eq!(restored, x, "y={}", y);
        }
    }

    #[test]
    fn add_mem_xors_in_place() {
        let f = field();
        let mut x = vec![0xFFu8, 0x0F, 0xAA];
        let y = vec![0x0Fu8, 0xFF, 0xAA];
        f.add_mem(&mut x, &y);
        assert_eq!(x, vec![0xF0, 0xF0, 0x00]);
    }

    #[test]
    fn addset_and_add2_agree() {
        let f = field();
        let x = vec![1u8, 2, 3, 4];
        let y = vec![5u8, 6, 7, 8];
        let mut z1 = vec![0u8; 4];
        f.addset_mem(&mut z1, &x, &y);

        let mut z2 = vec![0xFFu8; 4];
        let before = z2.clone();
        f.add2_mem(&mut z2, &x, &y);
        for i in 0..4 {
            assert_eq!(z2[i], before[i] ^ x[i] ^ y[i]);
        }
    }
}
