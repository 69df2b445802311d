//! Cauchy matrix construction.
//!
//! ## Index assignment
//!
//! One candidate assignment, `Y_j = j`, `X_i = recovery_count - 1 - i + 128`,
//! is not disjoint from `Y` for every valid parameter combination: at
//! `original_count = 255, recovery_count = 1` it gives `X_0 = 128`, which
//! collides with `Y_128 = 128` since `Y` ranges over all of `[0, 255)`. This
//! crate instead fixes:
//!
//! ```text
//! Y_j = j                              for j in [0, original_count)
//! X_i = original_count + i             for i in [0, recovery_count - 1)
//! ```
//!
//! which is trivially disjoint from `Y` for every combination satisfying
//! `original_count + recovery_count <= 256` (`X` and `Y` occupy disjoint
//! contiguous byte ranges), the same "check points after the message points"
//! convention a Vandermonde-based construction uses for its own bases
//! (assigning each input index the next usable base value in increasing
//! order).
//!
//! ## Recovery row 0
//!
//! Recovery index 0 carries all-ones coefficients (the cheap path for the
//! single-parity deployment shape), achieved here by defining row 0 directly
//! as the all-ones row rather than deriving it from `1/(X_i XOR Y_j)` for any
//! literal `X_0`. This is the Cauchy-matrix analogue of a Vandermonde
//! construction reserving exponent 0 for its first recovery slice, for which
//! `base.pow(0) == 1` regardless of `base`: the all-ones parity row falls out
//! of a degenerate case of the general formula, not a special-cased additive
//! scheme. The resulting extended matrix (one evaluation "at infinity" plus
//! `recovery_count - 1` genuine Cauchy rows) is the classical
//! point-at-infinity extension of a Generalized Reed-Solomon code and
//! remains MDS: every `X` (including the symbolic infinity row) and `Y`
//! value is pairwise distinct, which is exactly the condition Cauchy/GRS
//! matrices require for every square submatrix to be invertible.

use crate::error::CodingError;
use crate::field::Gf256;

/// A view onto the Cauchy coefficient matrix for one `(original_count,
/// recovery_count)` shape. Stateless beyond the two counts; coefficients are
/// computed on demand from the field's table lookups, which is cheap enough
/// that no caching is needed.
#[derive(Debug, Clone, Copy)]
pub struct CauchyMatrix {
    original_count: u8,
    recovery_count: u8,
}

impl CauchyMatrix {
    pub fn new(original_count: u8, recovery_count: u8) -> Self {
        CauchyMatrix {
            original_count,
            recovery_count,
        }
    }

    #[inline]
    fn y(original_index: u8) -> u8 {
        original_index
    }

    /// `X_i` for the genuine Cauchy rows, `i` in `[0, recovery_count - 1)`
    /// (recovery index `i + 1`). Row 0 is the all-ones row and has no `X`.
    #[inline]
    fn x(&self, cauchy_row: u8) -> u8 {
        self.original_count + cauchy_row
    }

    /// `C[recovery_index][original_index]`, the coefficient multiplying
    /// original block `original_index` when computing (or consuming, on
    /// decode) recovery block `recovery_index`.
    pub fn coefficient(&self, field: &Gf256, recovery_index: u8, original_index: u8) -> u8 {
        debug_assert!(recovery_index < self.recovery_count);
        debug_assert!(original_index < self.original_count);
        if recovery_index == 0 {
            return 1;
        }
        let x = self.x(recovery_index - 1);
        let y = Self::y(original_index);
        field.div(1, field.add(x, y))
    }

    /// Build the `recovery_rows.len()` by `missing_cols.len()` coefficient
    /// submatrix used to reconstruct `missing_cols` original indices from
    /// `recovery_rows` recovery indices. Every square submatrix of a Cauchy
    /// matrix is invertible (the MDS property), so this is
    /// always solvable regardless of which rows/columns are chosen, as long
    /// as the two slices are the same length.
    pub fn submatrix(&self, field: &Gf256, recovery_rows: &[u8], missing_cols: &[u8]) -> Vec<Vec<u8>> {
        recovery_rows
            .iter()
            .map(|&r| {
                missing_cols
                    .iter()
                    .map(|&c| self.coefficient(field, r, c))
                    .collect()
            })
            .collect()
    }
}

/// An `L*U` factorization of a square Cauchy submatrix: `L` unit lower
/// triangular, `U` upper triangular (its diagonal entries are the pivots,
/// i.e. the `D` of the classical "LDU" name: folding `D` into `U` avoids an
/// extra pass over the blocks at solve time), computed without pivoting.
/// Valid for any square submatrix of a Cauchy matrix because every leading
/// principal minor of such a submatrix is itself a square Cauchy submatrix,
/// hence nonsingular.
pub struct LduDecomposition {
    m: usize,
    /// Strictly-lower entries of `L`; the diagonal is implicitly 1.
    lower: Vec<Vec<u8>>,
    /// Upper-triangular entries of `U`, including the diagonal pivots.
    upper: Vec<Vec<u8>>,
}

impl LduDecomposition {
    /// Factor the `m x m` matrix `a` (row-major, `a[row][col]`).
    pub fn decompose(field: &Gf256, a: &[Vec<u8>]) -> Result<Self, CodingError> {
        let m = a.len();
        let mut lower = vec![vec![0u8; m]; m];
        let mut upper = vec![vec![0u8; m]; m];

        for i in 0..m {
            for j in i..m {
                let mut sum = a[i][j];
                for k in 0..i {
                    sum ^= field.mul(lower[i][k], upper[k][j]);
                }
                upper[i][j] = sum;
            }
            lower[i][i] = 1;
            if upper[i][i] == 0 {
                return Err(CodingError::Internal(
                    "zero pivot while factoring a Cauchy submatrix".to_string(),
                ));
            }
            for j in (i + 1)..m {
                let mut sum = a[j][i];
                for k in 0..i {
                    sum ^= field.mul(lower[j][k], upper[k][i]);
                }
                lower[j][i] = field.div(sum, upper[i][i]);
            }
        }

        Ok(LduDecomposition { m, lower, upper })
    }

    /// Solve `A * x = rhs` for `x`, where each entry of `rhs` is itself a
    /// byte block (the same scalar equation applied independently to every
    /// byte position). Returns the solution blocks in index order matching
    /// the columns the matrix was built with.
    pub fn solve_blocks(&self, field: &Gf256, rhs: &[Vec<u8>]) -> Vec<Vec<u8>> {
        let m = self.m;

        // Forward substitution: L * y = rhs (L unit lower, no division).
        let mut y: Vec<Vec<u8>> = Vec::with_capacity(m);
        for i in 0..m {
            let mut yi = rhs[i].clone();
            for k in 0..i {
                field.muladd_mem(&mut yi, self.lower[i][k], &y[k]);
            }
            y.push(yi);
        }

        // Back substitution: U * x = y, dividing by each pivot in turn.
        let mut x: Vec<Vec<u8>> = vec![Vec::new(); m];
        for i in (0..m).rev() {
            let mut yi = y[i].clone();
            for k in (i + 1)..m {
                field.muladd_mem(&mut yi, self.upper[i][k], &x[k]);
            }
            let mut xi = vec![0u8; yi.len()];
            field.div_mem(&mut xi, &yi, self.upper[i][i]);
            x[i] = xi;
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_zero_is_all_ones() {
        let field = Gf256::get().unwrap();
        let c = CauchyMatrix::new(10, 4);
        for j in 0..10u8 {
            assert_eq!(c.coefficient(field, 0, j), 1);
        }
    }

    #[test]
    fn x_and_y_are_disjoint_even_at_k255_r1() {
        let field = Gf256::get().unwrap();
        let c = CauchyMatrix::new(255, 1);
        // Only row 0 exists (all ones); there is no X to collide with Y.
        for j in 0..255u8 {
            assert_eq!(c.coefficient(field, 0, j), 1);
        }
    }

    #[test]
    fn x_and_y_are_disjoint_at_the_boundary() {
        // original_count + recovery_count == 256, the tightest legal shape.
        let c = CauchyMatrix::new(200, 56);
        for i in 0..55u8 {
            let x = c.x(i);
            for j in 0..200u8 {
                assert_ne!(x, CauchyMatrix::y(j), "x={} y={}", x, j);
            }
        }
    }

    #[test]
    fn every_coefficient_is_finite_and_nonzero() {
        // C[i][j] = 1/(X_i ^ Y_j); since X and Y are disjoint, X_i ^ Y_j is
        // never zero, so division is always by a nonzero divisor.
        let field = Gf256::get().unwrap();
        let c = CauchyMatrix::new(50, 20);
        for i in 0..20u8 {
            for j in 0..50u8 {
                let coeff = c.coefficient(field, i, j);
                assert_ne!(coeff, 0, "C[{}][{}] must be nonzero (field has no zero divisors)", i, j);
            }
        }
    }

    #[test]
    fn ldu_solves_a_small_cauchy_system() {
        let field = Gf256::get().unwrap();
        let c = CauchyMatrix::new(6, 3);
        let recovery_rows = [1u8, 2, 3];
        let missing_cols = [0u8, 3, 5];
        let a = c.submatrix(field, &recovery_rows, &missing_cols);

        // Pick a known "x" and derive rhs = A * x, then check the solver
        // recovers x exactly.
        let block_bytes = 4;
        let x_expected: Vec<Vec<u8>> = vec![vec![0xAA; block_bytes], vec![0x11; block_bytes], vec![0x7C; block_bytes]];
        let mut rhs = vec![vec![0u8; block_bytes]; 3];
        for row in 0..3 {
            for col in 0..3 {
                field.muladd_mem(&mut rhs[row], a[row][col], &x_expected[col]);
            }
        }

        let ldu = LduDecomposition::decompose(field, &a).unwrap();
        let x_actual = ldu.solve_blocks(field, &rhs);
        assert_eq!(x_actual, x_expected);
    }

    #[test]
    fn ldu_handles_a_single_equation() {
        let field = Gf256::get().unwrap();
        let c = CauchyMatrix::new(4, 2);
        let a = c.submatrix(field, &[1u8], &[2u8]);
        let x_expected = vec![vec![0x37u8, 0x42]];
        let mut rhs = vec![vec![0u8; 2]];
        field.muladd_mem(&mut rhs[0], a[0][0], &x_expected[0]);

        let ldu = LduDecomposition::decompose(field, &a).unwrap();
        let x_actual = ldu.solve_blocks(field, &rhs);
        assert_eq!(x_actual, x_expected);
    }
}
