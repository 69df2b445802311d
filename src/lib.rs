//! Cauchy-matrix Reed-Solomon erasure coding over GF(2^8).
//!
//! Given `original_count` data blocks, [`encode`] computes `recovery_count`
//! parity blocks such that any `original_count` blocks out of the combined
//! `original_count + recovery_count` (originals plus recoveries) suffice to
//! reconstruct the rest via [`decode`]. All arithmetic happens in GF(2^8)
//! with the fixed generator polynomial 0x11D; the coefficient matrix is an
//! extended Cauchy matrix (see [`cauchy`] for the extension), which
//! guarantees every square submatrix is invertible: any `original_count`
//! surviving blocks, in any combination, are enough to recover the rest.
//!
//! ## Layout
//!
//! - [`field`]: the GF(2^8) arithmetic engine, scalar table lookups and
//!   SIMD-dispatching bulk buffer operations.
//! - [`cauchy`]: the coefficient matrix and the linear solver used to
//!   invert it during decode.
//! - [`block`]: [`EncoderParams`], [`Block`], and [`BlockMut`], the shared
//!   vocabulary between encode and decode.
//! - [`encoder`] / [`decoder`]: the two public operations.
//! - [`error`]: the error taxonomy shared by both.
//!
//! ## Example
//!
//! ```
//! use cauchy_rs::{decode, encode, Block, BlockMut, EncoderParams};
//!
//! let params = EncoderParams::new(4, 2, 16).unwrap();
//! let originals: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 16]).collect();
//! let blocks: Vec<Block> = originals
//!     .iter()
//!     .enumerate()
//!     .map(|(i, d)| Block::new(i as u8, d))
//!     .collect();
//!
//! let mut recovery = vec![0u8; 2 * 16];
//! encode(&params, &blocks, &mut recovery).unwrap();
//!
//! // Lose original block 1 and 3, recover them from recovery blocks 0 and 1.
//! let mut data: Vec<Vec<u8>> = vec![
//!     originals[0].clone(),
//!     recovery[0..16].to_vec(),
//!     originals[2].clone(),
//!     recovery[16..32].to_vec(),
//! ];
//! let indices = [0u8, 4, 2, 5];
//! let mut blocks: Vec<BlockMut> = data
//!     .iter_mut()
//!     .zip(indices.iter())
//!     .map(|(d, &idx)| BlockMut::new(idx, d))
//!     .collect();
//! decode(&params, &mut blocks).unwrap();
//! assert_eq!(blocks[1].data, &originals[1][..]);
//! assert_eq!(blocks[3].data, &originals[3][..]);
//! ```

pub mod block;
pub mod cauchy;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod field;

pub use block::{Block, BlockMut, EncoderParams};
pub use decoder::decode;
pub use encoder::encode;
pub use error::{CodingError, InputError, ParameterError};
pub use field::Gf256;
pub use field::simd::SimdTier;
