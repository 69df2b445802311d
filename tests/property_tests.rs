//! Property-based round-trip coverage: for randomized `(original_count,
//! recovery_count, block_bytes)` shapes and randomized loss patterns,
//! `decode` always recovers exactly what `encode` started from.

use cauchy_rs::{decode, encode, Block, BlockMut, EncoderParams};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn run_round_trip(original_count: u8, recovery_count: u8, block_bytes: usize, seed: u64) {
    let params =
        EncoderParams::new(original_count as u32, recovery_count as u32, block_bytes).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);

    let originals: Vec<Vec<u8>> = (0..original_count)
        .map(|_| (0..block_bytes).map(|_| rng.gen()).collect())
        .collect();

    let blocks: Vec<Block> = originals
        .iter()
        .enumerate()
        .map(|(i, d)| Block::new(i as u8, d))
        .collect();
    let mut recovery = vec![0u8; recovery_count as usize * block_bytes];
    encode(&params, &blocks, &mut recovery).unwrap();

    let lose_count = rng.gen_range(0..=recovery_count);
    let mut lost_indices: Vec<u8> = (0..original_count).collect();
    // Fisher-Yates partial shuffle to pick `lose_count` distinct losses.
    for i in 0..lose_count as usize {
        let j = rng.gen_range(i..lost_indices.len());
        lost_indices.swap(i, j);
    }
    let lost: Vec<u8> = lost_indices[..lose_count as usize].to_vec();

    let mut data: Vec<Vec<u8>> = Vec::with_capacity(original_count as usize);
    let mut indices: Vec<u8> = Vec::with_capacity(original_count as usize);
    let mut next_recovery = 0u8;
    for i in 0..original_count {
        if lost.contains(&i) {
            let start = next_recovery as usize * block_bytes;
            data.push(recovery[start..start + block_bytes].to_vec());
            indices.push(original_count + next_recovery);
            next_recovery += 1;
        } else {
            data.push(originals[i as usize].clone());
            indices.push(i);
        }
    }

    let mut blocks: Vec<BlockMut> = data
        .iter_mut()
        .zip(indices.iter())
        .map(|(d, &idx)| BlockMut::new(idx, d))
        .collect();
    decode(&params, &mut blocks).unwrap();

    for i in 0..original_count {
        let block = blocks.iter().find(|b| b.index == i).unwrap();
        assert_eq!(block.data, &originals[i as usize][..]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trips_for_arbitrary_shapes_and_losses(
        original_count in 1u8..=40,
        recovery_extra in 1u8..=20,
        block_bytes in 1usize..=200,
        seed in any::<u64>(),
    ) {
        let recovery_count = recovery_extra.min(255 - original_count).max(1);
        run_round_trip(original_count, recovery_count, block_bytes, seed);
    }
}

#[test]
fn deterministic_seed_always_reproduces_the_same_result() {
    for seed in 0u64..20 {
        run_round_trip(12, 5, 48, seed);
    }
}
