//! Seeded random pairing.
//!
//! The pool is shuffled with the game's injected RNG and chunked into
//! disjoint pairs; an odd pool leaves exactly one player with a bye.
//! Same seed, same pool, same pairs — pairing is the engine's only
//! random draw, so reproducibility starts here.

use crate::core::{GameRng, PlayerId};

/// Draw disjoint pairs from the pool.
///
/// Returns the pairs in draw order, plus the bye player when the pool
/// is odd. An empty or single-player pool yields no pairs.
pub fn draw_pairs(
    pool: &[PlayerId],
    rng: &mut GameRng,
) -> (Vec<(PlayerId, PlayerId)>, Option<PlayerId>) {
    let mut shuffled = pool.to_vec();
    rng.shuffle(&mut shuffled);

    let mut pairs = Vec::with_capacity(shuffled.len() / 2);
    let mut chunks = shuffled.chunks_exact(2);
    for chunk in &mut chunks {
        pairs.push((chunk[0], chunk[1]));
    }
    let bye = chunks.remainder().first().copied();

    (pairs, bye)
}
