//! Benchmark workloads for the Vessel containers.
//!
//! - [`insertion_positions`]: deterministic pseudo-random insert indices
//! - [`filled`]: a `DynArray` of `n` ascending values at exact capacity

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vessel::DynArray;

/// Generate `n` insertion indices for an array that starts empty and grows
/// by one element per insert, so index `i` is always `<= i`.
///
/// Deterministic for a given seed.
pub fn insertion_positions(n: usize, seed: u64) -> Vec<usize> {
    (0..n)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((i as u64).wrapping_mul(1442695040888963407));
            (mixed >> 16) as usize % (i + 1)
        })
        .collect()
}

/// An array holding `0..n` with `capacity() == n`.
pub fn filled(n: usize) -> DynArray<u64> {
    DynArray::from_fn(n, |i| i as u64)
}
