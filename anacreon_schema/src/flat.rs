//! Helpers for the API's flat alternating lists.
//!
//! Resources, allocations and trade flows all travel as flat lists such as
//! `[resId, qty, resId, qty, ...]` or, for trade flows,
//! `[resId, pct, optimal, actual, ...]`. A trailing incomplete group is ignored.

use crate::Location;

/// Iterates `[k, v, k, v, ...]` as `(k, v)` pairs.
pub fn flat_pairs<T: Copy>(list: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    list.chunks_exact(2).map(|pair| (pair[0], pair[1]))
}

/// Iterates a flat list in groups of `N`.
pub fn flat_chunks<const N: usize, T: Copy>(list: &[T]) -> impl Iterator<Item = [T; N]> + '_ {
    list.chunks_exact(N).map(|chunk| {
        let mut group = [chunk[0]; N];
        group.copy_from_slice(chunk);
        group
    })
}

/// Euclidean distance between two map positions, in light years.
pub fn dist(a: Location, b: Location) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}
