//! Hamming distance and brute-force nearest neighbours for binary descriptors.

use super::Descriptor;

/// Hamming distance between two 256-bit descriptors.
#[inline]
pub fn hamming(a: &Descriptor, b: &Descriptor) -> u32 {
    a.chunks_exact(8)
        .zip(b.chunks_exact(8))
        .map(|(ca, cb)| {
            let wa = u64::from_le_bytes([ca[0], ca[1], ca[2], ca[3], ca[4], ca[5], ca[6], ca[7]]);
            let wb = u64::from_le_bytes([cb[0], cb[1], cb[2], cb[3], cb[4], cb[5], cb[6], cb[7]]);
            (wa ^ wb).count_ones()
        })
        .sum()
}

/// A candidate neighbour in the train set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    /// Position in the train set.
    pub index: usize,
    /// Hamming distance to the query descriptor.
    pub distance: u32,
}

/// Returns the two nearest train descriptors to `query`, closest first.
///
/// Equal distances keep the lower train index first. The second slot is
/// `None` when `train` has fewer than two entries.
pub fn nearest_two(query: &Descriptor, train: &[Descriptor]) -> (Option<Neighbor>, Option<Neighbor>) {
    let mut best: Option<Neighbor> = None;
    let mut second: Option<Neighbor> = None;
    for (index, candidate) in train.iter().enumerate() {
        let n = Neighbor {
            index,
            distance: hamming(query, candidate),
        };
        match best {
            Some(b) if n.distance >= b.distance => {
                if second.map_or(true, |s| n.distance < s.distance) {
                    second = Some(n);
                }
            }
            _ => {
                second = best;
                best = Some(n);
            }
        }
    }
    (best, second)
}

/// Counts descriptors in `from` whose nearest neighbour in `to` passes the
/// ratio test `best < ratio * second`.
///
/// A descriptor without a second neighbour cannot pass.
pub fn count_ratio_matches(from: &[Descriptor], to: &[Descriptor], ratio: f32) -> usize {
    if to.len() < 2 {
        return 0;
    }
    from.iter()
        .filter(|desc| match nearest_two(desc, to) {
            (Some(best), Some(second)) => (best.distance as f32) < ratio * second.distance as f32,
            _ => false,
        })
        .count()
}
