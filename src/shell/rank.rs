//! Ranked entries and the upper-bound search that orders them.

use std::cmp::Ordering;

use crate::types::Rank;

/// A hosted widget paired with its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankEntry {
    /// Widget handle (registry index). Not owned by the panel.
    pub widget: usize,
    pub rank: Rank,
}

/// Compare an entry's rank against a query rank.
#[inline]
pub fn rank_cmp(entry: &RankEntry, rank: Rank) -> Ordering {
    entry.rank.cmp(&rank)
}

/// First position whose rank is strictly greater than `rank`.
///
/// `entries` must be sorted by rank. Inserting at the returned position
/// places a new entry after every existing entry of equal rank.
pub fn upper_bound(entries: &[RankEntry], rank: Rank) -> usize {
    entries.partition_point(|entry| rank_cmp(entry, rank) != Ordering::Greater)
}
