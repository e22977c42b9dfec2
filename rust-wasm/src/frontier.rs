//! Round-based frontier for region growing
//!
//! Holds the voxels to visit in the current round and those queued for the
//! next one. Both are ordered sets so that a round is always drained in
//! ascending flat index, which makes growth reproducible.

use std::collections::{btree_set, BTreeSet};

use crate::volume::neighbors6;

pub struct FrontierScheduler {
    current: BTreeSet<usize>,
    next: BTreeSet<usize>,
    rounds: usize,
}

impl FrontierScheduler {
    pub fn new() -> Self {
        FrontierScheduler {
            current: BTreeSet::new(),
            next: BTreeSet::new(),
            rounds: 0,
        }
    }

    /// Current round = every unlabelled 6-neighbour of a positive voxel
    pub fn seed_initial(labels: &[i8], dims: (usize, usize, usize)) -> Self {
        let mut scheduler = Self::new();

        for (idx, &label) in labels.iter().enumerate() {
            if label <= 0 {
                continue;
            }
            for n_idx in neighbors6(idx, dims) {
                if labels[n_idx] == 0 {
                    scheduler.current.insert(n_idx);
                }
            }
        }

        scheduler
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.current.is_empty()
    }

    /// Number of voxels waiting in the current round
    #[inline]
    pub fn pending(&self) -> usize {
        self.current.len()
    }

    /// Take the current round, in ascending index order
    ///
    /// Counts as one round started.
    pub fn drain_round(&mut self) -> btree_set::IntoIter<usize> {
        self.rounds += 1;
        std::mem::take(&mut self.current).into_iter()
    }

    /// Queue a voxel for the next round (no-op if already queued)
    #[inline]
    pub fn schedule_for_next_round(&mut self, voxel: usize) {
        self.next.insert(voxel);
    }

    /// Make the next round current
    ///
    /// Voxels that were labelled after being queued are dropped, so a round
    /// only ever holds voxels that are still 0 in `labels`.
    pub fn promote(&mut self, labels: &[i8]) {
        debug_assert!(self.current.is_empty(), "promoting before the round was drained");
        std::mem::swap(&mut self.current, &mut self.next);
        self.current.retain(|&voxel| labels[voxel] == 0);
    }

    /// Rounds started so far
    #[inline]
    pub fn round_count(&self) -> usize {
        self.rounds
    }
}

impl Default for FrontierScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_initial() {
        // 4x1x1 line: [1, 0, 0, -1] plus a seed at the far end of a second row
        let labels = [1i8, 0, 0, -1, 0, 0, -1, 2];
        let scheduler = FrontierScheduler::seed_initial(&labels, (4, 2, 1));

        let pending: Vec<usize> = scheduler.current.iter().copied().collect();
        // 1 (right of seed 1), 4 (below seed 1). 6 is a barrier next to seed 2, 3 is a barrier above it.
        assert_eq!(pending, vec![1, 4]);
    }

    #[test]
    fn test_rounds_drain_in_ascending_order() {
        let mut scheduler = FrontierScheduler::new();
        scheduler.schedule_for_next_round(9);
        scheduler.schedule_for_next_round(2);
        scheduler.schedule_for_next_round(9);
        scheduler.schedule_for_next_round(5);
        scheduler.schedule_for_next_round(7);
        assert!(!scheduler.has_pending());

        // Voxel 7 got labelled after it was queued
        let mut labels = [0i8; 10];
        labels[7] = 3;
        scheduler.promote(&labels);
        assert_eq!(scheduler.pending(), 3);

        let order: Vec<usize> = scheduler.drain_round().collect();
        assert_eq!(order, vec![2, 5, 9]);
        assert_eq!(scheduler.round_count(), 1);
        assert!(!scheduler.has_pending());

        scheduler.promote(&labels);
        assert!(!scheduler.has_pending());
    }
}
