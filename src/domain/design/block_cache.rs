//! Cache of prefetched block-mode question pairs.

use crate::domain::criteria::Profile;

/// Holds one oracle block's question pairs and a read cursor. Consulted
/// only while the session is in the block kickstart phase; a refetch
/// replaces the whole block and resets the cursor.
#[derive(Debug, Clone, Default)]
pub struct BlockCache {
    pairs: Vec<(Profile, Profile)>,
    cursor: usize,
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every cached pair has been served (including the initial
    /// empty state).
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.pairs.len()
    }

    /// Replaces the cached block and rewinds the cursor.
    pub fn refill(&mut self, pairs: Vec<(Profile, Profile)>) {
        self.pairs = pairs;
        self.cursor = 0;
    }

    /// Serves the next cached pair, advancing the cursor.
    pub fn next(&mut self) -> Option<(Profile, Profile)> {
        let pair = self.pairs.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(pair)
    }

    /// Pairs remaining before the next refetch.
    pub fn remaining(&self) -> usize {
        self.pairs.len().saturating_sub(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::fixtures::price_speed_support;

    #[test]
    fn starts_exhausted() {
        let cache = BlockCache::new();
        assert!(cache.is_exhausted());
        assert_eq!(cache.remaining(), 0);
    }

    #[test]
    fn serves_pairs_in_order_then_exhausts() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();
        let c = set.profile_from_indices(&[2, 2, 2]).unwrap();

        let mut cache = BlockCache::new();
        cache.refill(vec![(a.clone(), b.clone()), (b.clone(), c.clone())]);
        assert_eq!(cache.remaining(), 2);

        assert_eq!(cache.next(), Some((a, b.clone())));
        assert_eq!(cache.next(), Some((b, c)));
        assert!(cache.is_exhausted());
        assert_eq!(cache.next(), None);
    }

    #[test]
    fn refill_rewinds_cursor() {
        let set = price_speed_support();
        let a = set.profile_from_indices(&[0, 0, 0]).unwrap();
        let b = set.profile_from_indices(&[1, 1, 1]).unwrap();

        let mut cache = BlockCache::new();
        cache.refill(vec![(a.clone(), b.clone())]);
        cache.next();
        assert!(cache.is_exhausted());

        cache.refill(vec![(b.clone(), a.clone())]);
        assert!(!cache.is_exhausted());
        assert_eq!(cache.next(), Some((b, a)));
    }
}
