use hashbrown::HashMap;

use crate::graph::NodeId;
use crate::queues::{PriorityQueue, QueueError};

const BUCKETS: usize = 65;

/// Picks the bucket for `key` relative to the monotone floor `last`.
///
/// Bucket 0 holds keys equal to `last`; bucket `i > 0` holds keys whose
/// highest differing bit from `last` is bit `i - 1`, which yields the
/// exponentially growing ranges `[last+1, last+2)`, `[last+2, last+4)`, ...
fn bucket_index(last: u64, key: u64) -> usize {
    if key == last {
        0
    } else {
        (64 - (key ^ last).leading_zeros()) as usize
    }
}

/// Monotone radix heap for integer keys.
///
/// Extracted keys never decrease over the queue's lifetime, which is exactly
/// the guarantee Dijkstra provides; inserting below the floor of the last
/// extraction is rejected. `decrease_key` is lazy: the old entry stays in its
/// bucket and is recognised as stale (and dropped) by comparing against the
/// live-key table during extraction and redistribution.
pub struct RadixHeap {
    buckets: Vec<Vec<(u64, NodeId)>>,
    last: u64,
    live: HashMap<NodeId, u64>,
}

impl RadixHeap {
    pub fn new() -> Self {
        RadixHeap {
            buckets: vec![Vec::new(); BUCKETS],
            last: 0,
            live: HashMap::new(),
        }
    }

    fn is_live(&self, key: u64, node: NodeId) -> bool {
        self.live.get(&node) == Some(&key)
    }

    /// Advances `last` to the smallest live key and redistributes the lowest
    /// non-empty bucket. Buckets containing only stale entries are dropped
    /// wholesale. Returns `false` when no live entry exists anywhere.
    fn pull_forward(&mut self) -> bool {
        for i in 1..BUCKETS {
            if self.buckets[i].is_empty() {
                continue;
            }
            let entries = std::mem::take(&mut self.buckets[i]);

            let mut min_key: Option<u64> = None;
            for &(key, node) in &entries {
                if self.is_live(key, node) {
                    min_key = Some(min_key.map_or(key, |m| m.min(key)));
                }
            }
            let Some(min_key) = min_key else {
                continue; // all stale; keep scanning upward
            };

            self.last = min_key;
            for (key, node) in entries {
                if self.is_live(key, node) {
                    let b = bucket_index(self.last, key);
                    self.buckets[b].push((key, node));
                }
            }
            return true;
        }
        false
    }

    /// Ensures the front bucket holds a live entry, pulling forward as
    /// needed. Returns `false` when the queue holds no live entry.
    fn normalize_front(&mut self) -> bool {
        loop {
            while let Some(&(key, node)) = self.buckets[0].last() {
                if self.is_live(key, node) {
                    return true;
                }
                self.buckets[0].pop();
            }
            if !self.pull_forward() {
                return false;
            }
        }
    }
}

impl Default for RadixHeap {
    fn default() -> Self {
        RadixHeap::new()
    }
}

impl PriorityQueue for RadixHeap {
    fn insert(&mut self, node: NodeId, key: u64) -> Result<(), QueueError> {
        if key < self.last {
            return Err(QueueError::InvalidKey { key, floor: self.last });
        }
        if self.live.contains_key(&node) {
            return Err(QueueError::DuplicateNode(node));
        }
        let b = bucket_index(self.last, key);
        self.buckets[b].push((key, node));
        self.live.insert(node, key);
        Ok(())
    }

    fn extract_min(&mut self) -> Result<(NodeId, u64), QueueError> {
        if !self.normalize_front() {
            return Err(QueueError::Empty);
        }
        // normalize_front leaves a live entry at the tail of bucket 0
        let (key, node) = self.buckets[0].pop().ok_or(QueueError::Empty)?;
        self.live.remove(&node);
        self.last = key;
        Ok((node, key))
    }

    fn decrease_key(&mut self, node: NodeId, new_key: u64) -> Result<(), QueueError> {
        let &current = self
            .live
            .get(&node)
            .ok_or(QueueError::UnknownNode(node))?;

        if new_key > current {
            return Err(QueueError::KeyIncrease { new_key, current });
        }
        if new_key == current {
            return Ok(());
        }
        if new_key < self.last {
            return Err(QueueError::InvalidKey { key: new_key, floor: self.last });
        }

        // lazy deletion: the old entry stays behind as stale
        let b = bucket_index(self.last, new_key);
        self.buckets[b].push((new_key, node));
        self.live.insert(node, new_key);
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.live.contains_key(&node)
    }

    fn len(&self) -> usize {
        self.live.len()
    }

    fn min_key(&mut self) -> Option<u64> {
        if !self.normalize_front() {
            return None;
        }
        self.buckets[0].last().map(|&(key, _)| key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn bucket_index_ranges() {
        assert_eq!(bucket_index(10, 10), 0);
        assert_eq!(bucket_index(10, 11), 1);
        assert_eq!(bucket_index(0, 1), 1);
        assert_eq!(bucket_index(0, 2), 2);
        assert_eq!(bucket_index(0, 3), 2);
        assert_eq!(bucket_index(0, 4), 3);
        assert_eq!(bucket_index(0, u64::MAX), 64);
    }

    #[test]
    fn extracts_in_sorted_order() {
        let mut heap = RadixHeap::new();
        for (i, &key) in [70u64, 30, 90, 10, 50].iter().enumerate() {
            heap.insert(NodeId(i), key).unwrap();
        }

        let mut keys = Vec::new();
        while let Ok((_, key)) = heap.extract_min() {
            keys.push(key);
        }
        assert_eq!(keys, vec![10, 30, 50, 70, 90]);
    }

    #[test]
    fn rejects_keys_below_the_floor() {
        let mut heap = RadixHeap::new();
        heap.insert(NodeId(0), 100).unwrap();
        assert_eq!(heap.extract_min().unwrap(), (NodeId(0), 100));

        assert_eq!(
            heap.insert(NodeId(1), 99),
            Err(QueueError::InvalidKey { key: 99, floor: 100 })
        );
        // the floor itself is fine
        heap.insert(NodeId(1), 100).unwrap();
    }

    #[test]
    fn lazy_decrease_key_skips_stale_entries() {
        let mut heap = RadixHeap::new();
        heap.insert(NodeId(0), 80).unwrap();
        heap.insert(NodeId(1), 40).unwrap();
        heap.decrease_key(NodeId(0), 20).unwrap();
        heap.decrease_key(NodeId(0), 5).unwrap();

        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_min().unwrap(), (NodeId(0), 5));
        // the stale 80 and 20 entries must never surface
        assert_eq!(heap.extract_min().unwrap(), (NodeId(1), 40));
        assert_eq!(heap.extract_min().unwrap_err(), QueueError::Empty);
    }

    #[test]
    fn min_key_reports_without_removing() {
        let mut heap = RadixHeap::new();
        heap.insert(NodeId(0), 12).unwrap();
        heap.insert(NodeId(1), 7).unwrap();

        assert_eq!(heap.min_key(), Some(7));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_min().unwrap(), (NodeId(1), 7));
    }

    #[test]
    fn monotone_interleaving_of_inserts_and_extracts() {
        let mut heap = RadixHeap::new();
        heap.insert(NodeId(0), 0).unwrap();

        let mut frontier = 0u64;
        for i in 1..100u64 {
            let (_, key) = heap.extract_min().unwrap();
            assert!(key >= frontier);
            frontier = key;
            // Dijkstra-style: new keys are extracted key + an edge weight
            heap.insert(NodeId(i as usize), key + (i % 7) + 1).unwrap();
        }
    }

    #[test]
    fn randomized_against_sorting() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut heap = RadixHeap::new();
        let mut keys: Vec<u64> = (0..500).map(|_| rng.random_range(0..1_000_000)).collect();

        for (i, &key) in keys.iter().enumerate() {
            heap.insert(NodeId(i), key).unwrap();
        }
        keys.sort();

        let extracted: Vec<u64> = keys
            .iter()
            .map(|_| heap.extract_min().unwrap().1)
            .collect();
        assert_eq!(extracted, keys);
    }
}
