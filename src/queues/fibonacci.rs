use hashbrown::HashMap;

use crate::graph::NodeId;
use crate::queues::{PriorityQueue, QueueError};

/// One slot of the heap arena.
///
/// Sibling rings are circular doubly linked lists expressed as arena indices,
/// so the cyclic parent/child/sibling topology never needs shared references.
/// A detached slot is its own singleton ring (`left == right == self`).
struct Slot {
    node: NodeId,
    key: u64,
    parent: Option<usize>,
    child: Option<usize>,
    left: usize,
    right: usize,
    degree: usize,
    marked: bool,
}

/// Fibonacci min-heap over arena-allocated nodes.
///
/// # Invariants
/// - Roots form one circular ring; `min` points at the root with the
///   smallest key.
/// - Every non-root slot satisfies heap order with respect to its parent.
/// - A marked slot has lost exactly one child since it last became a child
///   itself; losing a second one cuts it (cascading cut).
/// - Slots freed by `extract_min` are recycled through `free`, so indices
///   held in `slots` never dangle.
pub struct FibonacciHeap {
    arena: Vec<Slot>,
    free: Vec<usize>,
    min: Option<usize>,
    len: usize,
    slots: HashMap<NodeId, usize>,
}

impl FibonacciHeap {
    pub fn new() -> Self {
        FibonacciHeap {
            arena: Vec::new(),
            free: Vec::new(),
            min: None,
            len: 0,
            slots: HashMap::new(),
        }
    }

    fn alloc(&mut self, node: NodeId, key: u64) -> usize {
        match self.free.pop() {
            Some(i) => {
                self.arena[i] = Slot {
                    node,
                    key,
                    parent: None,
                    child: None,
                    left: i,
                    right: i,
                    degree: 0,
                    marked: false,
                };
                i
            }
            None => {
                let i = self.arena.len();
                self.arena.push(Slot {
                    node,
                    key,
                    parent: None,
                    child: None,
                    left: i,
                    right: i,
                    degree: 0,
                    marked: false,
                });
                i
            }
        }
    }

    /// Unlinks `i` from its ring, leaving it a singleton.
    fn detach(&mut self, i: usize) {
        let (l, r) = (self.arena[i].left, self.arena[i].right);
        self.arena[l].right = r;
        self.arena[r].left = l;
        self.arena[i].left = i;
        self.arena[i].right = i;
    }

    /// Splices singleton `i` into the ring just right of `anchor`.
    fn splice_after(&mut self, anchor: usize, i: usize) {
        let ar = self.arena[anchor].right;
        self.arena[i].left = anchor;
        self.arena[i].right = ar;
        self.arena[ar].left = i;
        self.arena[anchor].right = i;
    }

    /// Adds singleton `i` to the root ring, keeping `min` correct.
    fn push_root(&mut self, i: usize) {
        match self.min {
            None => self.min = Some(i),
            Some(m) => {
                self.splice_after(m, i);
                if self.arena[i].key < self.arena[m].key {
                    self.min = Some(i);
                }
            }
        }
    }

    /// All members of the ring containing `start`, in ring order.
    fn ring_members(&self, start: usize) -> Vec<usize> {
        let mut members = vec![start];
        let mut cursor = self.arena[start].right;
        while cursor != start {
            members.push(cursor);
            cursor = self.arena[cursor].right;
        }
        members
    }

    /// Makes `child` a child of `root` (both currently roots, heap order
    /// already established by the caller).
    fn link(&mut self, child: usize, root: usize) {
        self.detach(child);
        self.arena[child].parent = Some(root);
        match self.arena[root].child {
            None => self.arena[root].child = Some(child),
            Some(c) => self.splice_after(c, child),
        }
        self.arena[root].degree += 1;
        self.arena[child].marked = false;
    }

    /// Merges roots of equal degree until all root degrees are distinct,
    /// then recomputes `min`.
    fn consolidate(&mut self) {
        let Some(start) = self.min else { return };
        let roots = self.ring_members(start);

        let mut by_degree: Vec<Option<usize>> = vec![None; self.len.max(1).ilog2() as usize + 3];

        for root in roots {
            let mut x = root;
            let mut d = self.arena[x].degree;
            if d >= by_degree.len() {
                by_degree.resize(d + 1, None);
            }
            while let Some(y) = by_degree[d] {
                let (low, high) = if self.arena[x].key > self.arena[y].key {
                    (y, x)
                } else {
                    (x, y)
                };
                self.link(high, low);
                x = low;
                by_degree[d] = None;
                d += 1;
                if d == by_degree.len() {
                    by_degree.push(None);
                }
            }
            by_degree[d] = Some(x);
        }

        self.min = None;
        for root in by_degree.into_iter().flatten() {
            self.detach(root);
            self.push_root(root);
        }
    }

    /// Moves `x` out from under `parent` into the root ring.
    fn cut(&mut self, x: usize, parent: usize) {
        if self.arena[parent].child == Some(x) {
            let r = self.arena[x].right;
            self.arena[parent].child = if r != x { Some(r) } else { None };
        }
        self.detach(x);
        self.arena[parent].degree -= 1;
        self.arena[x].parent = None;
        self.arena[x].marked = false;
        self.push_root(x);
    }

    /// Walks up from `start`, cutting marked ancestors and marking the first
    /// unmarked one.
    fn cascading_cut(&mut self, start: usize) {
        let mut y = start;
        while let Some(z) = self.arena[y].parent {
            if !self.arena[y].marked {
                self.arena[y].marked = true;
                break;
            }
            self.cut(y, z);
            y = z;
        }
    }
}

impl Default for FibonacciHeap {
    fn default() -> Self {
        FibonacciHeap::new()
    }
}

impl PriorityQueue for FibonacciHeap {
    fn insert(&mut self, node: NodeId, key: u64) -> Result<(), QueueError> {
        if self.slots.contains_key(&node) {
            return Err(QueueError::DuplicateNode(node));
        }
        let i = self.alloc(node, key);
        self.push_root(i);
        self.slots.insert(node, i);
        self.len += 1;
        Ok(())
    }

    fn extract_min(&mut self) -> Result<(NodeId, u64), QueueError> {
        let z = self.min.ok_or(QueueError::Empty)?;
        let node = self.arena[z].node;
        let key = self.arena[z].key;

        let children = match self.arena[z].child {
            Some(c) => self.ring_members(c),
            None => Vec::new(),
        };
        self.arena[z].child = None;

        let right = self.arena[z].right;
        self.detach(z);
        self.min = if right == z { None } else { Some(right) };

        for &c in &children {
            self.arena[c].parent = None;
            self.detach(c);
            self.push_root(c);
        }

        self.slots.remove(&node);
        self.free.push(z);
        self.len -= 1;

        if self.min.is_some() {
            self.consolidate();
        }

        Ok((node, key))
    }

    fn decrease_key(&mut self, node: NodeId, new_key: u64) -> Result<(), QueueError> {
        let &x = self
            .slots
            .get(&node)
            .ok_or(QueueError::UnknownNode(node))?;

        let current = self.arena[x].key;
        if new_key > current {
            return Err(QueueError::KeyIncrease { new_key, current });
        }
        if new_key == current {
            return Ok(());
        }

        self.arena[x].key = new_key;
        if let Some(p) = self.arena[x].parent {
            if new_key < self.arena[p].key {
                self.cut(x, p);
                self.cascading_cut(p);
            }
        }
        if let Some(m) = self.min {
            if new_key < self.arena[m].key {
                self.min = Some(x);
            }
        }
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn min_key(&mut self) -> Option<u64> {
        self.min.map(|m| self.arena[m].key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn extracts_in_sorted_order() {
        let mut heap = FibonacciHeap::new();
        for (i, &key) in [7u64, 3, 9, 1, 5, 8, 2].iter().enumerate() {
            heap.insert(NodeId(i), key).unwrap();
        }

        let mut keys = Vec::new();
        while let Ok((_, key)) = heap.extract_min() {
            keys.push(key);
        }
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn consolidation_after_first_extract() {
        let mut heap = FibonacciHeap::new();
        for i in 0..32 {
            heap.insert(NodeId(i), (i as u64) * 10).unwrap();
        }
        // first extraction collapses the 31 remaining singleton roots
        assert_eq!(heap.extract_min().unwrap(), (NodeId(0), 0));
        assert_eq!(heap.len(), 31);
        assert_eq!(heap.min_key(), Some(10));

        for i in 1..32 {
            assert_eq!(heap.extract_min().unwrap(), (NodeId(i), (i as u64) * 10));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn decrease_key_on_buried_node() {
        let mut heap = FibonacciHeap::new();
        for i in 0..16 {
            heap.insert(NodeId(i), 100 + i as u64).unwrap();
        }
        // force consolidation so most nodes gain parents
        heap.insert(NodeId(99), 1).unwrap();
        assert_eq!(heap.extract_min().unwrap(), (NodeId(99), 1));

        // cut a deep node to the front
        heap.decrease_key(NodeId(15), 2).unwrap();
        assert_eq!(heap.extract_min().unwrap(), (NodeId(15), 2));
        assert_eq!(heap.extract_min().unwrap(), (NodeId(0), 100));
    }

    #[test]
    fn cascading_cuts_keep_order() {
        let mut heap = FibonacciHeap::new();
        for i in 0..64 {
            heap.insert(NodeId(i), 1000 + i as u64).unwrap();
        }
        heap.insert(NodeId(200), 1).unwrap();
        heap.extract_min().unwrap();

        // repeated decreases on siblings of one subtree trigger cascades
        for i in (32..64).rev() {
            heap.decrease_key(NodeId(i), (i - 32) as u64 + 2).unwrap();
        }

        let mut previous = 0;
        while let Ok((_, key)) = heap.extract_min() {
            assert!(key >= previous);
            previous = key;
        }
    }

    #[test]
    fn arena_slots_are_recycled() {
        let mut heap = FibonacciHeap::new();
        for round in 0..4u64 {
            for i in 0..10 {
                heap.insert(NodeId(i), round * 100 + i as u64).unwrap();
            }
            for i in 0..10 {
                assert_eq!(
                    heap.extract_min().unwrap(),
                    (NodeId(i), round * 100 + i as u64)
                );
            }
        }
        // every round reuses the ten slots of the previous one
        assert!(heap.arena.len() <= 11);
    }

    #[test]
    fn duplicate_keys_all_come_out() {
        let mut heap = FibonacciHeap::new();
        for i in 0..6 {
            heap.insert(NodeId(i), 42).unwrap();
        }
        let mut nodes: Vec<usize> = (0..6).map(|_| heap.extract_min().unwrap().0.0).collect();
        nodes.sort();
        assert_eq!(nodes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn randomized_with_decreases() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut heap = FibonacciHeap::new();
        let mut expected: Vec<u64> = Vec::new();

        for i in 0..300 {
            let key = rng.random_range(1000..100_000);
            heap.insert(NodeId(i), key).unwrap();
            expected.push(key);
        }
        // extract a prefix to build real tree structure
        for _ in 0..50 {
            let (_, key) = heap.extract_min().unwrap();
            let pos = expected.iter().position(|&k| k == key).unwrap();
            expected.swap_remove(pos);
        }
        // then randomly decrease half of the survivors
        for i in 0..300 {
            if heap.contains(NodeId(i)) && rng.random_range(0..2) == 0 {
                let new_key = rng.random_range(500..1000);
                heap.decrease_key(NodeId(i), new_key).unwrap();
                // the old key is unique in `expected` by construction range
            }
        }

        let mut previous = 0;
        let mut count = 0;
        while let Ok((_, key)) = heap.extract_min() {
            assert!(key >= previous, "extraction order regressed");
            previous = key;
            count += 1;
        }
        assert_eq!(count, 250);
    }
}
