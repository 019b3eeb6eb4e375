use hashbrown::HashMap;

use crate::graph::NodeId;
use crate::queues::{PriorityQueue, QueueError};

/// Array-backed binary min-heap with a node-to-slot position map.
///
/// The position map is what makes `decrease_key` addressable by node: every
/// swap during a sift updates it, so lookups stay O(1) and sifts O(log n).
pub struct BinaryHeap {
    heap: Vec<(u64, NodeId)>,
    position: HashMap<NodeId, usize>,
}

impl BinaryHeap {
    pub fn new() -> Self {
        BinaryHeap {
            heap: Vec::new(),
            position: HashMap::new(),
        }
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.position.insert(self.heap[i].1, i);
        self.position.insert(self.heap[j].1, j);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.heap[i].0 < self.heap[p].0 {
                self.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let (l, r) = (Self::left(i), Self::right(i));
            let mut smallest = i;

            if l < n && self.heap[l].0 < self.heap[smallest].0 {
                smallest = l;
            }
            if r < n && self.heap[r].0 < self.heap[smallest].0 {
                smallest = r;
            }

            if smallest != i {
                self.swap(i, smallest);
                i = smallest;
            } else {
                break;
            }
        }
    }
}

impl Default for BinaryHeap {
    fn default() -> Self {
        BinaryHeap::new()
    }
}

impl PriorityQueue for BinaryHeap {
    fn insert(&mut self, node: NodeId, key: u64) -> Result<(), QueueError> {
        if self.position.contains_key(&node) {
            return Err(QueueError::DuplicateNode(node));
        }
        self.heap.push((key, node));
        let idx = self.heap.len() - 1;
        self.position.insert(node, idx);
        self.sift_up(idx);
        Ok(())
    }

    fn extract_min(&mut self) -> Result<(NodeId, u64), QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::Empty);
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (key, node) = self.heap.pop().ok_or(QueueError::Empty)?;
        self.position.remove(&node);

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Ok((node, key))
    }

    fn decrease_key(&mut self, node: NodeId, new_key: u64) -> Result<(), QueueError> {
        let &idx = self
            .position
            .get(&node)
            .ok_or(QueueError::UnknownNode(node))?;

        let current = self.heap[idx].0;
        if new_key > current {
            return Err(QueueError::KeyIncrease { new_key, current });
        }
        if new_key == current {
            return Ok(());
        }

        self.heap[idx].0 = new_key;
        self.sift_up(idx);
        Ok(())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.position.contains_key(&node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn min_key(&mut self) -> Option<u64> {
        self.heap.first().map(|&(key, _)| key)
    }
}
