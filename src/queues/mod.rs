//! Priority-queue backends for the shortest-path engines.
//!
//! Three interchangeable implementations of one addressable min-queue
//! contract:
//!
//! - [`BinaryHeap`]: array-backed sift-up/sift-down, O(log n) everywhere
//! - [`FibonacciHeap`]: arena-indexed pointer heap, O(1) amortized
//!   insert/decrease-key
//! - [`RadixHeap`]: monotone bucket queue for integer keys, amortized
//!   O(log C) extraction
//!
//! All three carry a node-addressed side table so `decrease_key` can be
//! called by node rather than by handle.

mod binary;
mod fibonacci;
mod radix;

pub use binary::*;
pub use fibonacci::*;
pub use radix::*;

use thiserror::Error;

use crate::graph::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("extract_min on an empty queue")]
    Empty,

    #[error("key {key} is below the monotone floor {floor}")]
    InvalidKey { key: u64, floor: u64 },

    #[error("new key {new_key} is above the current key {current}")]
    KeyIncrease { new_key: u64, current: u64 },

    #[error("node {0:?} has no live entry in the queue")]
    UnknownNode(NodeId),

    #[error("node {0:?} already has a live entry in the queue")]
    DuplicateNode(NodeId),
}

/// Addressable min-priority queue over `(NodeId, u64)` entries.
///
/// A node has at most one live entry at a time. Violating the contract
/// (double-insert, decrease of an absent node, extraction from an empty
/// queue) is a bug in the calling algorithm and surfaces as a [`QueueError`].
pub trait PriorityQueue {
    /// Queues `node` with the given key. The radix backend additionally
    /// rejects keys below its monotone floor.
    fn insert(&mut self, node: NodeId, key: u64) -> Result<(), QueueError>;

    /// Removes and returns the entry with the globally minimum key.
    /// Tie-breaking is arbitrary but deterministic within one run.
    fn extract_min(&mut self) -> Result<(NodeId, u64), QueueError>;

    /// Lowers the key of a live entry. Equal keys are a no-op; a strictly
    /// larger key is rejected.
    fn decrease_key(&mut self, node: NodeId, new_key: u64) -> Result<(), QueueError>;

    /// Whether `node` currently has a live entry.
    fn contains(&self, node: NodeId) -> bool;

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The minimum live key without extracting it, or `None` when empty.
    ///
    /// Takes `&mut self` because the radix backend may have to pull entries
    /// forward into its first bucket to answer.
    fn min_key(&mut self) -> Option<u64>;
}

/// Runtime selection of a queue backend, fixed once per engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    Binary,
    Fibonacci,
    Radix,
}

impl HeapKind {
    pub const ALL: [HeapKind; 3] = [HeapKind::Binary, HeapKind::Fibonacci, HeapKind::Radix];

    pub fn from_string(s: &str) -> Self {
        if s == "binary" {
            HeapKind::Binary
        } else if s == "fibonacci" {
            HeapKind::Fibonacci
        } else if s == "radix" {
            HeapKind::Radix
        } else {
            panic!("Invalid heap kind: {}", s)
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeapKind::Binary => "binary",
            HeapKind::Fibonacci => "fibonacci",
            HeapKind::Radix => "radix",
        }
    }

    /// Constructs a fresh, empty queue of this kind.
    pub fn make(self) -> Box<dyn PriorityQueue> {
        match self {
            HeapKind::Binary => Box::new(BinaryHeap::new()),
            HeapKind::Fibonacci => Box::new(FibonacciHeap::new()),
            HeapKind::Radix => Box::new(RadixHeap::new()),
        }
    }
}
