//! Contraction hierarchies: offline preprocessing that augments a graph with
//! shortcut edges and a per-node rank, plus the upward-only bidirectional
//! query that exploits them.

mod builder;
mod query;

use hashbrown::HashMap;

use crate::graph::{Graph, NodeId};
use crate::queues::HeapKind;

/// A preprocessed graph: the original edges plus all shortcuts, the
/// contraction rank of every node, and the registry needed to unpack
/// shortcut edges back into original ones.
///
/// Built once by [`ContractionHierarchy::preprocess`], then shared read-only
/// across arbitrarily many [`ContractionHierarchy::query`] calls.
pub struct ContractionHierarchy {
    /// Augmented graph (original + shortcut edges).
    forward: Graph,
    /// Edge-reversed augmented graph, for the backward frontier.
    backward: Graph,
    /// Contraction order index per node; lower rank contracted earlier.
    rank: Vec<usize>,
    /// `(from, to) -> middle node` for every shortcut. A later shortcut for
    /// the same pair is always strictly cheaper and overwrites the entry.
    shortcuts: HashMap<(usize, usize), NodeId>,
    /// Queue backend used for witness searches and queries.
    kind: HeapKind,
}

impl ContractionHierarchy {
    pub fn rank(&self, node: NodeId) -> usize {
        self.rank[node.0]
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcuts.len()
    }

    /// The augmented graph, mostly useful for inspection and tests.
    pub fn augmented_graph(&self) -> &Graph {
        &self.forward
    }
}
