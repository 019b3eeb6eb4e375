use crate::graph::NodeId;
use crate::search::SearchObserver;

/// Work counters accumulated over one or more searches.
///
/// Implements [`SearchObserver`], so a `Stats` can be handed directly to the
/// observed search entry points.
pub struct Stats {
    nodes_closed: usize,
    edges_relaxed: usize,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            nodes_closed: 0,
            edges_relaxed: 0,
        }
    }

    /// Record into the statistics object that a node was settled.
    pub fn bump_nodes_closed(&mut self) {
        self.nodes_closed += 1
    }

    /// Record into the statistics object that a bunch of edges were relaxed.
    pub fn bump_edges_relaxed(&mut self, edge_amount: usize) {
        self.edges_relaxed += edge_amount
    }

    pub fn get_nodes_closed(&self) -> usize {
        self.nodes_closed
    }

    pub fn get_edges_relaxed(&self) -> usize {
        self.edges_relaxed
    }

    /// Combine two stats objects, summing every counter.
    pub fn merge(&self, other: &Stats) -> Stats {
        Stats {
            nodes_closed: self.nodes_closed + other.nodes_closed,
            edges_relaxed: self.edges_relaxed + other.edges_relaxed,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::new()
    }
}

impl SearchObserver for Stats {
    fn node_closed(&mut self, _node: NodeId, _distance: u64) {
        self.bump_nodes_closed();
    }

    fn edge_relaxed(&mut self, _from: NodeId, _to: NodeId, _new_distance: u64) {
        self.bump_edges_relaxed(1);
    }
}
