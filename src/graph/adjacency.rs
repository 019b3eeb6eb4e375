use thiserror::Error;

/// Sentinel distance for nodes not (yet) reached by a search.
pub const INFINITY: u64 = u64::MAX;

/// Dense, 0-based identifier of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A directed, weighted edge stored in the adjacency list of its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: NodeId,
    pub weight: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node id {id} out of range for a graph of {count} nodes")]
    InvalidNode { id: usize, count: usize },

    #[error("negative weight {weight} on edge {from} -> {to}")]
    InvalidWeight { from: usize, to: usize, weight: i64 },
}

/// Immutable directed weighted graph stored as an adjacency list.
///
/// # Invariants
/// - `adjacency[i]` holds the outgoing edges of node `i`.
/// - Every `Edge.to` is a valid index into `adjacency`.
/// - Weights are non-negative by construction; the builder rejects anything else.
#[derive(Debug)]
pub struct Graph {
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Builds a graph from a node count and `(from, to, weight)` triples.
    ///
    /// Edges keep their input order within each adjacency row. Parallel edges
    /// and zero weights are allowed; searches always settle on the cheapest
    /// parallel edge.
    pub fn new(node_count: usize, edges: &[(usize, usize, i64)]) -> Result<Self, GraphError> {
        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); node_count];

        for &(from, to, weight) in edges {
            if from >= node_count {
                return Err(GraphError::InvalidNode { id: from, count: node_count });
            }
            if to >= node_count {
                return Err(GraphError::InvalidNode { id: to, count: node_count });
            }
            if weight < 0 {
                return Err(GraphError::InvalidWeight { from, to, weight });
            }
            adjacency[from].push(Edge {
                to: NodeId(to),
                weight: weight as u64,
            });
        }

        Ok(Graph {
            edge_count: edges.len(),
            adjacency,
        })
    }

    pub(crate) fn from_adjacency(adjacency: Vec<Vec<Edge>>) -> Self {
        let edge_count = adjacency.iter().map(Vec::len).sum();
        Graph {
            adjacency,
            edge_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.adjacency.len()
    }

    /// Outgoing edges of `node`, in insertion order.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    pub fn out_edges(&self, node: NodeId) -> &[Edge] {
        &self.adjacency[node.0]
    }

    /// The edge-reversed graph, used by backward search frontiers.
    pub fn reversed(&self) -> Graph {
        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); self.adjacency.len()];
        for (from, edges) in self.adjacency.iter().enumerate() {
            for edge in edges {
                adjacency[edge.to.0].push(Edge {
                    to: NodeId(from),
                    weight: edge.weight,
                });
            }
        }
        Graph {
            adjacency,
            edge_count: self.edge_count,
        }
    }

    /// Largest edge weight in the graph, 0 when edgeless.
    pub fn max_weight(&self) -> u64 {
        self.adjacency
            .iter()
            .flatten()
            .map(|edge| edge.weight)
            .max()
            .unwrap_or(0)
    }
}
