use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::graph::{Edge, Graph, NodeId};

/// Generates a random directed graph with uniform edge endpoints and weights.
///
/// Each of the `num_edges` draws picks a `(u, v)` pair uniformly; self-loops
/// are skipped but still consume their draw, so the resulting graph may hold
/// slightly fewer than `num_edges` edges. Weights are drawn uniformly from
/// the inclusive `weight_range`.
///
/// # Panics
/// Panics if `num_nodes == 0` or the weight range is inverted.
pub fn generate_graph(
    num_nodes: usize,
    num_edges: usize,
    weight_range: (u64, u64),
    seed: u64,
) -> Graph {
    assert!(num_nodes > 0);
    assert!(weight_range.0 <= weight_range.1);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); num_nodes];

    for _ in 0..num_edges {
        let u = rng.random_range(0..num_nodes);
        let v = rng.random_range(0..num_nodes);
        if u == v {
            continue;
        }
        let weight = rng.random_range(weight_range.0..=weight_range.1);
        adjacency[u].push(Edge { to: NodeId(v), weight });
    }

    Graph::from_adjacency(adjacency)
}
