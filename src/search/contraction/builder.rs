use hashbrown::HashMap;
use tracing::{debug, info};

use crate::graph::{Edge, Graph, INFINITY, NodeId};
use crate::queues::{BinaryHeap, HeapKind, PriorityQueue};
use crate::search::contraction::ContractionHierarchy;

/// Maps a signed importance to a `u64` that sorts identically, so the
/// contraction order can live in the regular queue backends.
fn order_key(importance: i64) -> u64 {
    (importance as u64) ^ (1 << 63)
}

/// Working state of the contraction phase. The adjacency is mutable while
/// shortcuts accumulate and is frozen into immutable [`Graph`]s at the end.
struct Builder {
    forward: Vec<Vec<Edge>>,
    backward: Vec<Vec<Edge>>,
    contracted: Vec<bool>,
    shortcuts: HashMap<(usize, usize), NodeId>,
    kind: HeapKind,
}

impl Builder {
    fn new(graph: &Graph, kind: HeapKind) -> Self {
        let n = graph.node_count();
        let reversed = graph.reversed();
        Builder {
            forward: (0..n).map(|u| graph.out_edges(NodeId(u)).to_vec()).collect(),
            backward: (0..n).map(|u| reversed.out_edges(NodeId(u)).to_vec()).collect(),
            contracted: vec![false; n],
            shortcuts: HashMap::new(),
            kind,
        }
    }

    /// Cheapest direct edge `from -> to` in the current augmented graph.
    fn min_weight(&self, from: usize, to: usize) -> u64 {
        self.forward[from]
            .iter()
            .filter(|e| e.to.0 == to)
            .map(|e| e.weight)
            .min()
            .unwrap_or(INFINITY)
    }

    /// Still-uncontracted predecessors of `u`, deduplicated.
    fn live_incoming(&self, u: usize) -> Vec<usize> {
        let mut nodes: Vec<usize> = self.backward[u]
            .iter()
            .map(|e| e.to.0)
            .filter(|&v| !self.contracted[v])
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Still-uncontracted successors of `u`, deduplicated.
    fn live_outgoing(&self, u: usize) -> Vec<usize> {
        let mut nodes: Vec<usize> = self.forward[u]
            .iter()
            .map(|e| e.to.0)
            .filter(|&v| !self.contracted[v])
            .collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Bounded Dijkstra from `source` toward `target`, avoiding `exclude`
    /// and every contracted node, cut off once the frontier passes `limit`.
    /// Returns the distance found, or [`INFINITY`] when no path of length
    /// `<= limit` exists.
    fn witness_search(&self, source: usize, target: usize, limit: u64, exclude: usize) -> u64 {
        let mut queue = self.kind.make();
        let mut distances: HashMap<usize, u64> = HashMap::new();

        distances.insert(source, 0);
        queue
            .insert(NodeId(source), 0)
            .expect("witness source insert into a fresh queue");

        while !queue.is_empty() {
            let (u, d) = queue.extract_min().expect("non-empty witness queue");
            if d > limit {
                return INFINITY;
            }
            if u.0 == target {
                return d;
            }
            if distances.get(&u.0).is_some_and(|&best| d > best) {
                continue; // stale entry
            }

            for edge in &self.forward[u.0] {
                let v = edge.to.0;
                if v == exclude || self.contracted[v] {
                    continue;
                }
                let alt = d.saturating_add(edge.weight);
                if alt < distances.get(&v).copied().unwrap_or(INFINITY) {
                    distances.insert(v, alt);
                    if queue.contains(edge.to) {
                        queue.decrease_key(edge.to, alt).expect("queued node improves");
                    } else {
                        queue.insert(edge.to, alt).expect("first discovery of node");
                    }
                }
            }
        }

        distances.get(&target).copied().unwrap_or(INFINITY)
    }

    /// Whether contracting `via` requires a shortcut `from -> to`, and at
    /// what weight. No shortcut is needed when a witness path at most as
    /// cheap as `from -> via -> to` survives without `via`.
    fn shortcut_weight(&self, via: usize, from: usize, to: usize) -> Option<u64> {
        if from == to {
            return None;
        }
        let through = self
            .min_weight(from, via)
            .saturating_add(self.min_weight(via, to));
        let witness = self.witness_search(from, to, through, via);
        (witness > through).then_some(through)
    }

    /// Edge-difference heuristic: shortcuts this contraction would create,
    /// minus the live edges it removes.
    fn importance(&self, u: usize) -> i64 {
        let incoming = self.live_incoming(u);
        let outgoing = self.live_outgoing(u);

        let removed = (incoming.len() + outgoing.len()) as i64;
        let mut added = 0i64;
        for &from in &incoming {
            for &to in &outgoing {
                if self.shortcut_weight(u, from, to).is_some() {
                    added += 1;
                }
            }
        }
        added - removed
    }

    /// Inserts every shortcut required by removing `u` from the active graph.
    fn contract(&mut self, u: usize) {
        let incoming = self.live_incoming(u);
        let outgoing = self.live_outgoing(u);

        for &from in &incoming {
            for &to in &outgoing {
                if let Some(weight) = self.shortcut_weight(u, from, to) {
                    self.forward[from].push(Edge { to: NodeId(to), weight });
                    self.backward[to].push(Edge { to: NodeId(from), weight });
                    self.shortcuts.insert((from, to), NodeId(u));
                }
            }
        }
        self.contracted[u] = true;
    }
}

impl ContractionHierarchy {
    /// Runs the contraction phase over `graph`.
    ///
    /// Nodes are contracted in order of the edge-difference heuristic, with
    /// lazy re-evaluation: a popped candidate whose recomputed importance
    /// fell behind the next one is pushed back instead of contracted. The
    /// selected queue backend drives the witness searches and later queries;
    /// the contraction order itself always lives in a binary heap.
    pub fn preprocess(graph: &Graph, kind: HeapKind) -> ContractionHierarchy {
        let n = graph.node_count();
        let mut builder = Builder::new(graph, kind);

        let mut order = BinaryHeap::new();
        for u in 0..n {
            order
                .insert(NodeId(u), order_key(builder.importance(u)))
                .expect("distinct nodes fill the order queue");
        }

        let mut rank = vec![0usize; n];
        let mut next_rank = 0usize;

        while !order.is_empty() {
            let (u, _) = order.extract_min().expect("non-empty order queue");

            // lazy update: neighbors contracted since this key was computed
            // may have changed the picture
            let importance = builder.importance(u.0);
            if let Some(next_key) = order.min_key() {
                if order_key(importance) > next_key {
                    order
                        .insert(u, order_key(importance))
                        .expect("re-queueing an extracted node");
                    continue;
                }
            }

            rank[u.0] = next_rank;
            next_rank += 1;
            builder.contract(u.0);
            debug!(node = u.0, importance, rank = rank[u.0], "contracted node");
        }

        info!(
            nodes = n,
            shortcuts = builder.shortcuts.len(),
            "contraction hierarchy built"
        );

        ContractionHierarchy {
            forward: Graph::from_adjacency(builder.forward),
            backward: Graph::from_adjacency(builder.backward),
            rank,
            shortcuts: builder.shortcuts,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_key_preserves_signed_order() {
        let values = [i64::MIN, -5, -1, 0, 1, 7, i64::MAX];
        for pair in values.windows(2) {
            assert!(order_key(pair[0]) < order_key(pair[1]));
        }
    }

    #[test]
    fn chain_contraction_assigns_every_rank_once() {
        let graph = Graph::new(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        let mut ranks: Vec<usize> = (0..5).map(|u| ch.rank(NodeId(u))).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shortcut_bridges_a_contracted_middle() {
        // contracting 1 first must leave a 0 -> 2 shortcut of weight 3
        let graph = Graph::new(3, &[(0, 1, 1), (1, 2, 2)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        if ch.rank(NodeId(1)) < ch.rank(NodeId(0)) && ch.rank(NodeId(1)) < ch.rank(NodeId(2)) {
            assert_eq!(ch.shortcut_count(), 1);
            let edge = ch
                .augmented_graph()
                .out_edges(NodeId(0))
                .iter()
                .find(|e| e.to == NodeId(2))
                .expect("shortcut 0 -> 2 expected");
            assert_eq!(edge.weight, 3);
        }
    }

    #[test]
    fn no_shortcut_when_witness_exists() {
        // direct 0 -> 2 edge of weight 2 witnesses the 0 -> 1 -> 2 pair
        let graph = Graph::new(3, &[(0, 1, 1), (1, 2, 2), (0, 2, 2)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);
        assert_eq!(ch.shortcut_count(), 0);
    }

    #[test]
    fn witness_search_respects_the_limit() {
        let graph = Graph::new(4, &[(0, 1, 10), (1, 2, 10), (2, 3, 10)]).unwrap();
        let builder = Builder::new(&graph, HeapKind::Binary);

        assert_eq!(builder.witness_search(0, 3, 30, 9), 30);
        assert_eq!(builder.witness_search(0, 3, 29, 9), INFINITY);
        // avoiding node 1 severs the only path
        assert_eq!(builder.witness_search(0, 3, 100, 1), INFINITY);
    }

    #[test]
    fn all_backends_build_the_same_shortcuts() {
        let graph = Graph::new(
            6,
            &[
                (0, 1, 2), (1, 2, 2), (2, 3, 2), (3, 4, 2), (4, 5, 2),
                (0, 3, 9), (5, 0, 1),
            ],
        )
        .unwrap();

        let baseline = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);
        for kind in [HeapKind::Fibonacci, HeapKind::Radix] {
            let ch = ContractionHierarchy::preprocess(&graph, kind);
            assert_eq!(ch.shortcut_count(), baseline.shortcut_count(), "kind {:?}", kind);
            assert_eq!(ch.rank, baseline.rank, "kind {:?}", kind);
        }
    }
}
