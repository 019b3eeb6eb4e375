use crate::graph::{Graph, GraphError, INFINITY, NodeId};
use crate::queues::PriorityQueue;
use crate::search::bidirectional::PathResult;
use crate::search::contraction::ContractionHierarchy;
use crate::search::observer::{SearchObserver, SilentObserver};

/// One upward frontier of the query. Unlike the plain bidirectional search
/// this one only ever relaxes edges that do not descend in rank.
struct Upward {
    distances: Vec<u64>,
    parents: Vec<Option<NodeId>>,
    queue: Box<dyn PriorityQueue>,
}

impl ContractionHierarchy {
    /// Point-to-point shortest path over the preprocessed graph.
    ///
    /// Both frontiers climb the hierarchy: an edge `u -> v` is relaxed only
    /// when `rank(v) >= rank(u)`. Shortcut edges on the winning path are
    /// recursively unpacked so the reported path consists of original nodes.
    pub fn query(&self, source: NodeId, target: NodeId) -> Result<PathResult, GraphError> {
        self.query_observed(source, target, &mut SilentObserver)
    }

    /// [`ContractionHierarchy::query`] with a per-closure event sink
    /// spanning both upward frontiers.
    pub fn query_observed(
        &self,
        source: NodeId,
        target: NodeId,
        observer: &mut impl SearchObserver,
    ) -> Result<PathResult, GraphError> {
        let n = self.forward.node_count();
        for node in [source, target] {
            if node.0 >= n {
                return Err(GraphError::InvalidNode { id: node.0, count: n });
            }
        }
        if source == target {
            return Ok(PathResult {
                length: 0,
                path: vec![source],
            });
        }

        let mut forward = self.upward_frontier(source);
        let mut backward = self.upward_frontier(target);

        let mut best = INFINITY;
        let mut meeting: Option<NodeId> = None;

        // Each side must drain fully; the bidirectional stopping rule does
        // not apply because upward searches skip the nodes beneath them.
        while !forward.queue.is_empty() || !backward.queue.is_empty() {
            if !forward.queue.is_empty() {
                self.upward_step(
                    &self.forward,
                    &mut forward,
                    &backward,
                    &mut best,
                    &mut meeting,
                    observer,
                );
            }
            if !backward.queue.is_empty() {
                self.upward_step(
                    &self.backward,
                    &mut backward,
                    &forward,
                    &mut best,
                    &mut meeting,
                    observer,
                );
            }
        }

        let Some(meeting) = meeting else {
            return Ok(PathResult::unreachable());
        };

        // path over the augmented graph first, shortcuts included
        let mut over_shortcuts = vec![meeting];
        let mut cursor = meeting;
        while let Some(parent) = forward.parents[cursor.0] {
            over_shortcuts.push(parent);
            cursor = parent;
        }
        over_shortcuts.reverse();
        let mut cursor = meeting;
        while let Some(parent) = backward.parents[cursor.0] {
            over_shortcuts.push(parent);
            cursor = parent;
        }

        let mut path = vec![source];
        for pair in over_shortcuts.windows(2) {
            self.unpack_edge(pair[0].0, pair[1].0, &mut path);
        }

        Ok(PathResult { length: best, path })
    }

    fn upward_frontier(&self, origin: NodeId) -> Upward {
        let n = self.forward.node_count();
        let mut frontier = Upward {
            distances: vec![INFINITY; n],
            parents: vec![None; n],
            queue: self.kind.make(),
        };
        frontier.distances[origin.0] = 0;
        frontier
            .queue
            .insert(origin, 0)
            .expect("origin insert into a fresh queue");
        frontier
    }

    fn upward_step(
        &self,
        edges: &Graph,
        own: &mut Upward,
        other: &Upward,
        best: &mut u64,
        meeting: &mut Option<NodeId>,
        observer: &mut impl SearchObserver,
    ) {
        let (u, d) = own.queue.extract_min().expect("non-empty upward frontier");
        if d > *best || d > own.distances[u.0] {
            return; // settled beyond the best path, or stale
        }
        observer.node_closed(u, d);

        if other.distances[u.0] != INFINITY {
            let candidate = d.saturating_add(other.distances[u.0]);
            if candidate < *best {
                *best = candidate;
                *meeting = Some(u);
            }
        }

        for edge in edges.out_edges(u) {
            let v = edge.to;
            if self.rank[u.0] >= self.rank[v.0] {
                continue; // only climb the hierarchy
            }
            let alt = d.saturating_add(edge.weight);
            if alt < own.distances[v.0] {
                own.distances[v.0] = alt;
                own.parents[v.0] = Some(u);
                observer.edge_relaxed(u, v, alt);
                if own.queue.contains(v) {
                    own.queue.decrease_key(v, alt).expect("queued node improves");
                } else {
                    own.queue.insert(v, alt).expect("first discovery of node");
                }
            }
        }
    }

    /// Expands the edge `from -> to` of the augmented graph into the original
    /// nodes it stands for, appending everything after `from` to `out`.
    fn unpack_edge(&self, from: usize, to: usize, out: &mut Vec<NodeId>) {
        match self.shortcuts.get(&(from, to)) {
            Some(&middle) => {
                self.unpack_edge(from, middle.0, out);
                self.unpack_edge(middle.0, to, out);
            }
            None => out.push(NodeId(to)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate_graph;
    use crate::queues::HeapKind;
    use crate::search::dijkstra::dijkstra;

    fn min_original_weight(graph: &Graph, from: NodeId, to: NodeId) -> Option<u64> {
        graph
            .out_edges(from)
            .iter()
            .filter(|e| e.to == to)
            .map(|e| e.weight)
            .min()
    }

    #[test]
    fn chain_all_pairs() {
        let graph = Graph::new(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        for source in 0..5 {
            let baseline = dijkstra(&graph, NodeId(source), HeapKind::Binary).unwrap();
            for target in 0..5 {
                let result = ch.query(NodeId(source), NodeId(target)).unwrap();
                assert_eq!(
                    result.length,
                    baseline.distance(NodeId(target)),
                    "{source} -> {target}"
                );
            }
        }
    }

    #[test]
    fn chain_path_is_unpacked_to_original_edges() {
        let graph = Graph::new(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        let result = ch.query(NodeId(0), NodeId(4)).unwrap();
        assert_eq!(result.length, 10);
        assert_eq!(
            result.path,
            vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
    }

    #[test]
    fn triangle_prefers_the_detour() {
        let graph = Graph::new(3, &[(0, 1, 5), (0, 2, 1), (2, 1, 1)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        let result = ch.query(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(result.length, 2);
        assert_eq!(result.path, vec![NodeId(0), NodeId(2), NodeId(1)]);
    }

    #[test]
    fn unreachable_pair() {
        let graph = Graph::new(2, &[]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);
        let result = ch.query(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(result, PathResult::unreachable());
    }

    #[test]
    fn source_equals_target() {
        let graph = Graph::new(3, &[(0, 1, 1)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);
        let result = ch.query(NodeId(2), NodeId(2)).unwrap();
        assert_eq!(result.length, 0);
        assert_eq!(result.path, vec![NodeId(2)]);
    }

    #[test]
    fn rejects_out_of_range_query() {
        let graph = Graph::new(3, &[(0, 1, 1)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);
        let err = ch.query(NodeId(0), NodeId(7)).unwrap_err();
        assert_eq!(err, GraphError::InvalidNode { id: 7, count: 3 });
    }

    #[test]
    fn observer_sees_both_upward_frontiers() {
        use crate::search::observer::ClosureLog;

        let graph = Graph::new(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]).unwrap();
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        let mut log = ClosureLog::new();
        let result = ch.query_observed(NodeId(0), NodeId(4), &mut log).unwrap();
        assert_eq!(result, ch.query(NodeId(0), NodeId(4)).unwrap());

        // both origins settle at distance 0, and no node settles beyond the
        // reported path length
        assert!(log.closed.contains(&(NodeId(0), 0)));
        assert!(log.closed.contains(&(NodeId(4), 0)));
        assert!(log.closed.iter().all(|&(_, dist)| dist <= result.length));
    }

    #[test]
    fn matches_dijkstra_on_random_graphs() {
        for seed in [2, 29] {
            let graph = generate_graph(40, 170, (1, 10), seed);
            let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

            for source in 0..40 {
                let baseline = dijkstra(&graph, NodeId(source), HeapKind::Binary).unwrap();
                for target in 0..40 {
                    let result = ch.query(NodeId(source), NodeId(target)).unwrap();
                    assert_eq!(
                        result.length,
                        baseline.distance(NodeId(target)),
                        "seed {seed}, {source} -> {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn unpacked_paths_resum_to_the_reported_length() {
        let graph = generate_graph(35, 160, (1, 10), 41);
        let ch = ContractionHierarchy::preprocess(&graph, HeapKind::Radix);

        for target in 1..35 {
            let result = ch.query(NodeId(0), NodeId(target)).unwrap();
            if !result.is_reachable() {
                continue;
            }
            assert_eq!(result.path[0], NodeId(0));
            assert_eq!(*result.path.last().unwrap(), NodeId(target));

            let mut total = 0;
            for pair in result.path.windows(2) {
                total += min_original_weight(&graph, pair[0], pair[1])
                    .expect("unpacked edge must be an original edge");
            }
            assert_eq!(total, result.length, "target {target}");
        }
    }

    #[test]
    fn query_results_agree_across_preprocessing_backends() {
        let graph = generate_graph(30, 140, (1, 10), 57);
        let baseline = ContractionHierarchy::preprocess(&graph, HeapKind::Binary);

        for kind in [HeapKind::Fibonacci, HeapKind::Radix] {
            let ch = ContractionHierarchy::preprocess(&graph, kind);
            for target in 0..30 {
                let expected = baseline.query(NodeId(0), NodeId(target)).unwrap();
                let result = ch.query(NodeId(0), NodeId(target)).unwrap();
                assert_eq!(result.length, expected.length, "target {target}, kind {:?}", kind);
            }
        }
    }
}
