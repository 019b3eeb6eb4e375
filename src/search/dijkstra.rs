use crate::graph::{Graph, GraphError, INFINITY, NodeId};
use crate::queues::HeapKind;
use crate::search::observer::{SearchObserver, SilentObserver};
use crate::search::visited::ClosedSet;

/// The complete result of a single-source search: per-node distances and the
/// predecessor of each reached node.
///
/// Absence of a path is a normal result, not an error: an unreached node
/// keeps distance [`INFINITY`] and no parent.
#[derive(Debug)]
pub struct ShortestPathTree {
    pub distances: Vec<u64>,
    pub parents: Vec<Option<NodeId>>,
}

impl ShortestPathTree {
    pub fn distance(&self, node: NodeId) -> u64 {
        self.distances[node.0]
    }

    /// The node sequence from the source to `target`, inclusive; empty when
    /// `target` was not reached.
    pub fn path_to(&self, target: NodeId) -> Vec<NodeId> {
        if self.distances[target.0] == INFINITY {
            return Vec::new();
        }
        let mut path = vec![target];
        let mut cursor = target;
        while let Some(parent) = self.parents[cursor.0] {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

/// Single-source Dijkstra over `graph` using the selected queue backend.
pub fn dijkstra(
    graph: &Graph,
    source: NodeId,
    kind: HeapKind,
) -> Result<ShortestPathTree, GraphError> {
    dijkstra_observed(graph, source, kind, &mut SilentObserver)
}

/// [`dijkstra`] with a per-closure event sink.
///
/// The loop settles one node per extraction. A node's first extraction
/// always carries its final distance, so anything popped for an already
/// closed node is a stale entry left behind by the radix backend's lazy
/// decrease-key and is skipped.
pub fn dijkstra_observed(
    graph: &Graph,
    source: NodeId,
    kind: HeapKind,
    observer: &mut impl SearchObserver,
) -> Result<ShortestPathTree, GraphError> {
    if !graph.contains(source) {
        return Err(GraphError::InvalidNode {
            id: source.0,
            count: graph.node_count(),
        });
    }

    let n = graph.node_count();
    let mut distances = vec![INFINITY; n];
    let mut parents: Vec<Option<NodeId>> = vec![None; n];
    let mut closed = ClosedSet::new(n);
    let mut queue = kind.make();

    distances[source.0] = 0;
    queue
        .insert(source, 0)
        .expect("source insert into a fresh queue");

    while !queue.is_empty() {
        let (u, d) = queue.extract_min().expect("non-empty queue");
        if closed.is_closed(u.0) {
            continue; // stale entry
        }
        closed.close(u.0);
        observer.node_closed(u, d);

        for edge in graph.out_edges(u) {
            let v = edge.to;
            let alt = d.saturating_add(edge.weight);
            if alt < distances[v.0] {
                distances[v.0] = alt;
                parents[v.0] = Some(u);
                observer.edge_relaxed(u, v, alt);
                if queue.contains(v) {
                    queue.decrease_key(v, alt).expect("queued node improves");
                } else {
                    queue.insert(v, alt).expect("first discovery of node");
                }
            }
        }
    }

    Ok(ShortestPathTree { distances, parents })
}
