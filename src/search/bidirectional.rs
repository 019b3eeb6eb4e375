use crate::graph::{Graph, GraphError, INFINITY, NodeId};
use crate::queues::{HeapKind, PriorityQueue};
use crate::search::observer::{SearchObserver, SilentObserver};

/// A point-to-point query result. `length == INFINITY` and an empty path
/// mean the target is unreachable, a normal outcome rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub length: u64,
    pub path: Vec<NodeId>,
}

impl PathResult {
    pub fn unreachable() -> Self {
        PathResult {
            length: INFINITY,
            path: Vec::new(),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.length != INFINITY
    }
}

/// One half of the bidirectional search.
struct Frontier {
    distances: Vec<u64>,
    parents: Vec<Option<NodeId>>,
    queue: Box<dyn PriorityQueue>,
}

impl Frontier {
    fn new(node_count: usize, origin: NodeId, kind: HeapKind) -> Self {
        let mut frontier = Frontier {
            distances: vec![INFINITY; node_count],
            parents: vec![None; node_count],
            queue: kind.make(),
        };
        frontier.distances[origin.0] = 0;
        frontier
            .queue
            .insert(origin, 0)
            .expect("origin insert into a fresh queue");
        frontier
    }

    /// Extracts and relaxes one node over `edges` (the graph for the forward
    /// side, the reversed graph for the backward side). Every improvement is
    /// checked against the opposite frontier to tighten the best known path.
    fn step(
        &mut self,
        edges: &Graph,
        other: &Frontier,
        best: &mut u64,
        meeting: &mut Option<NodeId>,
        observer: &mut impl SearchObserver,
    ) {
        let (u, d) = self.queue.extract_min().expect("non-empty frontier");
        if d > self.distances[u.0] {
            return; // stale entry
        }
        observer.node_closed(u, d);

        for edge in edges.out_edges(u) {
            let v = edge.to;
            let alt = d.saturating_add(edge.weight);
            if alt < self.distances[v.0] {
                self.distances[v.0] = alt;
                self.parents[v.0] = Some(u);
                observer.edge_relaxed(u, v, alt);
                if self.queue.contains(v) {
                    self.queue.decrease_key(v, alt).expect("queued node improves");
                } else {
                    self.queue.insert(v, alt).expect("first discovery of node");
                }

                if other.distances[v.0] != INFINITY {
                    let candidate = alt.saturating_add(other.distances[v.0]);
                    if candidate < *best {
                        *best = candidate;
                        *meeting = Some(v);
                    }
                }
            }
        }
    }
}

/// Bidirectional Dijkstra with a tunable expansion skew.
///
/// `sigma` in `[0, 1]` biases which frontier advances: the forward side is
/// expanded whenever `len(forward) * (1 - sigma) <= len(backward) * sigma`,
/// a deterministic weighted round-robin over the frontier sizes. `sigma = 1`
/// degenerates to plain forward Dijkstra, `sigma = 0` to pure backward
/// search, and `sigma = 0.5` always expands the smaller frontier.
///
/// The search stops as soon as the sum of the two minimum frontier keys
/// reaches the best known path length; frontier intersection alone is not a
/// sufficient stopping rule.
///
/// # Panics
/// Panics if `sigma` is outside `[0, 1]`.
pub fn bidirectional_skewed(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    sigma: f64,
    kind: HeapKind,
) -> Result<PathResult, GraphError> {
    bidirectional_skewed_observed(graph, source, target, sigma, kind, &mut SilentObserver)
}

/// [`bidirectional_skewed`] with a per-closure event sink spanning both
/// frontiers.
pub fn bidirectional_skewed_observed(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    sigma: f64,
    kind: HeapKind,
    observer: &mut impl SearchObserver,
) -> Result<PathResult, GraphError> {
    assert!((0.0..=1.0).contains(&sigma), "sigma must be within [0, 1]");

    for node in [source, target] {
        if !graph.contains(node) {
            return Err(GraphError::InvalidNode {
                id: node.0,
                count: graph.node_count(),
            });
        }
    }
    if source == target {
        return Ok(PathResult {
            length: 0,
            path: vec![source],
        });
    }

    let reversed = graph.reversed();
    let n = graph.node_count();
    let mut forward = Frontier::new(n, source, kind);
    let mut backward = Frontier::new(n, target, kind);

    let mut best = INFINITY;
    let mut meeting: Option<NodeId> = None;

    while !forward.queue.is_empty() && !backward.queue.is_empty() {
        let (Some(f_min), Some(b_min)) = (forward.queue.min_key(), backward.queue.min_key())
        else {
            break;
        };
        if f_min.saturating_add(b_min) >= best {
            break; // no remaining expansion can beat the best known path
        }

        let forward_turn = (forward.queue.len() as f64) * (1.0 - sigma)
            <= (backward.queue.len() as f64) * sigma;
        if forward_turn {
            forward.step(graph, &backward, &mut best, &mut meeting, observer);
        } else {
            backward.step(&reversed, &forward, &mut best, &mut meeting, observer);
        }
    }

    let Some(meeting) = meeting else {
        return Ok(PathResult::unreachable());
    };

    // forward half: meeting back to source, then flipped
    let mut path = vec![meeting];
    let mut cursor = meeting;
    while let Some(parent) = forward.parents[cursor.0] {
        path.push(parent);
        cursor = parent;
    }
    path.reverse();

    // backward half: parents point toward the target in the reversed graph
    let mut cursor = meeting;
    while let Some(parent) = backward.parents[cursor.0] {
        path.push(parent);
        cursor = parent;
    }

    Ok(PathResult { length: best, path })
}
