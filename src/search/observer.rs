use crate::graph::NodeId;

/// Event sink invoked by every search engine as it runs.
///
/// Front-ends that animate search progress implement this to receive one
/// `node_closed` call per finalised node, in closure order; the engines'
/// control flow stays ordinary sequential code and the final distance/parent
/// results do not depend on the observer.
pub trait SearchObserver {
    /// `node` was finalised at distance `dist` and will never be re-opened.
    fn node_closed(&mut self, node: NodeId, dist: u64) {
        let _ = (node, dist);
    }

    /// The tentative distance of `to` improved to `dist` through `from`.
    fn edge_relaxed(&mut self, from: NodeId, to: NodeId, dist: u64) {
        let _ = (from, to, dist);
    }
}

/// Observer that ignores every event.
pub struct SilentObserver;

impl SearchObserver for SilentObserver {}

/// Observer that records the closure sequence, for step-wise replay.
#[derive(Default)]
pub struct ClosureLog {
    pub closed: Vec<(NodeId, u64)>,
}

impl ClosureLog {
    pub fn new() -> Self {
        ClosureLog { closed: Vec::new() }
    }
}

impl SearchObserver for ClosureLog {
    fn node_closed(&mut self, node: NodeId, dist: u64) {
        self.closed.push((node, dist));
    }
}
