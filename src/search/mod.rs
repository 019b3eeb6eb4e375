//! Search strategies over a [`Graph`](crate::graph::Graph): single-source
//! Dijkstra, skewed bidirectional Dijkstra, and contraction hierarchies.
//! All three are parameterised by a [`HeapKind`](crate::queues::HeapKind)
//! and must agree on every distance they report.

mod bidirectional;
mod contraction;
mod dijkstra;
mod observer;
mod visited;

pub use bidirectional::*;
pub use contraction::*;
pub use dijkstra::*;
pub use observer::*;
pub use visited::*;
