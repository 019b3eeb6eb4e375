pub mod graph;
pub mod queues;
pub mod search;
pub mod statistics;
