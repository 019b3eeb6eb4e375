mod adjacency;
mod generator;

pub use adjacency::*;
pub use generator::*;
