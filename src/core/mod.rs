pub mod graph;
pub mod ids;
