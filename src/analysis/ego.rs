use crate::core::graph::{Graph, Subgraph};
use crate::core::ids::NodeId;

/// Neighborhood of `ego` with the center itself left out.
#[derive(Debug)]
pub struct EgoNetwork {
    pub ego: NodeId,
    pub subgraph: Subgraph,
}

pub fn ego_network(graph: &Graph, ego: NodeId) -> EgoNetwork {
    EgoNetwork {
        ego,
        subgraph: graph.induced_subgraph(graph.neighbors(ego)),
    }
}
