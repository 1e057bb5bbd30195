use crate::core::ids::NodeId;
use std::ops::Range;

pub struct GraphBuilder {
    node_count: usize,
    srcs: Vec<NodeId>,
    dsts: Vec<NodeId>,
}

impl GraphBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            srcs: vec![],
            dsts: vec![],
        }
    }

    pub fn add_edge(&mut self, u: NodeId, v: NodeId) {
        assert!(
            (u as usize) < self.node_count && (v as usize) < self.node_count,
            "edge ({u}, {v}) references a node outside 0..{}",
            self.node_count
        );
        self.srcs.push(u);
        self.dsts.push(v);
    }

    pub fn freeze(self) -> Graph {
        let mut graph = Graph::new(self.node_count);
        if self.srcs.is_empty() {
            return graph;
        }

        let mut buf = vec![0; self.node_count];

        // every undirected edge lands in both endpoint lists, self-loops nowhere
        for (u, v) in self.srcs.iter().zip(&self.dsts) {
            if u != v {
                buf[*u as usize] += 1;
                buf[*v as usize] += 1;
            }
        }

        let mut offsets = vec![0; self.node_count + 1];
        let mut next = 0;
        for (i, edges) in buf.iter().enumerate() {
            offsets[i] = next;
            next += edges;
            offsets[i + 1] = next;
        }

        buf.fill(0);
        let mut raw = vec![0; next];
        for (u, v) in self.srcs.iter().zip(&self.dsts) {
            if u == v {
                continue;
            }
            let (u, v) = (*u as usize, *v as usize);
            raw[offsets[u] + buf[u]] = v as NodeId;
            buf[u] += 1;
            raw[offsets[v] + buf[v]] = u as NodeId;
            buf[v] += 1;
        }

        // sort each neighbor run and compact away multi-edges
        next = 0;
        for i in 0..self.node_count {
            let run = &mut raw[offsets[i]..offsets[i + 1]];
            run.sort_unstable();
            graph.offsets[i] = next;
            let mut last = None;
            for &n in run.iter() {
                if last != Some(n) {
                    graph.neighbors.push(n);
                    last = Some(n);
                    next += 1;
                }
            }
            graph.offsets[i + 1] = next;
        }

        graph
    }
}

/// Undirected simple graph in CSR form with sorted neighbor lists.
pub struct Graph {
    node_count: usize,
    neighbors: Vec<NodeId>,
    offsets: Vec<usize>,
}

impl Graph {
    fn new(node_count: usize) -> Self {
        Self {
            node_count,
            neighbors: vec![],
            offsets: vec![0; node_count + 1],
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.len() / 2
    }

    pub fn nodes(&self) -> Range<NodeId> {
        0..self.node_count as NodeId
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.offsets[node as usize + 1] - self.offsets[node as usize]
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.neighbors[self.offsets[node as usize]..self.offsets[node as usize + 1]]
    }

    /// Subgraph on `nodes` keeping exactly the edges with both endpoints inside.
    pub fn induced_subgraph(&self, nodes: &[NodeId]) -> Subgraph {
        let mut members = nodes.to_vec();
        members.sort_unstable();
        members.dedup();

        let mut offsets = Vec::with_capacity(members.len() + 1);
        let mut adjacency = Vec::new();
        offsets.push(0);
        for &u in &members {
            for n in self.neighbors(u) {
                if let Ok(local) = members.binary_search(n) {
                    adjacency.push(local as u32);
                }
            }
            offsets.push(adjacency.len());
        }

        Subgraph {
            nodes: members,
            adjacency,
            offsets,
        }
    }
}

/// Induced subgraph addressed by local indices `0..node_count`.
#[derive(Debug)]
pub struct Subgraph {
    nodes: Vec<NodeId>,
    adjacency: Vec<u32>,
    offsets: Vec<usize>,
}

impl Subgraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn node(&self, local: u32) -> NodeId {
        self.nodes[local as usize]
    }

    pub fn neighbors(&self, local: u32) -> &[u32] {
        &self.adjacency[self.offsets[local as usize]..self.offsets[local as usize + 1]]
    }

    pub fn degree(&self, local: u32) -> usize {
        self.offsets[local as usize + 1] - self.offsets[local as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edges() {
        let gb = GraphBuilder::new(2);
        let g = gb.freeze();

        assert_eq!(3, g.offsets.len());
        assert!(g.offsets.iter().all(|off| *off == 0));
        assert_eq!(0, g.edge_count());
        assert!(g.neighbors(0).is_empty());
        assert!(g.neighbors(1).is_empty());
    }

    #[test]
    fn test_single_edge() {
        let mut gb = GraphBuilder::new(2);
        gb.add_edge(0, 1);
        let g = gb.freeze();

        assert_eq!(vec![0, 1, 2], g.offsets);
        assert_eq!(1, g.edge_count());
        assert_eq!(&[1], g.neighbors(0));
        assert_eq!(&[0], g.neighbors(1));
    }

    #[test]
    fn test_self_loops_dropped() {
        let mut gb = GraphBuilder::new(2);
        gb.add_edge(0, 0);
        gb.add_edge(0, 1);
        let g = gb.freeze();

        assert_eq!(1, g.edge_count());
        assert_eq!(&[1], g.neighbors(0));
        assert_eq!(1, g.degree(0));
    }

    #[test]
    fn test_multi_edges_collapsed() {
        let mut gb = GraphBuilder::new(3);
        gb.add_edge(0, 1);
        gb.add_edge(1, 0);
        gb.add_edge(0, 1);
        gb.add_edge(2, 1);
        let g = gb.freeze();

        assert_eq!(2, g.edge_count());
        assert_eq!(&[1], g.neighbors(0));
        assert_eq!(&[0, 2], g.neighbors(1));
        assert_eq!(&[1], g.neighbors(2));
    }

    #[test]
    fn test_neighbors_sorted() {
        let mut gb = GraphBuilder::new(5);
        gb.add_edge(0, 4);
        gb.add_edge(0, 2);
        gb.add_edge(3, 0);
        gb.add_edge(0, 1);
        let g = gb.freeze();

        assert_eq!(&[1, 2, 3, 4], g.neighbors(0));
        assert_eq!(4, g.degree(0));
        assert_eq!(vec![0, 1, 2, 3, 4], g.nodes().collect::<Vec<_>>());
    }

    #[test]
    #[should_panic]
    fn test_edge_outside_node_range() {
        let mut gb = GraphBuilder::new(2);
        gb.add_edge(0, 2);
    }

    #[test]
    fn test_induced_subgraph() {
        // square 0-1-2-3 with chord 0-2
        let mut gb = GraphBuilder::new(4);
        gb.add_edge(0, 1);
        gb.add_edge(1, 2);
        gb.add_edge(2, 3);
        gb.add_edge(3, 0);
        gb.add_edge(0, 2);
        let g = gb.freeze();

        let sub = g.induced_subgraph(&[3, 1, 2]);
        assert_eq!(&[1, 2, 3], sub.nodes());
        assert_eq!(2, sub.edge_count());
        // local 0 = node 1, local 1 = node 2, local 2 = node 3
        assert_eq!(&[1], sub.neighbors(0));
        assert_eq!(&[0, 2], sub.neighbors(1));
        assert_eq!(&[1], sub.neighbors(2));
        assert_eq!(2, sub.node(1));
    }

    #[test]
    fn test_induced_subgraph_without_edges() {
        let mut gb = GraphBuilder::new(3);
        gb.add_edge(0, 1);
        gb.add_edge(0, 2);
        let g = gb.freeze();

        let sub = g.induced_subgraph(&[1, 2]);
        assert_eq!(2, sub.node_count());
        assert_eq!(0, sub.edge_count());
        assert_eq!(0, sub.degree(0));
        assert!(g.induced_subgraph(&[]).is_empty());
    }
}
