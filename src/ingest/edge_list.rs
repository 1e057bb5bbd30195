use crate::core::graph::{Graph, GraphBuilder};
use crate::core::ids::{ExternalId, NodeId, NodeRegistry};
use anyhow::Context;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, PartialEq)]
pub struct IngestStats {
    pub parsed: u64,
    pub skipped: u64,
}

/// Undirected edges keyed by dense ids, collected before the graph is frozen.
pub struct EdgeList {
    registry: NodeRegistry,
    edges: Vec<(NodeId, NodeId)>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::new(),
            edges: vec![],
        }
    }

    pub fn from_pairs(pairs: &[(ExternalId, ExternalId)]) -> Self {
        let mut edges = Self::new();
        for (u, v) in pairs {
            edges.push(*u, *v);
        }
        edges
    }

    pub fn push(&mut self, u: ExternalId, v: ExternalId) {
        let u = self.registry.get_or_insert(u);
        let v = self.registry.get_or_insert(v);
        self.edges.push((u, v));
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn graph(&self) -> Graph {
        let mut gb = GraphBuilder::new(self.registry.len());
        for (u, v) in &self.edges {
            gb.add_edge(*u, *v);
        }
        gb.freeze()
    }

    pub fn freeze(self) -> (Graph, NodeRegistry) {
        let graph = self.graph();
        (graph, self.registry)
    }
}

impl Default for EdgeList {
    fn default() -> Self {
        Self::new()
    }
}

/// Passes bytes through, rewriting tabs and spaces to commas.
struct CommaSeparated<R> {
    inner: R,
}

impl<R: Read> Read for CommaSeparated<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for byte in &mut buf[..n] {
            if matches!(*byte, b'\t' | b' ') {
                *byte = b',';
            }
        }
        Ok(n)
    }
}

fn parse_id(field: &[u8]) -> Option<ExternalId> {
    std::str::from_utf8(field).ok()?.parse().ok()
}

/// Reads one edge per line from the first two integer fields.
///
/// Tabs and spaces count as commas, so `1 2`, `1\t2` and `1,2,0.5` all give
/// the edge `(1, 2)`. Any line whose first two fields are not integers is
/// skipped and counted, including lines with quotes or invalid UTF-8. The
/// input is streamed; only I/O failures abort the read.
pub fn ingest_edge_list<R: Read>(reader: R, edges: &mut EdgeList) -> anyhow::Result<IngestStats> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(CommaSeparated { inner: reader });
    let mut stats = IngestStats {
        parsed: 0,
        skipped: 0,
    };

    for maybe_record in csv_reader.byte_records() {
        let record = match maybe_record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err).context("cannot read edge list"),
            Err(_) => {
                stats.skipped += 1;
                continue;
            }
        };
        match (record.get(0).and_then(parse_id), record.get(1).and_then(parse_id)) {
            (Some(src), Some(dst)) => {
                edges.push(src, dst);
                stats.parsed += 1;
            }
            _ => stats.skipped += 1,
        }
    }

    anyhow::Ok(stats)
}

pub fn load_edge_list(path: &Path) -> anyhow::Result<(Graph, NodeRegistry, IngestStats)> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut edges = EdgeList::new();
    let stats = ingest_edge_list(file, &mut edges)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let (graph, registry) = edges.freeze();

    info!(
        parsed = stats.parsed,
        skipped = stats.skipped,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );

    Ok((graph, registry, stats))
}
