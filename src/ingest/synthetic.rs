use crate::core::ids::ExternalId;
use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

pub struct SyntheticConfig {
    pub node_count: u32,
    pub edge_count: u64,
    pub seed: u64,
}

#[derive(Debug, PartialEq)]
pub struct SyntheticEdge {
    pub src: ExternalId,
    pub dst: ExternalId,
}

/// Uniform random edges without self-loops; repeated pairs are possible.
pub fn generate(cfg: &SyntheticConfig) -> impl Iterator<Item = SyntheticEdge> + use<> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let node_count = cfg.node_count;
    let edge_count = if node_count < 2 { 0 } else { cfg.edge_count };

    (0..edge_count).map(move |_| {
        let src = rng.random_range(0..node_count);
        let mut dst = rng.random_range(0..node_count);
        if dst == src {
            dst = (dst + 1) % node_count;
        }

        SyntheticEdge {
            src: src as ExternalId,
            dst: dst as ExternalId,
        }
    })
}

/// Writes the edges as tab separated pairs, returning how many were written.
pub fn write_edge_list<W: Write>(
    mut writer: W,
    edges: impl Iterator<Item = SyntheticEdge>,
) -> anyhow::Result<u64> {
    let mut written = 0;
    for edge in edges {
        writeln!(writer, "{}\t{}", edge.src, edge.dst).context("cannot write edge")?;
        written += 1;
    }
    writer.flush().context("cannot flush edge list")?;
    Ok(written)
}
