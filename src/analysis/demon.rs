//! Local-first overlapping community discovery.
//!
//! Every node is taken in turn as an ego: its ego-minus-ego network is
//! labeled by [`overlapping_label_propagation`], groups larger than the
//! minimum size are offered to a [`CommunitySet`], and whatever the set holds
//! after the last ego is the result.
//!
//! Per-ego extraction and propagation only read the graph. The merge is a
//! sequential, order-dependent reduction, so egos are visited in node id
//! order and a single generator is consumed in that order.

use crate::analysis::ego::ego_network;
use crate::analysis::merge::{Community, CommunitySet, DEFAULT_EPSILON, MergeOutcome};
use crate::analysis::propagation::{DEFAULT_MAX_ROUNDS, overlapping_label_propagation};
use crate::core::graph::Graph;
use rand::prelude::*;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_MIN_COMMUNITY_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct DemonConfig {
    /// Minimum overlap ratio for two communities to be merged.
    pub epsilon: f64,
    /// Groups with this many members or fewer are dropped before merging.
    pub min_community_size: usize,
    pub max_rounds: usize,
    /// Drawn from the thread generator and logged when absent.
    pub seed: Option<u64>,
}

impl Default for DemonConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            min_community_size: DEFAULT_MIN_COMMUNITY_SIZE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("epsilon must lie within [0, 1], got {0}")]
    EpsilonOutOfRange(f64),
    #[error("at least one propagation round is required")]
    ZeroRounds,
}

impl DemonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::EpsilonOutOfRange(self.epsilon));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub egos: usize,
    /// Groups at or below the minimum size.
    pub filtered: usize,
    pub candidates: usize,
    pub duplicates: usize,
    pub merged: usize,
    pub inserted: usize,
}

pub struct Demon<'a> {
    graph: &'a Graph,
    config: DemonConfig,
}

impl<'a> Demon<'a> {
    pub fn new(graph: &'a Graph, config: DemonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { graph, config })
    }

    pub fn execute(&self) -> (CommunitySet, RunStats) {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        info!(seed, "seeding label propagation");
        let mut rng = StdRng::seed_from_u64(seed);
        self.execute_with_rng(&mut rng)
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> (CommunitySet, RunStats) {
        let mut communities = CommunitySet::new(self.config.epsilon);
        let mut stats = RunStats::default();
        let total = self.graph.node_count();
        let mut reported = 0;

        info!(
            nodes = total,
            edges = self.graph.edge_count(),
            epsilon = self.config.epsilon,
            min_community_size = self.config.min_community_size,
            "community extraction started"
        );

        for ego in self.graph.nodes() {
            let ego_net = ego_network(self.graph, ego);
            let groups = overlapping_label_propagation(&ego_net, self.config.max_rounds, rng);
            debug!(
                ego,
                neighbors = ego_net.subgraph.node_count(),
                groups = groups.len(),
                "ego labeled"
            );

            for members in groups.into_values() {
                debug_assert!(members.binary_search(&ego).is_ok());
                if members.len() <= self.config.min_community_size {
                    stats.filtered += 1;
                    continue;
                }
                stats.candidates += 1;
                match communities.offer(Community::from_members(members)) {
                    MergeOutcome::Duplicate => stats.duplicates += 1,
                    MergeOutcome::Merged { .. } => stats.merged += 1,
                    MergeOutcome::Inserted { .. } => stats.inserted += 1,
                }
            }

            stats.egos += 1;
            let percent = stats.egos * 100 / total;
            if percent >= reported + 10 {
                reported = percent - percent % 10;
                info!(percent = reported, communities = communities.len(), "extraction progress");
            }
        }

        info!(
            communities = communities.len(),
            filtered = stats.filtered,
            candidates = stats.candidates,
            inserted = stats.inserted,
            merged = stats.merged,
            duplicates = stats.duplicates,
            "community extraction finished"
        );

        (communities, stats)
    }
}
