use crate::analysis::ego::EgoNetwork;
use crate::core::ids::NodeId;
use rand::prelude::*;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Label -> sorted members, ego included in every group.
pub type LabelGroups = BTreeMap<NodeId, Vec<NodeId>>;

/// Overlapping label propagation over one ego-minus-ego network.
///
/// Runs exactly `max_rounds` passes in a freshly shuffled order. The first
/// pass gives every node with neighbors one label drawn uniformly from the
/// distinct labels around it; later passes assign the full set of most
/// frequent neighbor labels, which is where overlap comes from. Updates are
/// applied in place, so a node sees labels already rewritten earlier in the
/// same pass. A neighbor that has no label yet votes for itself.
///
/// Nodes without neighbors never take part and end up as `{itself}`.
pub fn overlapping_label_propagation<R: Rng + ?Sized>(
    ego_net: &EgoNetwork,
    max_rounds: usize,
    rng: &mut R,
) -> LabelGroups {
    let sub = &ego_net.subgraph;
    let node_count = sub.node_count();

    // current and previously recorded label sets always move together,
    // so one sorted set per node is enough
    let mut labels: Vec<Option<Vec<NodeId>>> = vec![None; node_count];
    let mut order = (0..node_count as u32).collect::<Vec<u32>>();
    let mut label_freq: BTreeMap<NodeId, usize> = BTreeMap::new();

    for round in 1..=max_rounds {
        order.shuffle(rng);

        for &node in &order {
            let neighbors = sub.neighbors(node);
            if neighbors.is_empty() {
                continue;
            }

            label_freq.clear();
            for &nn in neighbors {
                match &labels[nn as usize] {
                    Some(held) => {
                        for label in held {
                            *label_freq.entry(*label).or_insert(0) += 1;
                        }
                    }
                    None => *label_freq.entry(sub.node(nn)).or_insert(0) += 1,
                }
            }

            if round == 1 {
                let distinct = label_freq.keys().copied().collect::<Vec<NodeId>>();
                if let Some(label) = distinct.choose(rng) {
                    labels[node as usize] = Some(vec![*label]);
                }
                continue;
            }

            let max_freq = label_freq.values().copied().max().unwrap_or(0);
            // BTreeMap order keeps the candidate sorted
            let candidate = label_freq
                .iter()
                .filter(|(_, freq)| **freq == max_freq)
                .map(|(label, _)| *label)
                .collect::<Vec<NodeId>>();

            if labels[node as usize].as_ref() != Some(&candidate) {
                labels[node as usize] = Some(candidate);
            }
        }
    }

    let mut groups = LabelGroups::new();
    for (local, held) in labels.into_iter().enumerate() {
        let node = sub.node(local as u32);
        let held = match held {
            Some(held) if sub.degree(local as u32) > 0 => held,
            _ => vec![node],
        };
        for label in held {
            groups.entry(label).or_default().push(node);
        }
    }

    for members in groups.values_mut() {
        members.push(ego_net.ego);
        members.sort_unstable();
    }

    groups
}
