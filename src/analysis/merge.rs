use crate::core::ids::NodeId;
use indexmap::IndexSet;
use std::cmp::Ordering;

pub const DEFAULT_EPSILON: f64 = 0.25;

/// Sorted, deduplicated member list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Community(Vec<NodeId>);

impl Community {
    pub fn from_members(mut members: Vec<NodeId>) -> Self {
        members.sort_unstable();
        members.dedup();
        Self(members)
    }

    pub fn members(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.0.binary_search(&node).is_ok()
    }

    pub fn intersection_len(&self, other: &Community) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    pub fn union(&self, other: &Community) -> Community {
        let mut merged = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => {
                    merged.push(self.0[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(other.0[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.0[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&other.0[j..]);
        Community(merged)
    }
}

impl FromIterator<NodeId> for Community {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::from_members(iter.into_iter().collect())
    }
}

/// Share of the smaller community found in the other one.
pub fn overlap_ratio(a: &Community, b: &Community) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    a.intersection_len(b) as f64 / smaller as f64
}

/// Union of `a` and `b` when they overlap by at least `epsilon`.
pub fn generalized_inclusion(a: &Community, b: &Community, epsilon: f64) -> Option<Community> {
    let shared = a.intersection_len(b);
    let smaller = a.len().min(b.len());
    if shared == 0 || smaller == 0 {
        return None;
    }
    if shared as f64 / smaller as f64 >= epsilon {
        Some(a.union(b))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An identical community was already present.
    Duplicate,
    /// Folded into an existing entry, now at `index`.
    Merged { index: usize },
    /// Stored as a new entry.
    Inserted { index: usize },
}

/// Accumulated communities of one run, in insertion order.
///
/// A candidate is compared against the entries front to back and unioned into
/// the first one passing [`generalized_inclusion`]. The union takes over the
/// matched slot and is not compared against the remaining entries, so two
/// stored communities can overlap above `epsilon` and the final set depends
/// on the order candidates arrive in.
#[derive(Debug, Clone)]
pub struct CommunitySet {
    epsilon: f64,
    communities: IndexSet<Community>,
}

impl CommunitySet {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            communities: IndexSet::new(),
        }
    }

    pub fn offer(&mut self, candidate: Community) -> MergeOutcome {
        if self.communities.contains(&candidate) {
            return MergeOutcome::Duplicate;
        }

        let matched = self
            .communities
            .iter()
            .enumerate()
            .find_map(|(i, existing)| {
                generalized_inclusion(&candidate, existing, self.epsilon).map(|union| (i, union))
            });

        match matched {
            Some((index, union)) => MergeOutcome::Merged {
                index: self.replace(index, union),
            },
            None => {
                let (index, _) = self.communities.insert_full(candidate);
                MergeOutcome::Inserted { index }
            }
        }
    }

    /// Puts `union` in slot `index`, returning where it ends up.
    fn replace(&mut self, index: usize, union: Community) -> usize {
        let (existing, inserted) = self.communities.insert_full(union);
        if inserted {
            // the union sits last, swapping it into the matched slot
            self.communities.swap_remove_index(index);
            return index;
        }
        if existing == index {
            // candidate was a subset of the matched entry
            return index;
        }
        // the union already exists elsewhere: drop the matched entry
        self.communities.shift_remove_index(index);
        if existing > index { existing - 1 } else { existing }
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Community> {
        self.communities.get_index(index)
    }

    pub fn into_vec(self) -> Vec<Community> {
        self.communities.into_iter().collect()
    }
}
