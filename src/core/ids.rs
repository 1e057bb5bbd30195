use std::collections::HashMap;

pub type NodeId = u32;

/// Identifier as it appears in the edge list.
pub type ExternalId = i64;

/// Maps external node identifiers to dense slots in first-appearance order.
pub struct NodeRegistry {
    map: HashMap<ExternalId, NodeId>,
    externals: Vec<ExternalId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            externals: Vec::new(),
        }
    }

    pub fn get_or_insert(&mut self, external_id: ExternalId) -> NodeId {
        if let Some(id) = self.map.get(&external_id) {
            return *id;
        }
        let next = self.externals.len();
        if next == u32::MAX as usize {
            panic!("Nodes count exceeds the limit")
        }
        self.map.insert(external_id, next as NodeId);
        self.externals.push(external_id);
        next as NodeId
    }

    pub fn get(&self, external_id: ExternalId) -> Option<NodeId> {
        self.map.get(&external_id).copied()
    }

    pub fn external(&self, id: NodeId) -> Option<ExternalId> {
        self.externals.get(id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.externals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.externals.is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let mut reg = NodeRegistry::new();
        assert_eq!(0, reg.get_or_insert(42));
        assert_eq!(1, reg.get_or_insert(-7));
        assert_eq!(0, reg.get_or_insert(42));
        assert_eq!(2, reg.len());
        assert_eq!(Some(1), reg.get(-7));
        assert_eq!(None, reg.get(3));
        assert_eq!(Some(42), reg.external(0));
        assert_eq!(Some(-7), reg.external(1));
        assert_eq!(None, reg.external(2));
    }

    #[test]
    fn test_empty_registry() {
        let reg = NodeRegistry::default();
        assert!(reg.is_empty());
        assert_eq!(0, reg.len());
    }
}
