use std::collections::HashMap;

use pdxtxt::PdxNode;

use crate::MapperError;

/// Province correspondence between the two games.
///
/// The relation is one-to-many in both directions, so the forward and
/// inverse maps are built together in one pass over the link records.
#[derive(Debug, Default)]
pub struct ProvinceMapper {
    /// v2 province -> eu4 provinces
    forward: HashMap<u32, Vec<u32>>,
    /// eu4 province -> v2 provinces
    inverse: HashMap<u32, Vec<u32>>,
}

impl ProvinceMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(mappings) = root.children().first() else {
            return Err(MapperError::Empty("province"));
        };

        let mut mapper = ProvinceMapper::default();
        for link in mappings.children() {
            let mut eu4_nums: Vec<u32> = Vec::new();
            let mut v2_nums: Vec<u32> = Vec::new();
            for entry in link.children() {
                match (entry.key(), entry.leaf().and_then(|s| s.parse().ok())) {
                    ("eu4", Some(num)) => eu4_nums.push(num),
                    ("v2", Some(num)) => v2_nums.push(num),
                    _ => log::warn!("unknown data while mapping provinces: {}", entry.key()),
                }
            }
            for &v2 in &v2_nums {
                mapper.forward.insert(v2, eu4_nums.clone());
            }
            for &eu4 in &eu4_nums {
                mapper.inverse.insert(eu4, v2_nums.clone());
            }
        }
        Ok(mapper)
    }

    pub fn source_provinces(&self, v2_num: u32) -> &[u32] {
        self.forward.get(&v2_num).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dest_provinces(&self, eu4_num: u32) -> &[u32] {
        self.inverse.get(&eu4_num).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dest_province_nums(&self) -> impl Iterator<Item = u32> + '_ {
        self.forward.keys().copied()
    }
}

/// Groups destination provinces into administrative states: every province
/// in a group maps to the full group, itself included.
#[derive(Debug, Default)]
pub struct StateMapper {
    groups: HashMap<u32, Vec<u32>>,
}

impl StateMapper {
    pub fn from_node(root: &PdxNode) -> Self {
        let mut mapper = StateMapper::default();
        for state in root.children() {
            let members: Vec<u32> = state
                .tokens()
                .iter()
                .filter_map(|t| t.parse().ok())
                .collect();
            for &id in &members {
                mapper.groups.insert(id, members.clone());
            }
        }
        mapper
    }

    pub fn state_of(&self, id: u32) -> &[u32] {
        self.groups.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
