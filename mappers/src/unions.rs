use pdxtxt::PdxNode;

use crate::MapperError;

/// Cultural unions: cultures whose speakers grant cores to a formable tag.
#[derive(Debug, Default)]
pub struct UnionMapper {
    pairs: Vec<(String, String)>,
}

impl UnionMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(unions) = root.children().first() else {
            return Err(MapperError::Empty("union"));
        };

        let mut mapper = UnionMapper::default();
        for entry in unions.children() {
            let culture = entry.leaf_of("culture").unwrap_or_default();
            let tag = entry.leaf_of("tag").unwrap_or_default();
            if culture.is_empty() || tag.is_empty() {
                log::warn!("malformed union rule, skipping");
                continue;
            }
            mapper.pairs.push((culture.to_string(), tag.to_string()));
        }
        Ok(mapper)
    }

    /// Union tags whose culture matches, in declaration order.
    pub fn union_tags(&self, culture: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(c, _)| c == culture)
            .map(|(_, t)| t.as_str())
            .collect()
    }
}
