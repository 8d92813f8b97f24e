use std::collections::HashMap;

use pdxtxt::PdxNode;

use crate::MapperError;

/// Many-to-one religion mapping.
#[derive(Debug, Default)]
pub struct ReligionMapper {
    map: HashMap<String, String>,
}

impl ReligionMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(links) = root.children().first() else {
            return Err(MapperError::Empty("religion"));
        };

        let mut mapper = ReligionMapper::default();
        for link in links.children() {
            let dst = link.leaf_of("v2").unwrap_or_default().to_string();
            for src in link.values("eu4") {
                if let Some(src) = src.leaf() {
                    mapper.map.insert(src.to_string(), dst.clone());
                }
            }
        }
        Ok(mapper)
    }

    pub fn convert(&self, src: &str) -> Option<&str> {
        self.map.get(src).map(String::as_str)
    }

    pub fn is_mapped(&self, src: &str) -> bool {
        self.map.contains_key(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn many_to_one() {
        let root = pdxtxt::parse_str(
            r#"
            religionMap = {
                link = { eu4 = catholic eu4 = insular v2 = catholic }
                link = { eu4 = protestant v2 = protestant }
            }
            "#,
        )
        .unwrap();
        let m = ReligionMapper::from_node(&root).unwrap();
        assert_eq!(m.convert("catholic"), Some("catholic"));
        assert_eq!(m.convert("insular"), Some("catholic"));
        assert_eq!(m.convert("tengri"), None);
    }

    #[test]
    fn empty_file_is_fatal() {
        let root = pdxtxt::parse_str("").unwrap();
        assert!(ReligionMapper::from_node(&root).is_err());
    }
}
