use std::collections::HashMap;

use pdxtxt::PdxNode;

use crate::MapperError;

/// Many-to-one government-type mapping.
#[derive(Debug, Default)]
pub struct GovernmentMapper {
    map: HashMap<String, String>,
}

impl GovernmentMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(links) = root.children().first() else {
            return Err(MapperError::Empty("government"));
        };

        let mut mapper = GovernmentMapper::default();
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_grouped_governments() {
        let root = pdxtxt::parse_str(
            r#"
            governmentMapping = {
                link = { eu4 = monarchy eu4 = feudal_monarchy v2 = absolute_monarchy }
                link = { eu4 = merchant_republic v2 = democracy }
            }
            "#,
        )
        .unwrap();
        let m = GovernmentMapper::from_node(&root).unwrap();
        assert_eq!(m.convert("feudal_monarchy"), Some("absolute_monarchy"));
        assert_eq!(m.convert("theocracy"), None);
    }
}
