use pdxtxt::PdxNode;

use crate::MapperError;

/// One colonial naming rule. The region and tag qualifiers narrow the rule;
/// an empty qualifier matches anything.
#[derive(Debug, Clone)]
struct ColonyRule {
    tag: String,
    region: String,
    name: String,
}

/// Names colonial nations after the region they settled.
#[derive(Debug, Default)]
pub struct ColonyMapper {
    rules: Vec<ColonyRule>,
}

impl ColonyMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(links) = root.children().first() else {
            return Err(MapperError::Empty("colonial"));
        };

        let mut mapper = ColonyMapper::default();
        for link in links.children() {
            let mut rule = ColonyRule {
                tag: String::new(),
                region: String::new(),
                name: String::new(),
            };
            for entry in link.children() {
                let Some(value) = entry.leaf() else { continue };
                match entry.key() {
                    "tag" => rule.tag = value.to_string(),
                    "eu4_region" => rule.region = value.to_string(),
                    "name" => rule.name = value.to_string(),
                    _ => log::warn!("unknown data while mapping colonies: {}", entry.key()),
                }
            }
            mapper.rules.push(rule);
        }
        Ok(mapper)
    }

    /// First rule whose qualifiers all match, in declaration order.
    pub fn name_for(&self, tag: &str, region: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| {
                (r.tag.is_empty() || r.tag == tag) && (r.region.is_empty() || r.region == region)
            })
            .map(|r| r.name.as_str())
    }
}
