use std::collections::HashMap;

use pdxtxt::PdxNode;

use crate::MapperError;

/// One priority rule: a source tag plus its candidate destination tags in
/// declaration order. Candidates are tried back-to-front, so the
/// last-declared candidate is the most preferred.
#[derive(Debug, Clone)]
pub struct CountryMappingRule {
    pub source: String,
    pub candidates: Vec<String>,
}

pub fn load_rules(root: &PdxNode) -> Result<Vec<CountryMappingRule>, MapperError> {
    let Some(links) = root.children().first() else {
        return Err(MapperError::Empty("country"));
    };

    let mut rules = Vec::new();
    for link in links.children() {
        let mut source = String::new();
        let mut candidates = Vec::new();
        for entry in link.children() {
            let Some(value) = entry.leaf() else { continue };
            match entry.key() {
                "eu4" => source = value.to_string(),
                "v2" => candidates.push(value.to_string()),
                _ => log::warn!("unknown data while mapping countries: {}", entry.key()),
            }
        }
        rules.push(CountryMappingRule { source, candidates });
    }
    Ok(rules)
}

pub fn load_blocked_nations(root: &PdxNode) -> Vec<String> {
    let Some(block) = root.children().first() else {
        return Vec::new();
    };
    let mut blocked: Vec<String> = block.tokens().to_vec();
    for child in block.children() {
        if let Some(tag) = child.leaf() {
            blocked.push(tag.to_string());
        }
    }
    blocked
}

/// The source-tag to destination-tag assignment produced by the resolver.
#[derive(Debug, Default)]
pub struct CountryMapping {
    map: HashMap<String, String>,
}

/// Rebel-style factions share one destination identity outside the rules.
const NON_PLAYER_SOURCES: [&str; 3] = ["REB", "PIR", "NAT"];
const NON_PLAYER_DEST: &str = "REB";

impl CountryMapping {
    /// Resolves the tag assignment and returns it together with the number
    /// of source tags left without a destination.
    ///
    /// Rules bind first: each rule whose source is still unmapped claims its
    /// most-preferred still-unclaimed candidate. The rebel/pirate/natives
    /// tags then all collapse onto [`NON_PLAYER_DEST`]. Blocked destinations
    /// are withdrawn, and whatever sources remain are paired with whatever
    /// destinations remain, both in insertion order, until a pool runs dry.
    pub fn create(
        rules: &[CountryMappingRule],
        source_tags: &[String],
        potential_tags: &[String],
        blocked: &[String],
    ) -> (CountryMapping, usize) {
        let mut unmapped: Vec<String> = source_tags.to_vec();
        let mut unclaimed: Vec<String> = potential_tags.to_vec();
        let mut mapping = CountryMapping::default();

        for rule in rules {
            let Some(src_pos) = unmapped.iter().position(|t| *t == rule.source) else {
                continue;
            };
            for candidate in rule.candidates.iter().rev() {
                if let Some(dst_pos) = unclaimed.iter().position(|t| t == candidate) {
                    log::debug!("mapped {} -> {} (rule)", rule.source, candidate);
                    mapping.map.insert(rule.source.clone(), candidate.clone());
                    unmapped.remove(src_pos);
                    unclaimed.remove(dst_pos);
                    break;
                }
            }
        }

        for tag in NON_PLAYER_SOURCES {
            if let Some(pos) = unmapped.iter().position(|t| t == tag) {
                mapping.map.insert(tag.to_string(), NON_PLAYER_DEST.to_string());
                unmapped.remove(pos);
            }
        }

        unclaimed.retain(|t| !blocked.contains(t));

        let pairs = unmapped.len().min(unclaimed.len());
        for (src, dst) in unmapped.drain(..pairs).zip(unclaimed.drain(..pairs)) {
            log::debug!("mapped {} -> {} (fallback)", src, dst);
            mapping.map.insert(src, dst);
        }

        (mapping, unmapped.len())
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.map.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
