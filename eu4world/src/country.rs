use pdxtxt::PdxNode;

/// A source-world country.
///
/// Province membership is a relation kept as province ids, not ownership:
/// the country indexes its provinces, the world owns them. Removal and
/// merging are therefore pure index operations.
#[derive(Debug, Clone)]
pub struct Country {
    tag: String,
    primary_culture: String,
    religion: String,
    government: String,
    provinces: Vec<u32>,
    cores: Vec<u32>,
    flags: Vec<String>,
    possible_daimyo: bool,
    /// Feudal title carried over from a CK2 conversion, if any.
    dynastic_title: Option<String>,
}

impl Country {
    pub fn from_node(tag: &str, node: &PdxNode) -> Self {
        let mut flags = Vec::new();
        if let Some(block) = node.values("flags").first() {
            for flag in block.children() {
                flags.push(flag.key().to_string());
            }
        }
        Country {
            tag: tag.to_string(),
            primary_culture: node
                .leaf_of("primary_culture")
                .unwrap_or_default()
                .to_string(),
            religion: node.leaf_of("religion").unwrap_or_default().to_string(),
            government: node.leaf_of("government").unwrap_or_default().to_string(),
            provinces: Vec::new(),
            cores: Vec::new(),
            flags,
            possible_daimyo: node.leaf_of("possible_daimyo") == Some("yes"),
            dynastic_title: node.leaf_of("dynastic_title").map(str::to_string),
        }
    }

    /// A bare country that only exists as a tag (used when merge or mapping
    /// rules reference a country the save does not contain).
    pub fn with_tag(tag: &str) -> Self {
        Country {
            tag: tag.to_string(),
            primary_culture: String::new(),
            religion: String::new(),
            government: String::new(),
            provinces: Vec::new(),
            cores: Vec::new(),
            flags: Vec::new(),
            possible_daimyo: false,
            dynastic_title: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn primary_culture(&self) -> &str {
        &self.primary_culture
    }

    pub fn religion(&self) -> &str {
        &self.religion
    }

    pub fn government(&self) -> &str {
        &self.government
    }

    pub fn provinces(&self) -> &[u32] {
        &self.provinces
    }

    pub fn cores(&self) -> &[u32] {
        &self.cores
    }

    pub fn add_province(&mut self, id: u32) {
        if !self.provinces.contains(&id) {
            self.provinces.push(id);
        }
    }

    pub fn remove_province(&mut self, id: u32) {
        self.provinces.retain(|&p| p != id);
    }

    pub fn add_core_province(&mut self, id: u32) {
        if !self.cores.contains(&id) {
            self.cores.push(id);
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn set_flag(&mut self, flag: &str) {
        if !self.has_flag(flag) {
            self.flags.push(flag.to_string());
        }
    }

    pub fn possible_daimyo(&self) -> bool {
        self.possible_daimyo
    }

    pub fn dynastic_title(&self) -> Option<&str> {
        self.dynastic_title.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_attributes_and_flags() {
        let root = pdxtxt::parse_str(
            r#"
            SWE = {
                primary_culture = swedish
                religion = protestant
                government = monarchy
                flags = {
                    united_daimyos_of_japan = yes
                }
            }
            "#,
        )
        .unwrap();
        let c = Country::from_node("SWE", &root.children()[0]);
        assert_eq!(c.tag(), "SWE");
        assert_eq!(c.primary_culture(), "swedish");
        assert_eq!(c.government(), "monarchy");
        assert!(c.has_flag("united_daimyos_of_japan"));
        assert!(!c.possible_daimyo());
    }

    #[test]
    fn relations_are_deduplicated() {
        let mut c = Country::with_tag("ODA");
        c.add_province(1);
        c.add_province(2);
        c.add_province(1);
        assert_eq!(c.provinces(), &[1, 2]);
        c.remove_province(1);
        assert_eq!(c.provinces(), &[2]);

        c.add_core_province(7);
        c.add_core_province(7);
        assert_eq!(c.cores(), &[7]);
    }

    #[test]
    fn flags_set_once() {
        let mut c = Country::with_tag("JAP");
        assert!(!c.has_flag("united_daimyos_of_japan"));
        c.set_flag("united_daimyos_of_japan");
        c.set_flag("united_daimyos_of_japan");
        assert!(c.has_flag("united_daimyos_of_japan"));
    }
}
