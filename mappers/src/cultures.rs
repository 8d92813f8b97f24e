use pdxtxt::PdxNode;

use crate::MapperError;

/// A conditional qualifier narrowing a culture rule's applicability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distinguisher {
    Owner(String),
    Religion(String),
}

impl Distinguisher {
    fn matches(&self, owner: Option<&str>, religion: Option<&str>) -> bool {
        match self {
            Distinguisher::Owner(tag) => owner == Some(tag.as_str()),
            Distinguisher::Religion(name) => religion == Some(name.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct CultureRule {
    src: String,
    dst: String,
    distinguishers: Vec<Distinguisher>,
}

/// Culture mapping with disambiguator rules.
///
/// Among rules matching a source culture, a rule whose disambiguators all
/// match the target's owner/religion context beats any unconditional rule;
/// within each class the first declared rule wins.
#[derive(Debug, Default)]
pub struct CultureMapper {
    rules: Vec<CultureRule>,
}

impl CultureMapper {
    pub fn from_node(root: &PdxNode) -> Result<Self, MapperError> {
        let Some(links) = root.children().first() else {
            return Err(MapperError::Empty("culture"));
        };

        let mut mapper = CultureMapper::default();
        for link in links.children() {
            let mut srcs: Vec<String> = Vec::new();
            let mut dst = String::new();
            let mut distinguishers: Vec<Distinguisher> = Vec::new();
            for entry in link.children() {
                let Some(value) = entry.leaf() else { continue };
                match entry.key() {
                    "v2" => dst = value.to_string(),
                    "eu4" => srcs.push(value.to_string()),
                    "owner" => distinguishers.push(Distinguisher::Owner(value.to_string())),
                    "religion" => distinguishers.push(Distinguisher::Religion(value.to_string())),
                    other => log::warn!("unknown data while mapping cultures: {}", other),
                }
            }
            for src in srcs {
                mapper.rules.push(CultureRule {
                    src,
                    dst: dst.clone(),
                    distinguishers: distinguishers.clone(),
                });
            }
        }
        Ok(mapper)
    }

    pub fn convert(
        &self,
        src: &str,
        owner: Option<&str>,
        religion: Option<&str>,
    ) -> Option<&str> {
        let candidates = || self.rules.iter().filter(|r| r.src == src);
        candidates()
            .find(|r| {
                !r.distinguishers.is_empty()
                    && r.distinguishers.iter().all(|d| d.matches(owner, religion))
            })
            .or_else(|| candidates().find(|r| r.distinguishers.is_empty()))
            .map(|r| r.dst.as_str())
    }

    pub fn is_mapped(&self, src: &str) -> bool {
        self.rules.iter().any(|r| r.src == src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CultureMapper {
        let root = pdxtxt::parse_str(
            r#"
            cultureMap = {
                link = { eu4 = norwegian v2 = norwegian }
                link = { eu4 = swedish v2 = finnish_swede owner = FIN }
                link = { eu4 = swedish v2 = lutheran_swede religion = protestant }
                link = { eu4 = swedish eu4 = gutnish v2 = swedish }
            }
            "#,
        )
        .unwrap();
        CultureMapper::from_node(&root).unwrap()
    }

    #[test]
    fn disambiguated_rule_beats_unconditional() {
        let m = mapper();
        assert_eq!(
            m.convert("swedish", Some("FIN"), None),
            Some("finnish_swede")
        );
        assert_eq!(
            m.convert("swedish", Some("SWE"), Some("protestant")),
            Some("lutheran_swede")
        );
        // no disambiguator matches: the first unconditional rule wins
        assert_eq!(m.convert("swedish", Some("SWE"), None), Some("swedish"));
        assert_eq!(m.convert("gutnish", None, None), Some("swedish"));
    }

    #[test]
    fn unmapped_culture_is_absent() {
        let m = mapper();
        assert_eq!(m.convert("sami", None, None), None);
        assert!(!m.is_mapped("sami"));
        assert!(m.is_mapped("norwegian"));
    }

    #[test]
    fn empty_file_is_fatal() {
        let root = pdxtxt::parse_str("# nothing here").unwrap();
        assert!(matches!(
            CultureMapper::from_node(&root),
            Err(MapperError::Empty("culture"))
        ));
    }
}
