use eu4world::lineage::CharacterId;

/// A destination-world country, assembled from its mapped source country.
#[derive(Debug, Clone)]
pub struct V2Country {
    tag: String,
    source_tag: String,
    primary_culture: String,
    religion: String,
    government: String,
    tech_school: Option<String>,
    ruler: Option<CharacterId>,
    provinces: Vec<u32>,
    factories: Vec<String>,
}

impl V2Country {
    pub fn new(tag: &str, source_tag: &str) -> Self {
        V2Country {
            tag: tag.to_string(),
            source_tag: source_tag.to_string(),
            primary_culture: String::new(),
            religion: String::new(),
            government: String::new(),
            tech_school: None,
            ruler: None,
            provinces: Vec::new(),
            factories: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The source-world tag this country was mapped from.
    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    pub fn primary_culture(&self) -> &str {
        &self.primary_culture
    }

    pub fn set_primary_culture(&mut self, culture: &str) {
        self.primary_culture = culture.to_string();
    }

    pub fn religion(&self) -> &str {
        &self.religion
    }

    pub fn set_religion(&mut self, religion: &str) {
        self.religion = religion.to_string();
    }

    pub fn government(&self) -> &str {
        &self.government
    }

    pub fn set_government(&mut self, government: &str) {
        self.government = government.to_string();
    }

    pub fn tech_school(&self) -> Option<&str> {
        self.tech_school.as_deref()
    }

    pub fn set_tech_school(&mut self, school: Option<String>) {
        self.tech_school = school;
    }

    pub fn ruler(&self) -> Option<CharacterId> {
        self.ruler
    }

    pub fn set_ruler(&mut self, ruler: Option<CharacterId>) {
        self.ruler = ruler;
    }

    pub fn provinces(&self) -> &[u32] {
        &self.provinces
    }

    pub fn add_province(&mut self, id: u32) {
        if !self.provinces.contains(&id) {
            self.provinces.push(id);
        }
    }

    pub fn factories(&self) -> &[String] {
        &self.factories
    }

    pub fn add_factory(&mut self, name: &str) {
        self.factories.push(name.to_string());
    }
}
