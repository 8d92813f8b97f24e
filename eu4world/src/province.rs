use pdxtxt::PdxNode;

use crate::date::{is_date_key, Date};
use crate::pop::{Pop, PopRatio, POP_KINDS};

/// One entry of a province's ownership history.
#[derive(Debug, Clone)]
pub struct PossessionRecord {
    pub date: Date,
    pub owner: String,
}

/// A source-world province.
///
/// The owner and core claims are stored as country tags and resolved into
/// the country index in the world's second build phase. Reassigning the
/// owner never rewrites the ownership history; age comparisons between
/// landless countries depend on the historical records staying intact.
#[derive(Debug, Clone)]
pub struct Province {
    id: u32,
    owner: Option<String>,
    cores: Vec<String>,
    fort_level: u32,
    naval_base_level: u32,
    rail_level: u32,
    pops: Vec<Pop>,
    history: Vec<PossessionRecord>,
}

/// Building levels appear either as a bare leaf (`fort = 2`) or as a token
/// list (`fort = { 2.000 4.000 }`); the first token is the current level.
fn building_level(node: &PdxNode, key: &str) -> u32 {
    let Some(building) = node.values(key).first().copied() else {
        return 0;
    };
    let raw = building
        .tokens()
        .first()
        .map(String::as_str)
        .or_else(|| building.leaf());
    raw.and_then(|s| s.parse::<f64>().ok())
        .map(|v| v as u32)
        .unwrap_or(0)
}

impl Province {
    pub fn from_node(id: u32, node: &PdxNode) -> Self {
        let owner = node.leaf_of("owner").map(str::to_string);

        let mut cores = Vec::new();
        for core in node.values("core") {
            if let Some(tag) = core.leaf() {
                if !cores.iter().any(|c| c == tag) {
                    cores.push(tag.to_string());
                }
            }
        }

        let mut pops = Vec::new();
        for child in node.children() {
            if POP_KINDS.contains(&child.key()) {
                pops.push(Pop::from_node(child));
            }
        }

        let mut history = Vec::new();
        if let Some(block) = node.values("history").first() {
            for entry in block.children() {
                if !is_date_key(entry.key()) {
                    continue;
                }
                if let (Ok(date), Some(new_owner)) =
                    (entry.key().parse::<Date>(), entry.leaf_of("owner"))
                {
                    history.push(PossessionRecord {
                        date,
                        owner: new_owner.to_string(),
                    });
                }
            }
        }

        Province {
            id,
            owner,
            cores,
            fort_level: building_level(node, "fort"),
            naval_base_level: building_level(node, "naval_base"),
            rail_level: building_level(node, "railroad"),
            pops,
            history,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn set_owner(&mut self, tag: Option<String>) {
        self.owner = tag;
    }

    pub fn cores(&self) -> &[String] {
        &self.cores
    }

    /// Adds a core claim, suppressing duplicates.
    pub fn add_core(&mut self, tag: &str) {
        if !self.cores.iter().any(|c| c == tag) {
            self.cores.push(tag.to_string());
        }
    }

    pub fn remove_core(&mut self, tag: &str) {
        self.cores.retain(|c| c != tag);
    }

    pub fn fort_level(&self) -> u32 {
        self.fort_level
    }

    pub fn naval_base_level(&self) -> u32 {
        self.naval_base_level
    }

    pub fn rail_level(&self) -> u32 {
        self.rail_level
    }

    pub fn pops(&self) -> &[Pop] {
        &self.pops
    }

    pub fn total_population(&self) -> i32 {
        self.pops.iter().map(|p| p.size).sum()
    }

    pub fn population_of(&self, kind: &str) -> i32 {
        self.pops
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.size)
            .sum()
    }

    /// Population weighted towards literate pops. A weight of 1.0 counts
    /// only literate people, 0.0 degenerates to the plain total.
    pub fn literacy_weighted_population(&self, kind: Option<&str>, weight: f64) -> i32 {
        self.pops
            .iter()
            .filter(|p| kind.is_none() || kind == Some(p.kind.as_str()))
            .map(|p| (p.size as f64 * (p.literacy * weight + (1.0 - weight))) as i32)
            .sum()
    }

    /// Culture shares of the resident population, in pop order.
    pub fn pop_ratios(&self) -> Vec<PopRatio> {
        let total = self.total_population();
        if total <= 0 {
            return Vec::new();
        }
        let mut ratios: Vec<PopRatio> = Vec::new();
        for pop in &self.pops {
            match ratios.iter_mut().find(|r| r.culture == pop.culture) {
                Some(r) => r.ratio += pop.size as f64 / total as f64,
                None => ratios.push(PopRatio {
                    culture: pop.culture.clone(),
                    ratio: pop.size as f64 / total as f64,
                }),
            }
        }
        ratios
    }

    /// The newest date at which `tag` held this province, per the history.
    pub fn last_possessed_date(&self, tag: &str) -> Option<Date> {
        self.history
            .iter()
            .filter(|r| r.owner == tag)
            .map(|r| r.date)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn province(text: &str) -> Province {
        let root = pdxtxt::parse_str(text).unwrap();
        Province::from_node(123, &root.children()[0])
    }

    #[test]
    fn reads_owner_cores_and_buildings() {
        let p = province(
            r#"
            123 = {
                owner = SWE
                core = SWE
                core = DAN
                core = SWE
                fort = { 2.000 2.000 }
                naval_base = 1
            }
            "#,
        );
        assert_eq!(p.owner(), Some("SWE"));
        assert_eq!(p.cores(), &["SWE", "DAN"]);
        assert_eq!(p.fort_level(), 2);
        assert_eq!(p.naval_base_level(), 1);
        assert_eq!(p.rail_level(), 0);
    }

    #[test]
    fn core_insertion_is_deduplicated() {
        let mut p = province("123 = { }");
        p.add_core("SWE");
        p.add_core("DAN");
        p.add_core("SWE");
        assert_eq!(p.cores(), &["SWE", "DAN"]);
        p.remove_core("SWE");
        assert_eq!(p.cores(), &["DAN"]);
    }

    #[test]
    fn population_aggregates() {
        let p = province(
            r#"
            123 = {
                farmers = { size = 1000 culture = swedish literacy = 0.5 }
                soldiers = { size = 200 culture = swedish literacy = 0.5 }
                labourers = { size = 800 culture = finnish literacy = 0.1 }
            }
            "#,
        );
        assert_eq!(p.total_population(), 2000);
        assert_eq!(p.population_of("farmers"), 1000);
        // weight 0.0 ignores literacy entirely
        assert_eq!(p.literacy_weighted_population(None, 0.0), 2000);
        // weight 1.0 counts only the literate share
        assert_eq!(
            p.literacy_weighted_population(Some("farmers"), 1.0),
            500
        );

        let ratios = p.pop_ratios();
        assert_eq!(ratios.len(), 2);
        assert_eq!(ratios[0].culture, "swedish");
        assert!((ratios[0].ratio - 0.6).abs() < 1e-9);
        assert!((ratios[1].ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn ownership_history_survives_reassignment() {
        let mut p = province(
            r#"
            123 = {
                owner = DAN
                history = {
                    1399.1.1 = { owner = SWE }
                    1420.5.2 = { owner = DAN }
                    1410.3.3 = { owner = SWE }
                }
            }
            "#,
        );
        p.set_owner(Some("SWE".to_string()));
        assert_eq!(
            p.last_possessed_date("SWE"),
            Some(Date::new(1410, 3, 3))
        );
        assert_eq!(p.last_possessed_date("NOR"), None);
    }
}
