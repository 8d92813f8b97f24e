use std::collections::{BTreeMap, HashMap};

use pdxtxt::PdxNode;
use thiserror::Error;

use crate::country::Country;
use crate::date::Date;
use crate::lineage::{Character, Dynasty, Lineage, Tier, Title};
use crate::province::Province;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("save contains no countries")]
    NoCountries,
    #[error("save contains no provinces")]
    NoProvinces,
}

/// Returns `true` if the key has the fixed country-tag shape.
fn is_country_key(key: &str) -> bool {
    key.len() == 3 && key.bytes().all(|b| b.is_ascii_uppercase())
}

/// The source world: every entity index in one place.
///
/// Countries keep insertion order (tag list + map) because the
/// country-mapping fallback pass and several tests depend on deterministic
/// iteration. Provinces live in a `BTreeMap`, ordered by id.
#[derive(Debug, Default)]
pub struct Eu4World {
    countries: HashMap<String, Country>,
    country_order: Vec<String>,
    provinces: BTreeMap<u32, Province>,
    lineage: Lineage,
}

impl Eu4World {
    /// Builds the world from a parsed save.
    ///
    /// Phase 1 constructs every entity with references left as plain
    /// identifiers; phase 2 resolves them against the completed indices.
    /// Resolving earlier would silently drop forward references.
    pub fn from_save(root: &PdxNode) -> Result<Self, WorldError> {
        let mut world = Eu4World::default();

        for node in root.children() {
            let key = node.key();
            if is_country_key(key) {
                world.insert_country(Country::from_node(key, node));
            } else if let Ok(id) = key.parse::<u32>() {
                world.provinces.insert(id, Province::from_node(id, node));
            } else if key == "dynasties" {
                for d in node.children() {
                    if let Ok(id) = d.key().parse::<u32>() {
                        world.lineage.add_dynasty(Dynasty::from_node(id, d));
                    }
                }
            } else if key == "character" {
                for c in node.children() {
                    if let Ok(id) = c.key().parse::<u32>() {
                        world.lineage.add_character(Character::from_node(id, c));
                    }
                }
            } else if Tier::from_name(key).is_some() {
                world.lineage.add_title(Title::from_node(node));
            }
        }

        if world.countries.is_empty() {
            return Err(WorldError::NoCountries);
        }
        if world.provinces.is_empty() {
            return Err(WorldError::NoProvinces);
        }

        world.resolve_references();
        Ok(world)
    }

    fn resolve_references(&mut self) {
        let ids: Vec<u32> = self.provinces.keys().copied().collect();
        for id in ids {
            let (owner, cores) = {
                let p = &self.provinces[&id];
                (
                    p.owner().map(str::to_string),
                    p.cores().to_vec(),
                )
            };
            if let Some(tag) = owner {
                match self.countries.get_mut(&tag) {
                    Some(c) => c.add_province(id),
                    None => log::warn!("province {} owned by unknown country {}", id, tag),
                }
            }
            for tag in cores {
                match self.countries.get_mut(&tag) {
                    Some(c) => c.add_core_province(id),
                    None => log::warn!("province {} is core of unknown country {}", id, tag),
                }
            }
        }

        self.lineage.resolve();
    }

    pub fn insert_country(&mut self, country: Country) {
        let tag = country.tag().to_string();
        if !self.countries.contains_key(&tag) {
            self.country_order.push(tag.clone());
        }
        self.countries.insert(tag, country);
    }

    pub fn country(&self, tag: &str) -> Option<&Country> {
        self.countries.get(tag)
    }

    pub fn country_mut(&mut self, tag: &str) -> Option<&mut Country> {
        self.countries.get_mut(tag)
    }

    /// Country tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.country_order
    }

    /// Countries in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.country_order
            .iter()
            .filter_map(move |tag| self.countries.get(tag))
    }

    /// Removes a country from the index. Does not cascade: the caller must
    /// already have reassigned any provinces it owned.
    pub fn remove_country(&mut self, tag: &str) {
        self.countries.remove(tag);
        self.country_order.retain(|t| t != tag);
    }

    pub fn province(&self, id: u32) -> Option<&Province> {
        self.provinces.get(&id)
    }

    pub fn province_mut(&mut self, id: u32) -> Option<&mut Province> {
        self.provinces.get_mut(&id)
    }

    pub fn provinces(&self) -> impl Iterator<Item = &Province> {
        self.provinces.values()
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    pub fn lineage_mut(&mut self) -> &mut Lineage {
        &mut self.lineage
    }

    /// Merges `slave` into `master`: provinces are repointed, core claims
    /// transferred without duplicates, then the slave is removed from the
    /// index. Reassignment happens strictly before removal.
    pub fn eat_country(&mut self, master: &str, slave: &str) {
        if master == slave {
            return;
        }
        if !self.countries.contains_key(master) {
            log::warn!("merge rule references unknown country {}", master);
            return;
        }
        let Some(eaten) = self.countries.get(slave) else {
            log::warn!("merge rule references unknown country {}", slave);
            return;
        };
        let provinces = eaten.provinces().to_vec();
        let cores = eaten.cores().to_vec();

        for id in &provinces {
            if let Some(p) = self.provinces.get_mut(id) {
                p.set_owner(Some(master.to_string()));
            }
        }
        for id in &cores {
            if let Some(p) = self.provinces.get_mut(id) {
                p.remove_core(slave);
                p.add_core(master);
            }
        }
        let master_country = self.countries.get_mut(master).expect("master exists");
        for id in provinces {
            master_country.add_province(id);
        }
        for id in cores {
            master_country.add_core_province(id);
        }

        log::debug!("{} ate {}", master, slave);
        self.remove_country(slave);
    }

    /// Removes every country with neither provinces nor core claims.
    pub fn remove_empty_nations(&mut self) {
        let empty: Vec<String> = self
            .countries()
            .filter(|c| c.provinces().is_empty() && c.cores().is_empty())
            .map(|c| c.tag().to_string())
            .collect();
        for tag in empty {
            self.remove_country(&tag);
        }
    }

    /// Removes every country without provinces, cores or not.
    pub fn remove_landless_nations(&mut self) {
        let landless: Vec<String> = self
            .countries()
            .filter(|c| c.provinces().is_empty())
            .map(|c| c.tag().to_string())
            .collect();
        for tag in landless {
            self.remove_country(&tag);
        }
    }

    /// Removes landless countries whose culture no longer survives: a
    /// culture survives if some core province held by a foreign-culture
    /// owner still has at least half its population in that culture.
    pub fn remove_dead_landless_nations(&mut self) {
        let landless: Vec<String> = self
            .countries()
            .filter(|c| c.provinces().is_empty())
            .map(|c| c.tag().to_string())
            .collect();

        for tag in landless {
            let country = &self.countries[&tag];
            let culture = country.primary_culture().to_string();
            let mut survives = false;
            for &core in country.cores() {
                let Some(province) = self.provinces.get(&core) else {
                    continue;
                };
                let Some(owner) = province.owner().and_then(|t| self.countries.get(t)) else {
                    continue;
                };
                if owner.primary_culture() == culture {
                    continue;
                }
                let share: f64 = province
                    .pop_ratios()
                    .iter()
                    .filter(|r| r.culture == culture)
                    .map(|r| r.ratio)
                    .sum();
                if share >= 0.5 {
                    survives = true;
                    break;
                }
            }
            if !survives {
                self.remove_country(&tag);
            }
        }
    }

    /// Removes up to `excess` landless countries, oldest possession first
    /// dropped last: candidates are sorted by the newest date any core was
    /// held and culled from the most recent end.
    pub fn remove_older_landless_nations(&mut self, excess: usize) {
        let newest_possession = |country: &Country| -> Date {
            country
                .cores()
                .iter()
                .filter_map(|&id| self.provinces.get(&id))
                .filter_map(|p| p.last_possessed_date(country.tag()))
                .max()
                .unwrap_or_default()
        };

        let mut landless: Vec<(String, Date)> = self
            .countries()
            .filter(|c| c.provinces().is_empty())
            .map(|c| (c.tag().to_string(), newest_possession(c)))
            .collect();
        landless.sort_by(|a, b| a.1.cmp(&b.1));

        let mut remaining = excess;
        while remaining > 0 {
            let Some((tag, _)) = landless.pop() else { break };
            self.remove_country(&tag);
            remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVE: &str = r#"
        date = "1520.1.1"
        SWE = {
            primary_culture = swedish
            religion = protestant
            government = monarchy
        }
        DAN = {
            primary_culture = danish
            religion = catholic
            government = monarchy
        }
        FIN = {
            primary_culture = finnish
        }
        1 = {
            owner = SWE
            core = SWE
            core = FIN
            farmers = { size = 600 culture = finnish }
            labourers = { size = 400 culture = swedish }
        }
        2 = {
            owner = DAN
            core = DAN
            history = {
                1500.1.1 = { owner = FIN }
            }
        }
        3 = {
            core = DAN
        }
    "#;

    fn world() -> Eu4World {
        Eu4World::from_save(&pdxtxt::parse_str(SAVE).unwrap()).unwrap()
    }

    #[test]
    fn two_phase_build_resolves_forward_references() {
        let w = world();
        assert_eq!(w.tags(), &["SWE", "DAN", "FIN"]);
        assert_eq!(w.country("SWE").unwrap().provinces(), &[1]);
        assert_eq!(w.country("SWE").unwrap().cores(), &[1]);
        assert_eq!(w.country("FIN").unwrap().cores(), &[1]);
        assert_eq!(w.country("DAN").unwrap().cores(), &[2, 3]);
        assert_eq!(w.province(1).unwrap().owner(), Some("SWE"));
    }

    #[test]
    fn eat_country_transfers_everything() {
        let mut w = world();
        w.eat_country("SWE", "DAN");

        assert!(w.country("DAN").is_none());
        assert_eq!(w.province(2).unwrap().owner(), Some("SWE"));
        let swe = w.country("SWE").unwrap();
        assert_eq!(swe.provinces(), &[1, 2]);
        // union of both core sets, no duplicates
        assert_eq!(swe.cores(), &[1, 2, 3]);
        assert!(w.province(2).unwrap().cores().contains(&"SWE".to_string()));
        assert!(!w.province(2).unwrap().cores().contains(&"DAN".to_string()));
    }

    #[test]
    fn eat_country_is_a_no_op_for_unknown_slaves() {
        let mut w = world();
        w.eat_country("SWE", "NOR");
        w.eat_country("SWE", "SWE");
        assert_eq!(w.tags(), &["SWE", "DAN", "FIN"]);
    }

    #[test]
    fn eat_country_is_a_no_op_for_unknown_masters() {
        let mut w = world();
        w.eat_country("NOR", "DAN");
        assert_eq!(w.tags(), &["SWE", "DAN", "FIN"]);
        assert_eq!(w.province(2).unwrap().owner(), Some("DAN"));
    }

    #[test]
    fn remove_empty_nations_keeps_core_holders() {
        let mut w = world();
        w.insert_country(Country::with_tag("XXX"));
        w.remove_empty_nations();
        // FIN has no provinces but holds a core; XXX has neither
        assert_eq!(w.tags(), &["SWE", "DAN", "FIN"]);
    }

    #[test]
    fn dead_landless_culture_survival() {
        let mut w = world();
        // FIN is landless; its core province 1 is owned by SWE (different
        // culture) and is 60% finnish, so the culture survives.
        w.remove_dead_landless_nations();
        assert!(w.country("FIN").is_some());

        // Drain the finnish pops below half and FIN goes away.
        let mut w = Eu4World::from_save(
            &pdxtxt::parse_str(&SAVE.replace("size = 600", "size = 100")).unwrap(),
        )
        .unwrap();
        w.remove_dead_landless_nations();
        assert!(w.country("FIN").is_none());
    }

    #[test]
    fn remove_older_landless_culls_from_the_newest_end() {
        let mut w = world();
        // FIN last held province 2 in 1500; give it company that never held
        // anything, which sorts before it.
        w.insert_country(Country::with_tag("NEV"));
        w.country_mut("NEV").unwrap().add_core_province(3);
        w.remove_older_landless_nations(1);
        assert!(w.country("FIN").is_none());
        assert!(w.country("NEV").is_some());
    }

    #[test]
    fn empty_saves_are_fatal() {
        assert!(matches!(
            Eu4World::from_save(&pdxtxt::parse_str("1 = { owner = SWE }").unwrap()),
            Err(WorldError::NoCountries)
        ));
        assert!(matches!(
            Eu4World::from_save(&pdxtxt::parse_str("SWE = { }").unwrap()),
            Err(WorldError::NoProvinces)
        ));
    }
}
