use std::collections::{BTreeMap, HashMap, HashSet};

use eu4world::{Eu4World, Heir};
use mappers::{
    ColonyMapper, CountryMapping, CultureMapper, GovernmentMapper, ProvinceMapper,
    ReligionMapper, StateMapper, TechSchool, UnionMapper,
};
use pdxtxt::PdxNode;

use crate::country::V2Country;
use crate::factory::Factory;
use crate::pop::V2Pop;
use crate::province::V2Province;
use crate::state::V2State;

fn is_tag(key: &str) -> bool {
    key.len() == 3 && key.bytes().all(|b| b.is_ascii_uppercase())
}

/// Reads the playable tags out of the destination game's country file
/// (`TAG = "countries/..."` entries), in declaration order.
pub fn potential_tags(root: &PdxNode) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for node in root.children() {
        if is_tag(node.key()) && !tags.iter().any(|t| t == node.key()) {
            tags.push(node.key().to_string());
        }
    }
    tags
}

/// The destination world, populated by the conversion passes in pipeline
/// order. Countries keep insertion order; provinces are ordered by id.
#[derive(Debug, Default)]
pub struct V2World {
    countries: HashMap<String, V2Country>,
    country_order: Vec<String>,
    provinces: BTreeMap<u32, V2Province>,
    states: Vec<V2State>,
}

impl V2World {
    pub fn new() -> Self {
        V2World::default()
    }

    pub fn country(&self, tag: &str) -> Option<&V2Country> {
        self.countries.get(tag)
    }

    pub fn country_mut(&mut self, tag: &str) -> Option<&mut V2Country> {
        self.countries.get_mut(tag)
    }

    pub fn tags(&self) -> &[String] {
        &self.country_order
    }

    /// Countries in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &V2Country> {
        self.country_order
            .iter()
            .filter_map(move |tag| self.countries.get(tag))
    }

    pub fn province(&self, id: u32) -> Option<&V2Province> {
        self.provinces.get(&id)
    }

    pub fn provinces(&self) -> impl Iterator<Item = &V2Province> {
        self.provinces.values()
    }

    pub fn states(&self) -> &[V2State] {
        &self.states
    }

    fn insert_country(&mut self, country: V2Country) {
        let tag = country.tag().to_string();
        if self.countries.contains_key(&tag) {
            // several sources can share one destination (the rebel tags do)
            log::debug!("{} already converted, keeping the first", tag);
            return;
        }
        self.country_order.push(tag.clone());
        self.countries.insert(tag, country);
    }

    /// Builds a destination country for every mapped source country.
    pub fn convert_countries(
        &mut self,
        src: &Eu4World,
        mapping: &CountryMapping,
        cultures: &CultureMapper,
        religions: &ReligionMapper,
        governments: &GovernmentMapper,
        schools: &[TechSchool],
    ) {
        for country in src.countries() {
            let Some(dst_tag) = mapping.get(country.tag()) else {
                log::warn!("no destination tag for {}", country.tag());
                continue;
            };
            let mut converted = V2Country::new(dst_tag, country.tag());

            if let Some(religion) = religions.convert(country.religion()) {
                converted.set_religion(religion);
            }
            if let Some(culture) = cultures.convert(
                country.primary_culture(),
                Some(country.tag()),
                Some(country.religion()),
            ) {
                converted.set_primary_culture(culture);
            }
            if let Some(government) = governments.convert(country.government()) {
                converted.set_government(government);
            }
            converted.set_tech_school(schools.first().map(|s| s.name.clone()));

            if let Some(title) = country
                .dynastic_title()
                .and_then(|name| src.lineage().title(name))
            {
                let ruler = match title.heir() {
                    Heir::Single(id) => Some(*id),
                    _ => title.holder(),
                };
                converted.set_ruler(ruler);
            }

            self.insert_country(converted);
        }
    }

    /// Builds every destination province named by the province table,
    /// carrying owner, cores and the highest building levels over from its
    /// source provinces.
    pub fn convert_provinces(
        &mut self,
        src: &Eu4World,
        mapping: &CountryMapping,
        provinces: &ProvinceMapper,
    ) {
        let mut dest_ids: Vec<u32> = provinces.dest_province_nums().collect();
        dest_ids.sort_unstable();

        for id in dest_ids {
            let mut converted = V2Province::new(id);
            for &src_id in provinces.source_provinces(id) {
                let Some(source) = src.province(src_id) else {
                    log::warn!("province table references unknown province {}", src_id);
                    continue;
                };
                if converted.owner().is_none() {
                    if let Some(owner) = source.owner() {
                        match mapping.get(owner) {
                            Some(tag) => converted.set_owner(Some(tag.to_string())),
                            None => {
                                log::warn!("owner {} of province {} is unmapped", owner, src_id)
                            }
                        }
                    }
                }
                for core in source.cores() {
                    if let Some(tag) = mapping.get(core) {
                        converted.add_core(tag);
                    }
                }
                converted.raise_buildings(
                    source.fort_level(),
                    source.naval_base_level(),
                    source.rail_level(),
                );
            }

            if let Some(owner) = converted.owner().map(str::to_string) {
                if let Some(country) = self.countries.get_mut(&owner) {
                    country.add_province(id);
                }
            }
            self.provinces.insert(id, converted);
        }
    }

    /// Groups same-owner provinces into states along the adjacency sets.
    pub fn setup_states(&mut self, states: &StateMapper) {
        let mut assigned: HashSet<u32> = HashSet::new();
        let ids: Vec<u32> = self.provinces.keys().copied().collect();

        for id in ids {
            if assigned.contains(&id) {
                continue;
            }
            let owner = self.provinces[&id].owner().map(str::to_string);
            let mut members = vec![id];
            for &other in states.state_of(id) {
                if other == id || assigned.contains(&other) {
                    continue;
                }
                let Some(province) = self.provinces.get(&other) else {
                    continue;
                };
                if province.owner() == owner.as_deref() {
                    members.push(other);
                }
            }
            assigned.extend(members.iter().copied());
            let state_id = self.states.len();
            self.states.push(V2State::new(state_id, members));
        }
    }

    /// Names colonial provinces (owned without a core) after the colony
    /// rules. Rules qualified on a region only apply where region data is
    /// available; the generic rules always do.
    pub fn setup_colonies(&mut self, colonies: &ColonyMapper) {
        for province in self.provinces.values_mut() {
            if !province.is_colonial() {
                continue;
            }
            let owner = province.owner().unwrap_or_default().to_string();
            let name = colonies.name_for(&owner, "").map(str::to_string);
            if name.is_none() {
                log::warn!("no colonial name for province {}", province.id());
            }
            province.set_colonial_name(name);
        }
    }

    /// Converts pops: each source province's pops are split evenly among the
    /// destination provinces it maps to, with cultures and religions mapped
    /// in the owner's context. Unmapped values are carried as-is (the
    /// advisory checks have already warned about them).
    pub fn setup_pops(
        &mut self,
        src: &Eu4World,
        provinces: &ProvinceMapper,
        cultures: &CultureMapper,
        religions: &ReligionMapper,
    ) {
        let ids: Vec<u32> = self.provinces.keys().copied().collect();
        for id in ids {
            let mut pops: Vec<V2Pop> = Vec::new();
            for &src_id in provinces.source_provinces(id) {
                let Some(source) = src.province(src_id) else {
                    continue;
                };
                let dests = provinces.dest_provinces(src_id);
                let split = dests.len().max(1) as i32;
                // the first destination takes the division remainder so the
                // split conserves total population
                let takes_remainder = dests.first().map_or(true, |&first| first == id);
                for pop in source.pops() {
                    let culture = cultures
                        .convert(&pop.culture, source.owner(), Some(&pop.religion))
                        .unwrap_or(&pop.culture)
                        .to_string();
                    let religion = religions
                        .convert(&pop.religion)
                        .unwrap_or(&pop.religion)
                        .to_string();
                    pops.push(V2Pop {
                        kind: pop.kind.clone(),
                        culture,
                        religion,
                        size: pop.size / split
                            + if takes_remainder { pop.size % split } else { 0 },
                    });
                }
            }
            let province = self.provinces.get_mut(&id).expect("province exists");
            for pop in pops {
                province.add_pop(pop);
            }
        }
    }

    /// Grants cores to cultural-union countries wherever their culture
    /// lives, provided the union tag exists in this world.
    pub fn add_unions(&mut self, unions: &UnionMapper) {
        let ids: Vec<u32> = self.provinces.keys().copied().collect();
        for id in ids {
            let grants: Vec<String> = self.provinces[&id]
                .pops()
                .iter()
                .flat_map(|pop| unions.union_tags(&pop.culture))
                .filter(|tag| self.countries.contains_key(*tag))
                .map(str::to_string)
                .collect();
            let province = self.provinces.get_mut(&id).expect("province exists");
            for tag in grants {
                province.add_core(&tag);
            }
        }
    }

    /// Deals starting factories to countries by economic weight: the country
    /// with the highest remaining literacy-weighted population takes the next
    /// factory, then its weight is halved so industry spreads out.
    pub fn allocate_factories(
        &mut self,
        src: &Eu4World,
        factories: &[Factory],
        literacy_weight: f64,
    ) {
        let mut weights: Vec<(String, f64)> = Vec::new();
        for tag in &self.country_order {
            let country = &self.countries[tag];
            let Some(source) = src.country(country.source_tag()) else {
                continue;
            };
            let weight: f64 = source
                .provinces()
                .iter()
                .filter_map(|&id| src.province(id))
                .map(|p| p.literacy_weighted_population(None, literacy_weight) as f64)
                .sum();
            if weight > 0.0 {
                weights.push((tag.clone(), weight));
            }
        }

        for factory in factories {
            let mut best: Option<usize> = None;
            for (i, (_, weight)) in weights.iter().enumerate() {
                if best.map_or(true, |b| *weight > weights[b].1) {
                    best = Some(i);
                }
            }
            let Some(i) = best else { break };
            let (tag, weight) = &mut weights[i];
            if let Some(country) = self.countries.get_mut(tag) {
                country.add_factory(&factory.name);
            }
            *weight /= 2.0;
        }
    }
}
