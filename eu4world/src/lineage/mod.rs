//! Dynastic lineage carried by saves that came out of a CK2 conversion.
//!
//! Characters, dynasties and feudal titles form a second entity graph next
//! to the country/province one. Titles reference characters by numeric id
//! and each other by title name; both reference kinds are resolved only
//! after every entity exists, in [`Lineage::resolve`].

mod character;
mod dynasty;
mod title;

pub use character::{Character, CharacterId};
pub use dynasty::Dynasty;
pub use title::{GenderLaw, Heir, SuccessionLaw, Tier, Title};

use std::collections::HashMap;

/// Index of all lineage entities, keyed by stable identifiers.
#[derive(Debug, Default)]
pub struct Lineage {
    characters: HashMap<CharacterId, Character>,
    dynasties: HashMap<u32, Dynasty>,
    titles: HashMap<String, Title>,
    title_order: Vec<String>,
}

impl Lineage {
    pub fn add_character(&mut self, c: Character) {
        self.characters.insert(c.id(), c);
    }

    pub fn add_dynasty(&mut self, d: Dynasty) {
        self.dynasties.insert(d.id(), d);
    }

    pub fn add_title(&mut self, t: Title) {
        if !self.titles.contains_key(t.name()) {
            self.title_order.push(t.name().to_string());
        }
        self.titles.insert(t.name().to_string(), t);
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn dynasty(&self, id: u32) -> Option<&Dynasty> {
        self.dynasties.get(&id)
    }

    pub fn title(&self, name: &str) -> Option<&Title> {
        self.titles.get(name)
    }

    /// Title names in save order.
    pub fn title_names(&self) -> &[String] {
        &self.title_order
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.characters.is_empty()
    }

    /// Links every identifier reference against the completed indices.
    ///
    /// Must run exactly once, after all entities are added: child lists,
    /// dynasty membership, title holders, liege/vassal edges and the
    /// de-jure tree all assume the full index.
    pub fn resolve(&mut self) {
        // Child links, birth-ordered
        let mut ids: Vec<CharacterId> = self.characters.keys().copied().collect();
        ids.sort_unstable();
        for id in &ids {
            if let Some(father) = self.characters[id].father() {
                match self.characters.get_mut(&father) {
                    Some(f) => f.add_child(*id),
                    None => log::warn!("character {} has unknown father {}", id, father),
                }
            }
        }
        let births: HashMap<CharacterId, crate::Date> = self
            .characters
            .iter()
            .map(|(&id, c)| (id, c.birth()))
            .collect();
        for c in self.characters.values_mut() {
            c.sort_children(&births);
        }

        // Dynasty membership
        for id in &ids {
            if let Some(dynasty) = self.characters[id].dynasty() {
                match self.dynasties.get_mut(&dynasty) {
                    Some(d) => d.add_member(*id),
                    None => log::warn!("character {} has unknown dynasty {}", id, dynasty),
                }
            }
        }

        // Title holders
        let names = self.title_order.clone();
        for name in &names {
            let holder = self.titles[name].holder();
            if let Some(holder) = holder {
                match self.characters.get_mut(&holder) {
                    Some(c) => c.add_title(name),
                    None => {
                        log::warn!("title {} held by unknown character {}", name, holder);
                        self.titles.get_mut(name).expect("title exists").clear_holder();
                    }
                }
            }
        }

        // Liege / vassal tree (single parent)
        for name in &names {
            let liege = self.titles[name].liege().map(str::to_string);
            if let Some(liege) = liege {
                if self.titles.contains_key(&liege) {
                    self.titles
                        .get_mut(&liege)
                        .expect("liege exists")
                        .add_vassal(name);
                    self.titles
                        .get_mut(name)
                        .expect("title exists")
                        .set_independent(false);
                } else {
                    log::warn!("title {} has unknown liege {}", name, liege);
                }
            }
        }

        // De-jure tree, resolved in its own pass so ordering in the save
        // cannot leave references dangling
        for name in &names {
            let de_jure = self.titles[name].de_jure_liege().map(str::to_string);
            if let Some(de_jure) = de_jure {
                if !self.titles.contains_key(&de_jure) {
                    log::warn!("title {} has unknown de jure liege {}", name, de_jure);
                    self.titles
                        .get_mut(name)
                        .expect("title exists")
                        .clear_de_jure_liege();
                }
            }
        }
    }

    /// Resolves the heir of every title under its succession law.
    pub fn determine_heirs(&mut self) {
        let names = self.title_order.clone();
        for name in &names {
            let heir = self.compute_heir(name);
            self.titles.get_mut(name).expect("title exists").set_heir(heir);
        }
    }

    fn compute_heir(&self, name: &str) -> Heir {
        let title = &self.titles[name];
        let Some(holder) = title.holder() else {
            return Heir::Unresolved;
        };
        match title.succession() {
            SuccessionLaw::Primogeniture => {
                self.walk_ancestors(holder, |ancestor| {
                    ancestor.primogeniture_heir(&self.characters, title.gender(), holder)
                })
                .map(Heir::Single)
                .unwrap_or(Heir::Unresolved)
            }
            SuccessionLaw::Gavelkind => {
                let Some(c) = self.characters.get(&holder) else {
                    return Heir::Unresolved;
                };
                let shares = c.gavelkind_heirs(&self.characters, title.gender(), holder);
                if shares.is_empty() {
                    Heir::Unresolved
                } else {
                    Heir::Partition(shares)
                }
            }
            SuccessionLaw::Seniority => self
                .characters
                .get(&holder)
                .and_then(|c| c.dynasty())
                .and_then(|d| self.dynasties.get(&d))
                .and_then(|d| d.seniority_heir(&self.characters, title.gender(), holder))
                .map(Heir::Single)
                .unwrap_or(Heir::Unresolved),
            SuccessionLaw::FeudalElective => {
                let mut winner = None;
                let mut most_votes = 0;
                for &(nominee, votes) in title.nominees() {
                    // strictly greater: first nominee to reach the maximum wins ties
                    if votes > most_votes {
                        winner = Some(nominee);
                        most_votes = votes;
                    }
                }
                match winner {
                    Some(id) if self.characters.contains_key(&id) => Heir::Single(id),
                    Some(id) => {
                        log::warn!("title {} elected unknown character {}", name, id);
                        Heir::Unresolved
                    }
                    None => Heir::Unresolved,
                }
            }
            SuccessionLaw::TurkishSuccession => self.turkish_heir(title, holder),
            SuccessionLaw::Other(law) => {
                log::warn!("title {} has unsupported succession law {:?}", name, law);
                Heir::Unsupported
            }
        }
    }

    /// Walks the holder's direct ancestor line (holder, father, ...)
    /// applying `query` at each step until it yields a candidate.
    fn walk_ancestors<F>(&self, holder: CharacterId, mut query: F) -> Option<CharacterId>
    where
        F: FnMut(&Character) -> Option<CharacterId>,
    {
        let mut current = Some(holder);
        while let Some(id) = current {
            let c = self.characters.get(&id)?;
            if let Some(found) = query(c) {
                return Some(found);
            }
            current = c.father();
        }
        None
    }

    /// Open succession: among the potential heirs along the ancestor chain,
    /// the one holding the most titles of the highest tier present wins.
    /// Tiers are ranked kingdom, duchy, county, barony; the first candidate
    /// to reach a new maximum within a tier wins ties there.
    fn turkish_heir(&self, title: &Title, holder: CharacterId) -> Heir {
        let mut potential: Vec<CharacterId> = Vec::new();
        let mut current = Some(holder);
        while let Some(id) = current {
            let Some(c) = self.characters.get(&id) else { break };
            potential = c.potential_open_heirs(&self.characters, title.gender(), holder);
            if !potential.is_empty() {
                break;
            }
            current = c.father();
        }
        if potential.is_empty() {
            return Heir::Unresolved;
        }

        for tier in [Tier::Kingdom, Tier::Duchy, Tier::County, Tier::Barony] {
            let mut best = None;
            let mut largest_demesne = 0usize;
            for &candidate in &potential {
                let demesne = self
                    .characters
                    .get(&candidate)
                    .map(|c| {
                        c.titles()
                            .iter()
                            .filter(|t| Tier::from_name(t) == Some(tier))
                            .count()
                    })
                    .unwrap_or(0);
                if demesne > largest_demesne {
                    best = Some(candidate);
                    largest_demesne = demesne;
                }
            }
            if let Some(heir) = best {
                return Heir::Single(heir);
            }
        }

        // Nobody holds any ranked title
        Heir::Single(potential[0])
    }

    /// Accumulates culture weight over the vassal subtree rooted at `name`:
    /// each title contributes its tier weight to its holder's culture.
    pub fn culture_weights(&self, name: &str, weights: &mut HashMap<String, i64>) {
        let Some(title) = self.titles.get(name) else {
            return;
        };
        for vassal in title.vassals() {
            self.culture_weights(vassal, weights);
        }
        if let Some(holder) = title.holder().and_then(|id| self.characters.get(&id)) {
            if !holder.culture().is_empty() {
                *weights.entry(holder.culture().to_string()).or_insert(0) +=
                    title.tier().weight() as i64;
            }
        }
    }
}
