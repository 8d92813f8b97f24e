use crate::pop::V2Pop;

/// A destination-world province.
#[derive(Debug, Clone)]
pub struct V2Province {
    id: u32,
    owner: Option<String>,
    cores: Vec<String>,
    fort_level: u32,
    naval_base_level: u32,
    rail_level: u32,
    pops: Vec<V2Pop>,
    colonial_name: Option<String>,
}

impl V2Province {
    pub fn new(id: u32) -> Self {
        V2Province {
            id,
            owner: None,
            cores: Vec::new(),
            fort_level: 0,
            naval_base_level: 0,
            rail_level: 0,
            pops: Vec::new(),
            colonial_name: None,
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

    pub fn add_core(&mut self, tag: &str) {
        if !self.cores.iter().any(|c| c == tag) {
            self.cores.push(tag.to_string());
        }
    }

    /// A province is colonial when its owner holds no core claim on it.
    pub fn is_colonial(&self) -> bool {
        match &self.owner {
            Some(tag) => !self.cores.iter().any(|c| c == tag),
            None => false,
        }
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

    /// Carries the highest building level seen across the source provinces
    /// that merged into this one.
    pub fn raise_buildings(&mut self, fort: u32, naval_base: u32, rail: u32) {
        self.fort_level = self.fort_level.max(fort);
        self.naval_base_level = self.naval_base_level.max(naval_base);
        self.rail_level = self.rail_level.max(rail);
    }

    pub fn pops(&self) -> &[V2Pop] {
        &self.pops
    }

    pub fn add_pop(&mut self, pop: V2Pop) {
        if pop.size > 0 {
            self.pops.push(pop);
        }
    }

    pub fn total_population(&self) -> i32 {
        self.pops.iter().map(|p| p.size).sum()
    }

    pub fn colonial_name(&self) -> Option<&str> {
        self.colonial_name.as_deref()
    }

    pub fn set_colonial_name(&mut self, name: Option<String>) {
        self.colonial_name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colonial_means_owner_without_core() {
        let mut p = V2Province::new(100);
        assert!(!p.is_colonial());
        p.set_owner(Some("ENG".to_string()));
        assert!(p.is_colonial());
        p.add_core("ENG");
        assert!(!p.is_colonial());
    }

    #[test]
    fn buildings_keep_the_maximum() {
        let mut p = V2Province::new(100);
        p.raise_buildings(2, 0, 1);
        p.raise_buildings(1, 3, 0);
        assert_eq!(p.fort_level(), 2);
        assert_eq!(p.naval_base_level(), 3);
        assert_eq!(p.rail_level(), 1);
    }

    #[test]
    fn zero_sized_pops_are_dropped() {
        let mut p = V2Province::new(100);
        p.add_pop(V2Pop {
            kind: "farmers".to_string(),
            culture: "swedish".to_string(),
            religion: "protestant".to_string(),
            size: 0,
        });
        assert!(p.pops().is_empty());
    }
}
