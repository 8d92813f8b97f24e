use std::collections::BTreeSet;

use eu4world::Eu4World;

use crate::cultures::CultureMapper;
use crate::provinces::ProvinceMapper;
use crate::religions::ReligionMapper;

// Advisory validation passes. They run before conversion, log what the
// tables fail to cover, and never abort: an unmapped entity is converted
// with its default/unmapped state.

/// Warns about source provinces absent from the province table. Returns the
/// number of misses.
pub fn check_all_provinces_mapped(world: &Eu4World, provinces: &ProvinceMapper) -> usize {
    let mut misses = 0;
    for province in world.provinces() {
        if provinces.dest_provinces(province.id()).is_empty() {
            log::warn!("no mapping for province {}", province.id());
            misses += 1;
        }
    }
    misses
}

/// Warns about cultures (country primaries and pop cultures) absent from
/// the culture table. Returns the number of distinct misses.
pub fn check_all_cultures_mapped(world: &Eu4World, cultures: &CultureMapper) -> usize {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for country in world.countries() {
        let culture = country.primary_culture();
        if !culture.is_empty() && !cultures.is_mapped(culture) {
            seen.insert(culture);
        }
    }
    for province in world.provinces() {
        for pop in province.pops() {
            if !pop.culture.is_empty() && !cultures.is_mapped(&pop.culture) {
                seen.insert(&pop.culture);
            }
        }
    }
    for culture in &seen {
        log::warn!("no mapping for culture {}", culture);
    }
    seen.len()
}

/// Warns about religions absent from the religion table. Returns the number
/// of distinct misses.
pub fn check_all_religions_mapped(world: &Eu4World, religions: &ReligionMapper) -> usize {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for country in world.countries() {
        let religion = country.religion();
        if !religion.is_empty() && !religions.is_mapped(religion) {
            seen.insert(religion);
        }
    }
    for province in world.provinces() {
        for pop in province.pops() {
            if !pop.religion.is_empty() && !religions.is_mapped(&pop.religion) {
                seen.insert(&pop.religion);
            }
        }
    }
    for religion in &seen {
        log::warn!("no mapping for religion {}", religion);
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Eu4World {
        let root = pdxtxt::parse_str(
            r#"
            SWE = { primary_culture = swedish religion = protestant }
            FIN = { primary_culture = finnish religion = orthodox }
            1 = {
                owner = SWE
                farmers = { size = 100 culture = swedish religion = protestant }
            }
            2 = {
                owner = FIN
                farmers = { size = 100 culture = sami religion = animist }
            }
            "#,
        )
        .unwrap();
        Eu4World::from_save(&root).unwrap()
    }

    #[test]
    fn counts_unmapped_without_aborting() {
        let w = world();

        let provinces = ProvinceMapper::from_node(
            &pdxtxt::parse_str("mappings = { link = { eu4 = 1 v2 = 100 } }").unwrap(),
        )
        .unwrap();
        assert_eq!(check_all_provinces_mapped(&w, &provinces), 1);

        let cultures = CultureMapper::from_node(
            &pdxtxt::parse_str(
                "cultureMap = { link = { eu4 = swedish v2 = swedish } link = { eu4 = finnish v2 = finnish } }",
            )
            .unwrap(),
        )
        .unwrap();
        // only sami is missing
        assert_eq!(check_all_cultures_mapped(&w, &cultures), 1);

        let religions = ReligionMapper::from_node(
            &pdxtxt::parse_str("religionMap = { link = { eu4 = protestant v2 = protestant } }")
                .unwrap(),
        )
        .unwrap();
        // orthodox and animist are missing
        assert_eq!(check_all_religions_mapped(&w, &religions), 2);
    }
}
