use std::collections::HashMap;

use pdxtxt::PdxNode;

use super::{Character, CharacterId, GenderLaw};

/// A dynasty: the membership is filled in during lineage resolution.
#[derive(Debug, Clone)]
pub struct Dynasty {
    id: u32,
    name: String,
    members: Vec<CharacterId>,
}

impl Dynasty {
    pub fn from_node(id: u32, node: &PdxNode) -> Self {
        Dynasty {
            id,
            name: node.leaf_of("name").unwrap_or_default().to_string(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[CharacterId] {
        &self.members
    }

    pub(crate) fn add_member(&mut self, id: CharacterId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    /// Seniority succession: the eldest living eligible member of the
    /// dynasty. Under cognatic law any man outranks every woman.
    pub fn seniority_heir(
        &self,
        characters: &HashMap<CharacterId, Character>,
        gender: GenderLaw,
        holder: CharacterId,
    ) -> Option<CharacterId> {
        let living = || {
            self.members
                .iter()
                .filter(|&&id| id != holder)
                .filter_map(|id| characters.get(id))
                .filter(|c| !c.is_dead())
        };
        let eldest = |female: Option<bool>| {
            living()
                .filter(|c| female.map_or(true, |f| c.is_female() == f))
                .min_by_key(|c| (c.birth(), c.id()))
                .map(|c| c.id())
        };
        match gender {
            GenderLaw::Agnatic => eldest(Some(false)),
            GenderLaw::Cognatic => eldest(Some(false)).or_else(|| eldest(Some(true))),
            GenderLaw::TrueCognatic => eldest(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Date;

    fn member(id: u32, year: i32, female: bool) -> Character {
        Character::for_tests(id, Date::new(year, 1, 1), female, None, Some(9))
    }

    fn setup(members: Vec<Character>) -> (Dynasty, HashMap<CharacterId, Character>) {
        let mut dynasty = Dynasty {
            id: 9,
            name: "af Munsö".to_string(),
            members: Vec::new(),
        };
        let mut chars = HashMap::new();
        for c in members {
            dynasty.add_member(c.id());
            chars.insert(c.id(), c);
        }
        (dynasty, chars)
    }

    #[test]
    fn eldest_living_member_wins() {
        let mut dead_elder = member(1, 1000, false);
        dead_elder.set_dead(true);
        let (dynasty, chars) =
            setup(vec![dead_elder, member(2, 1020, false), member(3, 1010, false)]);
        assert_eq!(
            dynasty.seniority_heir(&chars, GenderLaw::Agnatic, 99),
            Some(3)
        );
    }

    #[test]
    fn gender_law_filters_candidates() {
        let (dynasty, chars) = setup(vec![member(1, 1000, true), member(2, 1020, false)]);
        assert_eq!(
            dynasty.seniority_heir(&chars, GenderLaw::Agnatic, 99),
            Some(2)
        );
        assert_eq!(
            dynasty.seniority_heir(&chars, GenderLaw::Cognatic, 99),
            Some(2)
        );
        assert_eq!(
            dynasty.seniority_heir(&chars, GenderLaw::TrueCognatic, 99),
            Some(1)
        );
    }

    #[test]
    fn holder_is_excluded() {
        let (dynasty, chars) = setup(vec![member(1, 1000, false), member(2, 1020, false)]);
        assert_eq!(
            dynasty.seniority_heir(&chars, GenderLaw::Agnatic, 1),
            Some(2)
        );
    }
}
