use std::collections::HashMap;

use pdxtxt::PdxNode;

use crate::date::Date;

use super::GenderLaw;

pub type CharacterId = u32;

/// A character from the lineage block of a converted save.
///
/// Children are linked in the resolution pass (from the father references)
/// and kept birth-ordered, which is what the succession queries rely on.
#[derive(Debug, Clone)]
pub struct Character {
    id: CharacterId,
    birth: Date,
    dead: bool,
    female: bool,
    father: Option<CharacterId>,
    dynasty: Option<u32>,
    culture: String,
    religion: String,
    children: Vec<CharacterId>,
    titles: Vec<String>,
}

impl Character {
    pub fn from_node(id: CharacterId, node: &PdxNode) -> Self {
        Character {
            id,
            birth: node
                .leaf_of("birth_date")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            dead: node.leaf_of("death_date").is_some(),
            female: node.leaf_of("female") == Some("yes"),
            father: node.leaf_of("father").and_then(|s| s.parse().ok()),
            dynasty: node.leaf_of("dynasty").and_then(|s| s.parse().ok()),
            culture: node.leaf_of("culture").unwrap_or_default().to_string(),
            religion: node.leaf_of("religion").unwrap_or_default().to_string(),
            children: Vec::new(),
            titles: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        id: CharacterId,
        birth: Date,
        female: bool,
        father: Option<CharacterId>,
        dynasty: Option<u32>,
    ) -> Self {
        Character {
            id,
            birth,
            dead: false,
            female,
            father,
            dynasty,
            culture: String::new(),
            religion: String::new(),
            children: Vec::new(),
            titles: Vec::new(),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn birth(&self) -> Date {
        self.birth
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[cfg(test)]
    pub(crate) fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
    }

    pub fn is_female(&self) -> bool {
        self.female
    }

    pub fn father(&self) -> Option<CharacterId> {
        self.father
    }

    pub fn dynasty(&self) -> Option<u32> {
        self.dynasty
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    #[cfg(test)]
    pub(crate) fn set_culture(&mut self, culture: &str) {
        self.culture = culture.to_string();
    }

    pub fn religion(&self) -> &str {
        &self.religion
    }

    pub fn children(&self) -> &[CharacterId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, id: CharacterId) {
        if !self.children.contains(&id) {
            self.children.push(id);
        }
    }

    pub(crate) fn sort_children(&mut self, births: &HashMap<CharacterId, Date>) {
        self.children
            .sort_by_key(|id| (births.get(id).copied().unwrap_or_default(), *id));
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub(crate) fn add_title(&mut self, name: &str) {
        if !self.titles.iter().any(|t| t == name) {
            self.titles.push(name.to_string());
        }
    }

    /// Living children eligible under the gender law, eldest first.
    /// Under cognatic law all sons rank before any daughter.
    fn eligible_children(
        &self,
        characters: &HashMap<CharacterId, Character>,
        gender: GenderLaw,
        exclude: CharacterId,
    ) -> Vec<CharacterId> {
        let living: Vec<&Character> = self
            .children
            .iter()
            .filter(|&&id| id != exclude)
            .filter_map(|id| characters.get(id))
            .filter(|c| !c.is_dead())
            .collect();
        match gender {
            GenderLaw::Agnatic => living
                .iter()
                .filter(|c| !c.is_female())
                .map(|c| c.id())
                .collect(),
            GenderLaw::Cognatic => {
                let mut heirs: Vec<CharacterId> = living
                    .iter()
                    .filter(|c| !c.is_female())
                    .map(|c| c.id())
                    .collect();
                heirs.extend(living.iter().filter(|c| c.is_female()).map(|c| c.id()));
                heirs
            }
            GenderLaw::TrueCognatic => living.iter().map(|c| c.id()).collect(),
        }
    }

    /// The eldest eligible child, for primogeniture chain-walking.
    /// `holder` is never its own heir.
    pub fn primogeniture_heir(
        &self,
        characters: &HashMap<CharacterId, Character>,
        gender: GenderLaw,
        holder: CharacterId,
    ) -> Option<CharacterId> {
        self.eligible_children(characters, gender, holder)
            .into_iter()
            .next()
    }

    /// All candidates open succession would consider at this ancestor.
    pub fn potential_open_heirs(
        &self,
        characters: &HashMap<CharacterId, Character>,
        gender: GenderLaw,
        holder: CharacterId,
    ) -> Vec<CharacterId> {
        self.eligible_children(characters, gender, holder)
    }

    /// Gavelkind partitions the realm among all eligible children.
    pub fn gavelkind_heirs(
        &self,
        characters: &HashMap<CharacterId, Character>,
        gender: GenderLaw,
        holder: CharacterId,
    ) -> Vec<CharacterId> {
        self.eligible_children(characters, gender, holder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(chars: Vec<Character>) -> HashMap<CharacterId, Character> {
        chars.into_iter().map(|c| (c.id(), c)).collect()
    }

    fn child(id: u32, year: i32, female: bool) -> Character {
        Character::for_tests(id, Date::new(year, 1, 1), female, Some(1), None)
    }

    fn linked(father: Character, children: Vec<Character>) -> HashMap<CharacterId, Character> {
        let mut chars = index(children);
        let mut father = father;
        let mut ids: Vec<CharacterId> = chars.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            father.add_child(id);
        }
        let births: HashMap<CharacterId, Date> =
            chars.iter().map(|(&id, c)| (id, c.birth())).collect();
        father.sort_children(&births);
        chars.insert(father.id(), father);
        chars
    }

    #[test]
    fn agnatic_skips_daughters() {
        let father = Character::for_tests(1, Date::new(1000, 1, 1), false, None, None);
        let chars = linked(
            father,
            vec![child(2, 1030, true), child(3, 1032, false)],
        );
        let heir = chars[&1].primogeniture_heir(&chars, GenderLaw::Agnatic, 1);
        assert_eq!(heir, Some(3));
    }

    #[test]
    fn cognatic_prefers_sons_then_daughters() {
        let father = Character::for_tests(1, Date::new(1000, 1, 1), false, None, None);
        let chars = linked(
            father,
            vec![child(2, 1030, true), child(3, 1032, false)],
        );
        assert_eq!(
            chars[&1].primogeniture_heir(&chars, GenderLaw::Cognatic, 1),
            Some(3)
        );
        assert_eq!(
            chars[&1].potential_open_heirs(&chars, GenderLaw::Cognatic, 1),
            vec![3, 2]
        );
        assert_eq!(
            chars[&1].primogeniture_heir(&chars, GenderLaw::TrueCognatic, 1),
            Some(2)
        );
    }

    #[test]
    fn dead_children_and_the_holder_are_ineligible() {
        let father = Character::for_tests(1, Date::new(1000, 1, 1), false, None, None);
        let mut dead_son = child(2, 1030, false);
        dead_son.set_dead(true);
        let chars = linked(father, vec![dead_son, child(3, 1032, false)]);
        assert_eq!(
            chars[&1].primogeniture_heir(&chars, GenderLaw::Agnatic, 1),
            Some(3)
        );
        // the only living son is the holder himself
        assert_eq!(
            chars[&1].primogeniture_heir(&chars, GenderLaw::Agnatic, 3),
            None
        );
    }

    #[test]
    fn parses_save_fields() {
        let root = pdxtxt::parse_str(
            r#"
            1234 = {
                birth_date = "1040.5.2"
                death_date = "1090.1.1"
                female = yes
                father = 1200
                dynasty = 4
                culture = swedish
                religion = catholic
            }
            "#,
        )
        .unwrap();
        let c = Character::from_node(1234, &root.children()[0]);
        assert_eq!(c.birth(), Date::new(1040, 5, 2));
        assert!(c.is_dead());
        assert!(c.is_female());
        assert_eq!(c.father(), Some(1200));
        assert_eq!(c.dynasty(), Some(4));
        assert_eq!(c.culture(), "swedish");
    }
}
