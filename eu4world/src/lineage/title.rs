use pdxtxt::PdxNode;

use super::CharacterId;

/// Title tier, derived from the two-character name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Barony,
    County,
    Duchy,
    Kingdom,
    Empire,
}

impl Tier {
    pub fn from_name(name: &str) -> Option<Tier> {
        match name.get(0..2) {
            Some("e_") => Some(Tier::Empire),
            Some("k_") => Some(Tier::Kingdom),
            Some("d_") => Some(Tier::Duchy),
            Some("c_") => Some(Tier::County),
            Some("b_") => Some(Tier::Barony),
            _ => None,
        }
    }

    /// Cultural weight contributed by a title of this tier.
    pub fn weight(self) -> u32 {
        match self {
            Tier::Empire => 5,
            Tier::Kingdom => 4,
            Tier::Duchy => 3,
            Tier::County => 2,
            Tier::Barony => 1,
        }
    }
}

/// The closed set of succession laws the resolver understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessionLaw {
    Primogeniture,
    Gavelkind,
    Seniority,
    FeudalElective,
    TurkishSuccession,
    Other(String),
}

impl SuccessionLaw {
    pub fn from_save_value(value: &str) -> Self {
        match value {
            "primogeniture" => SuccessionLaw::Primogeniture,
            "gavelkind" => SuccessionLaw::Gavelkind,
            "seniority" => SuccessionLaw::Seniority,
            "feudal_elective" => SuccessionLaw::FeudalElective,
            "turkish_succession" => SuccessionLaw::TurkishSuccession,
            other => SuccessionLaw::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderLaw {
    Agnatic,
    Cognatic,
    TrueCognatic,
}

impl GenderLaw {
    pub fn from_save_value(value: &str) -> Self {
        match value {
            "cognatic" => GenderLaw::Cognatic,
            "true_cognatic" => GenderLaw::TrueCognatic,
            "agnatic" => GenderLaw::Agnatic,
            other => {
                if !other.is_empty() {
                    log::warn!("unknown gender law {:?}, treating as agnatic", other);
                }
                GenderLaw::Agnatic
            }
        }
    }
}

/// Outcome of heir resolution.
///
/// Gavelkind produces many heirs; laws outside the closed set produce an
/// explicit `Unsupported` rather than silently no heir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heir {
    Unresolved,
    Unsupported,
    Single(CharacterId),
    Partition(Vec<CharacterId>),
}

/// A feudal title.
///
/// The liege/vassal edges form a tree (at most one direct liege); the
/// de-jure liege is a separate nominal tree over the same titles, used only
/// for cultural-weight purposes.
#[derive(Debug, Clone)]
pub struct Title {
    name: String,
    tier: Tier,
    holder: Option<CharacterId>,
    heir: Heir,
    succession: SuccessionLaw,
    gender: GenderLaw,
    nominees: Vec<(CharacterId, u32)>,
    liege: Option<String>,
    vassals: Vec<String>,
    de_jure_liege: Option<String>,
    independent: bool,
}

impl Title {
    /// Builds a title from its save node. The caller has already checked
    /// that the key carries a tier prefix.
    pub fn from_node(node: &PdxNode) -> Self {
        let name = node.key().to_string();
        let tier = Tier::from_name(&name).unwrap_or(Tier::Barony);

        let holder = node
            .leaf_of("holder")
            .and_then(|s| s.parse::<CharacterId>().ok())
            .filter(|&id| id != 0);

        // Repeated nomination records accumulate votes per candidate.
        let mut nominees: Vec<(CharacterId, u32)> = Vec::new();
        for nomination in node.values("nomination") {
            let id = nomination
                .values("nominee")
                .first()
                .and_then(|n| n.leaf_of("id"))
                .and_then(|s| s.parse::<CharacterId>().ok());
            let Some(id) = id else {
                log::warn!("malformed nomination in title {}", name);
                continue;
            };
            match nominees.iter_mut().find(|(n, _)| *n == id) {
                Some((_, votes)) => *votes += 1,
                None => nominees.push((id, 1)),
            }
        }

        let de_jure_liege = node
            .leaf_of("de_jure_liege")
            .filter(|s| !s.is_empty() && *s != "---")
            .map(str::to_string);

        Title {
            name,
            tier,
            holder,
            heir: Heir::Unresolved,
            succession: SuccessionLaw::from_save_value(
                node.leaf_of("succession").unwrap_or_default(),
            ),
            gender: GenderLaw::from_save_value(node.leaf_of("gender").unwrap_or_default()),
            nominees,
            liege: node.leaf_of("liege").map(str::to_string),
            vassals: Vec::new(),
            de_jure_liege,
            independent: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn holder(&self) -> Option<CharacterId> {
        self.holder
    }

    pub(crate) fn clear_holder(&mut self) {
        self.holder = None;
    }

    pub fn heir(&self) -> &Heir {
        &self.heir
    }

    pub(crate) fn set_heir(&mut self, heir: Heir) {
        self.heir = heir;
    }

    pub fn succession(&self) -> &SuccessionLaw {
        &self.succession
    }

    pub fn gender(&self) -> GenderLaw {
        self.gender
    }

    pub fn nominees(&self) -> &[(CharacterId, u32)] {
        &self.nominees
    }

    pub fn liege(&self) -> Option<&str> {
        self.liege.as_deref()
    }

    pub fn vassals(&self) -> &[String] {
        &self.vassals
    }

    pub(crate) fn add_vassal(&mut self, name: &str) {
        self.vassals.push(name.to_string());
    }

    pub fn is_independent(&self) -> bool {
        self.independent
    }

    pub(crate) fn set_independent(&mut self, independent: bool) {
        self.independent = independent;
    }

    pub fn de_jure_liege(&self) -> Option<&str> {
        self.de_jure_liege.as_deref()
    }

    pub(crate) fn clear_de_jure_liege(&mut self) {
        self.de_jure_liege = None;
    }
}
