use pdxtxt::PdxNode;

/// Pop kinds that can appear as province children in the save.
pub const POP_KINDS: &[&str] = &[
    "aristocrats",
    "artisans",
    "bureaucrats",
    "capitalists",
    "clergymen",
    "clerks",
    "craftsmen",
    "farmers",
    "labourers",
    "officers",
    "slaves",
    "soldiers",
];

/// A population unit living in a province.
#[derive(Debug, Clone)]
pub struct Pop {
    pub kind: String,
    pub culture: String,
    pub religion: String,
    pub size: i32,
    /// Fraction 0.0–1.0.
    pub literacy: f64,
}

impl Pop {
    pub fn from_node(node: &PdxNode) -> Self {
        let size = node
            .leaf_of("size")
            .and_then(|s| s.parse::<f64>().ok())
            .map(|s| s as i32)
            .unwrap_or(0);
        let literacy = node
            .leaf_of("literacy")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);
        Pop {
            kind: node.key().to_string(),
            culture: node.leaf_of("culture").unwrap_or_default().to_string(),
            religion: node.leaf_of("religion").unwrap_or_default().to_string(),
            size,
            literacy,
        }
    }
}

/// Share of a province's population belonging to one culture, used by the
/// culture-survival heuristic when culling landless countries.
#[derive(Debug, Clone, PartialEq)]
pub struct PopRatio {
    pub culture: String,
    pub ratio: f64,
}
