use pdxtxt::PdxNode;

/// A destination-game technology school and its research modifiers.
#[derive(Debug, Clone)]
pub struct TechSchool {
    pub name: String,
    pub army_investment: f64,
    pub commerce_investment: f64,
    pub culture_investment: f64,
    pub industry_investment: f64,
    pub navy_investment: f64,
}

fn modifier(node: &PdxNode, key: &str) -> f64 {
    node.leaf_of(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

/// Schools a country may not be assigned (typically mod-internal ones).
pub fn load_blocked_schools(root: &PdxNode) -> Vec<String> {
    let Some(block) = root.children().first() else {
        return Vec::new();
    };
    let mut blocked: Vec<String> = block.tokens().to_vec();
    for child in block.children() {
        if let Some(name) = child.leaf() {
            blocked.push(name.to_string());
        }
    }
    blocked
}

/// Reads the school definitions out of the destination game's technology
/// file, dropping blocked ones.
pub fn load_tech_schools(root: &PdxNode, blocked: &[String]) -> Vec<TechSchool> {
    let schools_values = root.values("schools");
    let Some(schools) = schools_values.first() else {
        log::warn!("technology file defines no schools");
        return Vec::new();
    };

    schools
        .children()
        .iter()
        .filter(|s| !blocked.iter().any(|b| b == s.key()))
        .map(|s| TechSchool {
            name: s.key().to_string(),
            army_investment: modifier(s, "army_tech_research_bonus"),
            commerce_investment: modifier(s, "commerce_tech_research_bonus"),
            culture_investment: modifier(s, "culture_tech_research_bonus"),
            industry_investment: modifier(s, "industry_tech_research_bonus"),
            navy_investment: modifier(s, "navy_tech_research_bonus"),
        })
        .collect()
}
