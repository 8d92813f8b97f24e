use pdxtxt::PdxNode;

/// A starting-factory template from the destination game's factory file.
#[derive(Debug, Clone)]
pub struct Factory {
    pub name: String,
    pub cost: f64,
}

/// Reads the factory templates handed out at game start. Cheap factories
/// are dealt first so small economies still receive something useful.
pub fn load_factories(root: &PdxNode) -> Vec<Factory> {
    let Some(block) = root.children().first() else {
        log::warn!("factory file defines no factories");
        return Vec::new();
    };

    let mut factories: Vec<Factory> = block
        .children()
        .iter()
        .map(|f| Factory {
            name: f.key().to_string(),
            cost: f.leaf_of("cost").and_then(|v| v.parse().ok()).unwrap_or(1.0),
        })
        .collect();
    factories.sort_by(|a, b| a.cost.total_cmp(&b.cost));
    factories
}
