use eu4world::Eu4World;
use pdxtxt::PdxNode;

const JAPAN: &str = "JAP";
const UNITED_FLAG: &str = "united_daimyos_of_japan";

/// Applies the `merge_nations` rule block to the world.
///
/// Each rule absorbs its slave tags into its master if `merge = yes`. A
/// `merge_daimyos = yes` entry triggers the Japan unification pass instead.
pub fn merge_nations(world: &mut Eu4World, root: &PdxNode) {
    let Some(rules) = root.values("merge_nations").first().copied() else {
        log::info!("no nations have merging requested (skipping)");
        return;
    };

    for rule in rules.children() {
        if rule.key() == "merge_daimyos" {
            if rule.leaf() == Some("yes") {
                unite_japan(world);
            }
            continue;
        }

        let mut master = String::new();
        let mut slaves: Vec<String> = Vec::new();
        let mut enabled = false;
        for entry in rule.children() {
            match (entry.key(), entry.leaf()) {
                ("merge", Some("yes")) => enabled = true,
                ("master", Some(tag)) => master = tag.to_string(),
                ("slave", Some(tag)) => slaves.push(tag.to_string()),
                _ => {}
            }
        }

        if enabled && world.country(&master).is_some() && !slaves.is_empty() {
            for slave in &slaves {
                world.eat_country(&master, slave);
            }
        }
    }
}

/// Absorbs every daimyo-capable country into Japan. Idempotent: a flag on
/// Japan records that unification already happened.
pub fn unite_japan(world: &mut Eu4World) {
    let Some(japan) = world.country(JAPAN) else {
        return;
    };
    if japan.has_flag(UNITED_FLAG) {
        return;
    }

    let daimyos: Vec<String> = world
        .countries()
        .filter(|c| c.possible_daimyo() && c.tag() != JAPAN)
        .map(|c| c.tag().to_string())
        .collect();
    for tag in &daimyos {
        world.eat_country(JAPAN, tag);
    }

    if let Some(japan) = world.country_mut(JAPAN) {
        japan.set_flag(UNITED_FLAG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAVE: &str = r#"
        JAP = { primary_culture = japanese government = monarchy }
        ODA = { primary_culture = japanese possible_daimyo = yes }
        MRI = { primary_culture = japanese possible_daimyo = yes }
        FRA = { primary_culture = francien }
        BUR = { primary_culture = burgundian }
        1 = { owner = ODA core = ODA }
        2 = { owner = MRI core = MRI }
        3 = { owner = BUR core = BUR }
    "#;

    fn world() -> Eu4World {
        let root = pdxtxt::parse_str(SAVE).unwrap();
        Eu4World::from_save(&root).unwrap()
    }

    #[test]
    fn merge_rule_eats_slaves() {
        let mut w = world();
        let root = pdxtxt::parse_str(
            r#"
            merge_nations = {
                merge_burgundy = {
                    merge = yes
                    master = FRA
                    slave = BUR
                }
            }
            "#,
        )
        .unwrap();
        merge_nations(&mut w, &root);
        assert!(w.country("BUR").is_none());
        assert_eq!(w.province(3).unwrap().owner(), Some("FRA"));
    }

    #[test]
    fn disabled_rule_is_ignored() {
        let mut w = world();
        let root = pdxtxt::parse_str(
            r#"
            merge_nations = {
                merge_burgundy = {
                    merge = no
                    master = FRA
                    slave = BUR
                }
            }
            "#,
        )
        .unwrap();
        merge_nations(&mut w, &root);
        assert!(w.country("BUR").is_some());
    }

    #[test]
    fn daimyo_unification_is_idempotent() {
        let mut w = world();
        unite_japan(&mut w);
        assert!(w.country("ODA").is_none());
        assert!(w.country("MRI").is_none());
        assert_eq!(w.province(1).unwrap().owner(), Some("JAP"));
        assert!(w.country("JAP").unwrap().has_flag(UNITED_FLAG));

        // second run must not touch anything
        unite_japan(&mut w);
        assert!(w.country("FRA").is_some());
    }

    #[test]
    fn missing_block_is_a_no_op() {
        let mut w = world();
        let root = pdxtxt::parse_str("something_else = { }").unwrap();
        merge_nations(&mut w, &root);
        assert!(w.country("BUR").is_some());
    }
}
