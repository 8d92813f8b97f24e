use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use eu4world::Eu4World;
use mappers::{
    checks, country_map, merges, tech_schools, ColonyMapper, CountryMapping, CultureMapper,
    GovernmentMapper, ProvinceMapper, ReligionMapper, StateMapper, UnionMapper,
};
use v2world::factory::load_factories;
use v2world::world::potential_tags;
use v2world::V2World;

mod config;
mod summary;

use config::{Config, RemoveType};
use summary::ConversionSummary;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert EU4 save games into V2 world data", long_about = None)]
struct Args {
    /// Path to the save file to convert
    save: PathBuf,

    /// Path to the configuration file
    #[arg(long, default_value = "configuration.txt")]
    config: PathBuf,

    /// Directory holding the mapping rule files
    #[arg(long, default_value = ".")]
    rules: PathBuf,

    /// Write a JSON conversion summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let config = Config::from_file(&args.config)?;
    let output = config::output_name(&args.save);

    log::info!("Parsing save {}", args.save.display());
    let save = pdxtxt::parse_file(&args.save)
        .with_context(|| format!("parsing save {}", args.save.display()))?;

    let rule = |name: &str| -> Result<pdxtxt::PdxNode> {
        let path = args.rules.join(name);
        pdxtxt::parse_file(&path)
            .with_context(|| format!("parsing rule file {}", path.display()))
    };
    let game_file = |relative: &str| -> Result<pdxtxt::PdxNode> {
        let path = config.v2_path.join(relative);
        pdxtxt::parse_file(&path)
            .with_context(|| format!("parsing game file {}", path.display()))
    };

    log::info!("Parsing province mappings");
    let province_map = ProvinceMapper::from_node(&rule("province_mappings.txt")?)?;
    log::info!("Parsing region structure");
    let state_map = StateMapper::from_node(&game_file("map/region.txt")?);
    log::info!("Parsing culture mappings");
    let culture_map = CultureMapper::from_node(&rule("cultureMap.txt")?)?;
    log::info!("Parsing religion mappings");
    let religion_map = ReligionMapper::from_node(&rule("religionMap.txt")?)?;
    log::info!("Parsing government mappings");
    let government_map = GovernmentMapper::from_node(&rule("governmentMapping.txt")?)?;
    log::info!("Parsing union rules");
    let union_map = UnionMapper::from_node(&rule("unions.txt")?)?;
    log::info!("Parsing colony naming rules");
    let colony_map = ColonyMapper::from_node(&rule("colonial.txt")?)?;
    log::info!("Parsing tech schools");
    let blocked_schools = tech_schools::load_blocked_schools(&rule("blocked_tech_schools.txt")?);
    let schools = tech_schools::load_tech_schools(&game_file("common/technology.txt")?, &blocked_schools);
    log::info!("Determining factory allocation rules");
    let factories = load_factories(&game_file("common/factory_types.txt")?);

    log::info!("Building the source world");
    let mut source = Eu4World::from_save(&save)?;

    log::info!("Checking mapping coverage");
    checks::check_all_provinces_mapped(&source, &province_map);
    checks::check_all_cultures_mapped(&source, &culture_map);
    checks::check_all_religions_mapped(&source, &religion_map);

    log::info!("Merging nations");
    merges::merge_nations(&mut source, &rule("merge_nations.txt")?);

    source.remove_empty_nations();
    match config.remove_type {
        RemoveType::Dead => source.remove_dead_landless_nations(),
        RemoveType::All => source.remove_landless_nations(),
        RemoveType::None => {}
    }

    log::info!("Resolving title heirs");
    source.lineage_mut().determine_heirs();

    log::info!("Creating country mappings");
    let mapping_rules = country_map::load_rules(&rule("country_mappings.txt")?)?;
    let blocked = country_map::load_blocked_nations(&rule("blocked_nations.txt")?);
    let potential = potential_tags(&game_file("common/countries.txt")?);
    let (mapping, residual) =
        CountryMapping::create(&mapping_rules, source.tags(), &potential, &blocked);
    if residual > 0 {
        log::warn!("{} source countries were left without a destination tag", residual);
    }

    let mut dest = V2World::new();
    log::info!("Converting countries");
    dest.convert_countries(
        &source,
        &mapping,
        &culture_map,
        &religion_map,
        &government_map,
        &schools,
    );
    log::info!("Converting provinces");
    dest.convert_provinces(&source, &mapping, &province_map);
    log::info!("Setting colonies");
    dest.setup_colonies(&colony_map);
    log::info!("Creating states");
    dest.setup_states(&state_map);
    log::info!("Allocating starting factories");
    dest.allocate_factories(&source, &factories, config.literacy_weight);
    log::info!("Creating pops");
    dest.setup_pops(&source, &province_map, &culture_map, &religion_map);
    log::info!("Adding unions");
    dest.add_unions(&union_map);

    let totals = ConversionSummary::new(&output, &dest, residual);
    log::info!(
        "Converted {} countries and {} provinces into {} states as {}",
        totals.countries,
        totals.provinces,
        totals.states,
        totals.output_name
    );
    if let Some(path) = args.summary {
        std::fs::write(&path, totals.to_json()?)
            .with_context(|| format!("writing summary {}", path.display()))?;
        log::info!("Wrote conversion summary to {}", path.display());
    }

    Ok(())
}
