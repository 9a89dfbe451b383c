//! Demo binary: builds a nether-style biome tree, applies `biomes.ron`
//! overrides, resolves it against a freshly built world registry and prints
//! how often each biome is drawn.
//!
//! Run with `cargo run -p verdant-demo -- --seed 7 --samples 50000`.

use clap::Parser;
use hashbrown::HashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use verdant_biomes::{
    BiomeBuilder, BiomeKey, BiomeKeyError, BiomePicker, BiomeRegistry, BiomeTree, Decoration,
    Precipitation, RecordingHooks, SurfaceRule,
};
use verdant_config::{BiomesConfig, CliArgs, Settings};

fn key(path: &str) -> Result<BiomeKey, BiomeKeyError> {
    BiomeKey::new("verdant", path)
}

/// Content definition phase: runs once per process.
fn define_biomes() -> Result<BiomeTree, Box<dyn std::error::Error>> {
    let mut tree = BiomeTree::new();

    let wastes = BiomeBuilder::start(key("nether_wastes")?)
        .temperature(2.0)
        .downfall(0.0)
        .precipitation(Precipitation::None)
        .surface("netherrack", "netherrack")
        .structure("minecraft:nether_fortress")
        .build(&mut tree)?;

    let crimson = BiomeBuilder::start(key("crimson_forest")?)
        .generation_chance(0.25)
        .surface("crimson_nylium", "netherrack")
        .feature(Decoration::VegetalDecoration, "verdant:crimson_fungus")
        .surface_rule(SurfaceRule::Sequence(vec![
            SurfaceRule::Block("crimson_nylium".into()),
            SurfaceRule::Block("netherrack".into()),
        ]))
        .build(&mut tree)?;

    let crimson_edge = BiomeBuilder::start(key("crimson_edge")?)
        .surface("netherrack", "netherrack")
        .build(&mut tree)?;

    let warped = BiomeBuilder::start(key("warped_forest")?)
        .generation_chance(0.75)
        .surface("warped_nylium", "netherrack")
        .custom_data("ambient_particles", "warped_spore")
        .build(&mut tree)?;

    BiomeBuilder::start(key("soul_sand_valley")?)
        .fog_density(1.6)
        .surface("soul_sand", "soul_soil")
        .build(&mut tree)?;

    BiomeBuilder::start(key("basalt_deltas")?)
        .vertical()
        .fog_density(2.0)
        .terrain_height(0.3)
        .surface("basalt", "blackstone")
        .build(&mut tree)?;

    tree.add_sub_biome(wastes, crimson)?;
    tree.add_sub_biome(wastes, warped)?;
    tree.set_edge(crimson, crimson_edge)?;
    tree[crimson].set_edge_size(4);

    Ok(tree)
}

/// World load phase: the host registers its live biomes.
fn build_world_registry(tree: &BiomeTree) -> Result<BiomeRegistry, Box<dyn std::error::Error>> {
    let mut registry = BiomeRegistry::new();
    // Left out so the demo shows a partially resolved tree.
    let skipped = key("soul_sand_valley")?;
    for node in tree.nodes().filter(|node| node.key() != &skipped) {
        registry.register(node.def().clone())?;
    }
    Ok(registry)
}

fn run(
    settings: &Settings,
    biomes_config: &mut BiomesConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tree = define_biomes()?;
    tree.setup_all_from_config(biomes_config);

    let registry = build_world_registry(&tree)?;
    let mut hooks = RecordingHooks::new();
    let report = tree.resolve_all(&registry, &mut hooks);
    if !report.is_complete() {
        warn!(missing = ?report.missing, "some biomes are unavailable in this world");
    }
    info!(calls = hooks.calls.len(), "host attachments registered");

    let picker = BiomePicker::from_roots(&tree);
    let mut rng = ChaCha8Rng::seed_from_u64(settings.generation.seed);
    let samples = settings.generation.samples;

    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut unavailable = 0u32;
    for _ in 0..samples {
        let Some(picked) = picker.pick(&tree, &mut rng) else {
            break;
        };
        let node = &tree[picked];
        if node.is_resolved() {
            *counts.entry(node.key().to_string()).or_default() += 1;
        } else {
            unavailable += 1;
        }
    }

    let mut rows: Vec<_> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("{samples} draws (seed {}):", settings.generation.seed);
    for (biome, count) in rows {
        let share = f64::from(count) / f64::from(samples.max(1)) * 100.0;
        println!("  {biome:<32} {count:>8}  {share:>6.2}%");
    }
    if unavailable > 0 {
        println!("  {:<32} {unavailable:>8}", "(unavailable)");
    }

    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match verdant_config::default_config_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    };

    let mut settings = Settings::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load settings: {e}, using defaults");
        Settings::default()
    });
    settings.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    verdant_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&settings));

    let mut biomes_config = BiomesConfig::load_or_create(&config_dir).unwrap_or_else(|e| {
        warn!("Failed to load biome config: {e}, using code defaults");
        BiomesConfig::in_memory()
    });

    if let Err(e) = run(&settings, &mut biomes_config) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
