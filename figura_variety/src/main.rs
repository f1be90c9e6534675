// Figura variety generator, CLI entry point.
//
// Generates one variety and prints it, one structure per line as
// `number<TAB>level<TAB>code`, or as a JSON array with `--json`.
//
// Usage:
//   cargo run -p figura_variety --bin varieties -- [--degree N] [--order N]
//     [--strategy NAME] [--level N] [--mask CODE] [--cap N]
//     [--config path.json] [--json]
//
// Strategies: instances, classes, binary, substructures, rhythmic, metric.
// `substructures` needs `--mask`; without `--level` it covers every level.
// Log verbosity follows RUST_LOG (default `figura_variety=info`).

use figura_structure::{FiguralStructure, System};
use figura_variety::{GeneratorConfig, Strategy, Variety};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("figura_variety=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let degree: u32 = parse_flag(&args, "--degree").unwrap_or(2);
    let order: usize = parse_flag(&args, "--order").unwrap_or(12);
    let strategy_name: String = parse_flag(&args, "--strategy").unwrap_or_else(|| "classes".to_string());
    let level: Option<usize> = parse_flag(&args, "--level");
    let mask_code: Option<String> = parse_flag(&args, "--mask");
    let cap: Option<usize> = parse_flag(&args, "--cap");
    let config_path: Option<String> = parse_flag(&args, "--config");
    let as_json = args.iter().any(|a| a == "--json");

    let system = System::try_new(degree, order).unwrap_or_else(|e| fail(&e.to_string()));

    let mut config = match config_path {
        Some(path) => GeneratorConfig::load(Path::new(&path)).unwrap_or_else(|e| fail(&e.to_string())),
        None => GeneratorConfig::default(),
    };
    if let Some(cap) = cap {
        config.cap = cap;
    }

    let strategy = parse_strategy(&strategy_name, &system, level, mask_code.as_deref())
        .unwrap_or_else(|message| fail(&message));

    let mut variety: Variety<FiguralStructure> = Variety::new(system).with_config(config);
    if let Err(e) = variety.generate(&strategy) {
        fail(&e.to_string());
    }
    info!(
        count = variety.len(),
        capped = variety.is_capped(),
        "{strategy} over {system}"
    );

    if as_json {
        match serde_json::to_string_pretty(variety.results()) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(&e.to_string()),
        }
    } else {
        for structure in variety.results() {
            println!("{}\t{}\t{}", structure.number(), structure.level(), structure);
        }
    }
}

fn parse_strategy(
    name: &str,
    system: &System,
    level: Option<usize>,
    mask: Option<&str>,
) -> Result<Strategy, String> {
    let level_or_half = level.unwrap_or(system.order() / 2);
    match name.to_lowercase().as_str() {
        "instances" => Ok(Strategy::Instances {
            level: level_or_half,
        }),
        "classes" => Ok(Strategy::Classes {
            level: level_or_half,
        }),
        "binary" => Ok(Strategy::BinaryClasses {
            level: level_or_half,
        }),
        "rhythmic" => Ok(Strategy::RhythmicClasses {
            level: level_or_half,
        }),
        "metric" => Ok(Strategy::MetricClasses),
        "substructures" => {
            let code = mask.ok_or("--mask is required for substructures")?;
            let mask = FiguralStructure::try_from_code(system, code)
                .map_err(|e| format!("bad mask '{code}': {e}"))?;
            Ok(Strategy::Substructures { mask, level })
        }
        other => Err(format!("unknown strategy '{other}'")),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
