//! Normalize the portions of a meal plan JSON file
//!
//! Usage: fix_portions [INPUT] [--output PATH]
//! Reads stdin when INPUT is omitted or "-".

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cibozer_portions::models::MealPlan;
use cibozer_portions::portions::Correction;
use cibozer_portions::{build_info, config, PortionNormalizer};

#[derive(Debug, Parser)]
#[command(name = "fix_portions", version, about = "Clamp meal plan portions and add kitchen measurements")]
struct Args {
    /// Meal plan JSON file ("-" for stdin)
    input: Option<PathBuf>,

    /// Write the normalized plan here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with table overrides
    #[arg(long, env = config::TABLES_ENV_VAR)]
    tables: Option<PathBuf>,

    /// Print the normalization report as JSON on stderr
    #[arg(long)]
    report: bool,
}

fn read_input(input: Option<&PathBuf>) -> std::io::Result<String> {
    match input {
        Some(path) if path.to_str() != Some("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cibozer_portions=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    build_info::print_startup_banner("fix_portions");

    let converter = config::load_converter_from(args.tables.as_deref())?;
    let normalizer = PortionNormalizer::new(converter);

    let content = read_input(args.input.as_ref())?;
    let mut plan: MealPlan = serde_json::from_str(&content)?;
    let report = normalizer.normalize_in_place(&mut plan);

    let json = serde_json::to_string_pretty(&plan)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", json)?;
        }
    }

    eprintln!(
        "{} ingredients normalized, {} skipped: {} rescaled to ideal, {} clamped to max, {} clamped to min",
        report.ingredients_normalized,
        report.skipped,
        report.count(Correction::RescaledToIdeal),
        report.count(Correction::ClampedToMax),
        report.count(Correction::ClampedToMin)
    );
    if args.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
