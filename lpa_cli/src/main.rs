use clap::{Parser, Subcommand};
use lpa_core::*;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lpa")]
#[command(about = "Lp(a) kit conversion to IFCC-harmonized nmol/L with risk classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered kits and their coefficients
    Kits,

    /// Convert a kit reading to harmonized nmol/L and classify it
    Convert {
        /// Kit name (see `lpa kits`)
        #[arg(long)]
        kit: String,

        /// Value in the kit's reporting unit
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Estimate what kits would report for a harmonized nmol/L value
    Reverse {
        /// Harmonized value in nmol/L
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Only this kit (default: all kits)
        #[arg(long)]
        kit: Option<String>,
    },

    /// Classify a harmonized nmol/L value
    Classify {
        /// Harmonized value in nmol/L
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Assess a CSV of `kit,value` rows, writing results to stdout
    Batch {
        /// Input CSV (default: stdin)
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    lpa_core::logging::init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!("Loaded {} kit override(s)", config.kits.len());
    let model = config.build_model()?;
    let classifier = config.build_classifier()?;

    match cli.command {
        Commands::Kits => cmd_kits(&model, cli.json),
        Commands::Convert { kit, value } => cmd_convert(&model, &classifier, &kit, value, cli.json),
        Commands::Reverse { value, kit } => {
            cmd_reverse(&model, &classifier, value, kit.as_deref(), cli.json)
        }
        Commands::Classify { value } => cmd_classify(&classifier, value, cli.json),
        Commands::Batch { input } => cmd_batch(&model, &classifier, input),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_kits(model: &ConversionModel, json: bool) -> Result<()> {
    if json {
        let kits: Vec<_> = model.registry().iter().collect();
        return print_json(&kits);
    }

    println!("{:<12} {:>7} {:>7}  input", "kit", "slope", "icpt");
    for kit in model.registry().iter() {
        println!(
            "{:<12} {:>7.2} {:>7.2}  {}",
            kit.name, kit.slope, kit.intercept, kit.input_unit
        );
    }
    Ok(())
}

fn cmd_convert(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    kit: &str,
    value: f64,
    json: bool,
) -> Result<()> {
    let value = ensure_non_negative(value)?;
    let assessment = assess(model, classifier, kit, value)?;

    if json {
        return print_json(&assessment);
    }

    let conversion = &assessment.conversion;
    println!();
    println!(
        "  {} {:.2} {}",
        conversion.kit.name, conversion.original, conversion.kit.input_unit
    );
    println!("  → IFCC-harmonized: {:.2} nmol/L", conversion.harmonized);
    println!("  → Risk: {}", assessment.risk.label);
    println!();

    match assessment.legacy {
        Some(ref legacy) => {
            println!(
                "  Legacy (×{}): {:.2} nmol/L ({})",
                model.legacy_multiplier(),
                legacy.estimate,
                legacy.comparison.secondary.label
            );
            if legacy.comparison.is_underestimated {
                println!(
                    "  ⚠ Legacy estimate under-classifies risk: {} vs {}",
                    legacy.comparison.secondary.label, legacy.comparison.primary.label
                );
            }
        }
        None => {
            println!(
                "  Legacy comparison not applicable: {} reports in {}",
                conversion.kit.name, conversion.kit.input_unit
            );
        }
    }
    println!();

    Ok(())
}

#[derive(serde::Serialize)]
struct ReverseOutput {
    harmonized: f64,
    risk: RiskAssessment,
    estimates: Vec<ConversionResult>,
    generic_mass_estimate: f64,
}

fn cmd_reverse(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    value: f64,
    kit: Option<&str>,
    json: bool,
) -> Result<()> {
    let value = ensure_non_negative(value)?;
    let estimates = match kit {
        Some(name) => vec![model.inverse(name, value)?],
        None => model.estimate_all_kits(value)?,
    };
    let output = ReverseOutput {
        harmonized: value,
        risk: classifier.classify(value),
        estimates,
        generic_mass_estimate: model.generic_mass_estimate(value)?,
    };

    if json {
        return print_json(&output);
    }

    println!();
    println!("  {:.2} nmol/L ({})", output.harmonized, output.risk.label);
    println!();
    for estimate in &output.estimates {
        println!(
            "  {:<12} {:>9.2} {}",
            estimate.kit.name, estimate.original, estimate.kit.input_unit
        );
    }
    println!();
    println!(
        "  Approximate (1 mg/dL ≈ {} nmol/L): {:.2} mg/dL",
        model.generic_mass_factor(),
        output.generic_mass_estimate
    );
    println!();

    Ok(())
}

fn cmd_classify(classifier: &RiskClassifier, value: f64, json: bool) -> Result<()> {
    let value = ensure_non_negative(value)?;
    let risk = classifier.classify(value);

    if json {
        return print_json(&risk);
    }

    println!("{} (band {})", risk.label, risk.band_index);
    Ok(())
}

fn cmd_batch(
    model: &ConversionModel,
    classifier: &RiskClassifier,
    input: Option<PathBuf>,
) -> Result<()> {
    let stdout = io::stdout().lock();
    let summary = match input {
        Some(path) => assess_csv(model, classifier, File::open(&path)?, stdout)?,
        None => assess_csv(model, classifier, io::stdin().lock(), stdout)?,
    };

    eprintln!(
        "✓ {} rows ({} failed, {} under-classified by legacy)",
        summary.processed, summary.failed, summary.underestimated
    );
    Ok(())
}
