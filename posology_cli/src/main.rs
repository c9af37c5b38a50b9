use clap::{Parser, Subcommand};
use posology_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "posology")]
#[command(about = "Drug dosing rule resolution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override the formulary records directory
    #[arg(long, global = true)]
    records_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the dose for a patient profile
    Resolve {
        /// Drug name (case-insensitive)
        #[arg(long)]
        drug: String,

        /// Patient age
        #[arg(long)]
        age: f64,

        /// Age unit (months, years); defaults from config
        #[arg(long)]
        age_unit: Option<String>,

        /// Patient weight in kilograms
        #[arg(long)]
        weight: f64,
    },

    /// Show a drug's instructions and bracket table
    Show {
        /// Drug name (case-insensitive)
        #[arg(long)]
        drug: String,
    },

    /// Validate a drug record file
    Check {
        /// Path to a JSON drug record
        file: PathBuf,
    },

    /// Validate a drug record file and install it into the formulary
    Add {
        /// Path to a JSON drug record
        file: PathBuf,
    },

    /// Export a drug's bracket table to CSV
    Export {
        /// Drug name (case-insensitive)
        #[arg(long)]
        drug: String,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() {
    // Initialize logging
    posology_core::logging::init();

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine records directory
    let config = Config::load()?;
    let records_dir = cli
        .records_dir
        .unwrap_or_else(|| config.data.records_dir.clone());
    tracing::debug!("using records directory {:?}", records_dir);

    match cli.command {
        Commands::Resolve {
            drug,
            age,
            age_unit,
            weight,
        } => cmd_resolve(&records_dir, &drug, age, age_unit, weight, &config),
        Commands::Show { drug } => cmd_show(&records_dir, &drug),
        Commands::Check { file } => cmd_check(&file),
        Commands::Add { file } => cmd_add(&records_dir, &file),
        Commands::Export { drug, out } => cmd_export(&records_dir, &drug, &out),
    }
}

fn load_formulary(records_dir: &Path) -> Result<Formulary> {
    let formulary = Formulary::load(records_dir)?;
    for finding in formulary.validate() {
        eprintln!("warning: {}", finding);
    }
    Ok(formulary)
}

fn lookup<'a>(formulary: &'a Formulary, name: &str) -> Result<&'a Drug> {
    formulary.get(name).ok_or_else(|| Error::DrugNotFound {
        name: name.to_string(),
    })
}

fn cmd_resolve(
    records_dir: &Path,
    drug_name: &str,
    age: f64,
    age_unit: Option<String>,
    weight: f64,
    config: &Config,
) -> Result<()> {
    let unit = match age_unit {
        Some(s) => s.parse::<AgeUnit>()?,
        None => config.query.default_age_unit,
    };

    let formulary = load_formulary(records_dir)?;
    let drug = lookup(&formulary, drug_name)?;
    let dose = drug.resolve_dose(age, unit, weight)?;

    println!();
    println!("  {}, age {} {}, weight {} kg", drug.name(), age, unit, weight);
    println!("  → {}", dose);

    if !drug.schedule().instructions().is_empty() {
        println!();
        for instruction in drug.schedule().instructions() {
            println!("  ℹ {}", instruction);
        }
    }
    println!();

    Ok(())
}

fn cmd_show(records_dir: &Path, drug_name: &str) -> Result<()> {
    let formulary = load_formulary(records_dir)?;
    let drug = lookup(&formulary, drug_name)?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", drug.name().value().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Identification: {}", drug.identification_code());

    if !drug.indications().is_empty() {
        println!();
        println!("  Indications:");
        for indication in drug.indications() {
            println!(
                "    {}  {}",
                indication.code().value(),
                indication.condition().value()
            );
            println!("        {}", indication.description());
            if let Some(limitations) = indication.limitations() {
                println!("        Limitations: {}", limitations);
            }
        }
    }

    if !drug.schedule().instructions().is_empty() {
        println!();
        println!("  Instructions:");
        for instruction in drug.schedule().instructions() {
            println!("    - {}", instruction);
        }
    }

    println!();
    println!("  Brackets:");
    for bracket in drug.schedule().age_groups().brackets() {
        println!("    {}", bracket.age_range());
        for (range, dose) in bracket.weight_doses() {
            println!("      → {}: {}", range, dose);
        }
    }
    println!();

    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let drug = read_record(file)?;
    println!("✓ {} is a valid record for {}", file.display(), drug.name());
    Ok(())
}

fn cmd_add(records_dir: &Path, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let record: DrugRecord = serde_json::from_str(&contents)?;
    let path = add_record(records_dir, &record)?;

    println!("✓ Installed {} into the formulary", record.name);
    println!("  Record: {}", path.display());
    Ok(())
}

fn cmd_export(records_dir: &Path, drug_name: &str, out: &Path) -> Result<()> {
    let formulary = load_formulary(records_dir)?;
    let drug = lookup(&formulary, drug_name)?;

    let rows = write_schedule_csv(drug, out)?;

    println!("✓ Exported {} bracket rows", rows);
    println!("  CSV: {}", out.display());
    Ok(())
}
