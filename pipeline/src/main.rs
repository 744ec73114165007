//! Surveytree CLI - turn developer survey exports into chart data
//!
//! # Pipeline Commands
//!
//! ```bash
//! surveytree tools survey.csv -t d3_data.json -o d3_data.csv
//! surveytree circular-pack survey.csv -t circular_packing_chart.json
//! surveytree chord survey.csv -o chord_data.csv
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! surveytree parse survey.csv          # Just parse CSV to JSON records
//! surveytree validate tree.json        # Validate a tree document
//! surveytree schema circular-pack      # Show a built-in survey schema
//! ```
//!
//! Logs go to stderr; set `SURVEYTREE_LOG=quiet|text|json` (or use a `.env`
//! file) to change their format.

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use surveytree::logs::{LogFormat, LOGGER};
use surveytree::{
    parse_csv_file_auto, run_file, validate_tree, PipelineConfig, PipelineOutput, Variant,
};

#[derive(Parser)]
#[command(name = "surveytree")]
#[command(about = "Turn developer survey CSV exports into tree and chord chart data", long_about = None)]
struct Cli {
    /// Silence progress logs
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Industry → role → category → tool tree with occurrence counts
    Tools(RunArgs),

    /// Tool tree with salary, satisfaction and sentiment tooltips
    CircularPack(RunArgs),

    /// AI tool have/want connection counts by respondent type
    Chord(RunArgs),

    /// Parse a CSV file and output JSON records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a tree document against the tree schema
    Validate {
        /// Input JSON file
        input: PathBuf,
    },

    /// Show the built-in schema of a variant
    Schema {
        #[arg(value_parser = ["tools", "circular-pack", "chord"])]
        variant: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input CSV file
    input: PathBuf,

    /// Output CSV file (chord: default stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output tree JSON file (default: stdout)
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Separator between values of a list cell
    #[arg(long)]
    list_delimiter: Option<String>,

    /// Sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows kept by the sampling stage
    #[arg(long)]
    sample_fraction: Option<f64>,

    /// Skip tree validation
    #[arg(long)]
    no_validate: bool,
}

impl RunArgs {
    fn config(&self) -> Result<PipelineConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(delimiter) = &self.list_delimiter {
            config.list_delimiter = delimiter.clone();
        }
        if let Some(seed) = self.seed {
            config.sample_seed = seed;
        }
        if let Some(fraction) = self.sample_fraction {
            config.sample_fraction = fraction;
        }
        if self.no_validate {
            config.validate_tree = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if cli.quiet {
        LOGGER.set_format(LogFormat::Quiet);
    }

    let result = match cli.command {
        Commands::Tools(args) => cmd_run(Variant::Tools, &args),
        Commands::CircularPack(args) => cmd_run(Variant::CircularPack, &args),
        Commands::Chord(args) => cmd_run(Variant::Chord, &args),
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Schema { variant } => cmd_schema(&variant),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("   caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn cmd_run(variant: Variant, args: &RunArgs) -> Result<(), Box<dyn Error>> {
    eprintln!("🚀 Running '{}' on {}", variant, args.input.display());

    let config = args.config()?;
    let output = run_file(&args.input, variant, &config)?;
    print_stages(&output);

    output.write_outputs(args.output.as_deref(), args.tree.as_deref())?;

    // Whatever has no destination goes to stdout
    if variant.emits_tree() {
        if args.tree.is_none() {
            if let Some(json) = output.tree_json()? {
                println!("{}", json);
            }
        }
    } else if args.output.is_none() {
        output.write_csv(io::stdout().lock())?;
    }

    Ok(())
}

fn print_stages(output: &PipelineOutput) {
    eprintln!("📋 Stages:");
    for stage in &output.stages {
        eprintln!(
            "   {:<10} {:>8} → {:>8} rows",
            stage.stage, stage.rows_in, stage.rows_out
        );
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let content = fs::read_to_string(input)?;
    let tree: Value = serde_json::from_str(&content)?;

    match validate_tree(&tree) {
        Ok(()) => {
            eprintln!("✅ Tree document is valid");
            Ok(())
        }
        Err(errors) => {
            eprintln!("❌ {} error(s):", errors.len());
            for err in errors.iter().take(10) {
                eprintln!("   - {}", err);
            }
            Err(format!("{} is not a valid tree document", input.display()).into())
        }
    }
}

fn cmd_schema(variant: &str) -> Result<(), Box<dyn Error>> {
    let variant: Variant = variant.parse()?;
    println!("{}", variant.schema().to_json()?);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
