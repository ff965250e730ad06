//! csv-organize CLI - categorize and merge CSV files
//!
//! # Main Commands
//!
//! ```bash
//! csv-organize organize -c organizer.yaml checking.csv card.csv   # Organize into one table
//! csv-organize organize -c organizer.yaml *.csv -f json -o out.json
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! csv-organize parse checking.csv           # Dump parsed rows as JSON
//! csv-organize check-config organizer.yaml  # Validate a configuration
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use csv_organizer::organize::pipeline::format_delimiter;
use csv_organizer::{
    load_config, organize_files, parse_csv_file, render_csv, render_json, OrganizeError,
    OutputError, ParseOptions,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "csv-organize")]
#[command(about = "Categorize rows of CSV files and merge them into one table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize, merge and sort the rows of one or more CSV files
    Organize {
        /// Configuration file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Input CSV files, merged in the order given
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Input delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and output its rows as JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load and validate a configuration file
    CheckConfig {
        /// Configuration file
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csv_organizer=info,csv_organize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Organize {
            config,
            inputs,
            delimiter,
            format,
            output,
        } => cmd_organize(&config, &inputs, delimiter, format, output.as_deref()),

        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()),

        Commands::CheckConfig { config } => cmd_check_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_options(delimiter: Option<char>) -> ParseOptions {
    ParseOptions { delimiter }
}

fn cmd_organize(
    config_path: &Path,
    inputs: &[PathBuf],
    delimiter: Option<char>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), OrganizeError> {
    let config = load_config(config_path)?;
    info!(
        "loaded config {} ({} columns, {} rules)",
        config_path.display(),
        config.aliases().len(),
        config.rules().len()
    );

    let batch = organize_files(inputs, &config, &parse_options(delimiter))?;
    for category in &batch.categories {
        info!("{}: {} rows", category.category, category.rows.len());
    }

    let rendered = match format {
        OutputFormat::Csv => {
            let columns: Vec<&str> = config.aliases().canonical_names().collect();
            render_csv(&columns, &batch.categories, b',')?
        }
        OutputFormat::Json => render_json(&batch.categories)?,
    };
    write_output(&rendered, output)
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), OrganizeError> {
    let result =
        parse_csv_file(input, &parse_options(delimiter)).map_err(|source| OrganizeError::Source {
            path: input.to_path_buf(),
            source,
        })?;

    eprintln!("Parsing CSV: {}", input.display());
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("   Parsed {} rows", result.rows.len());

    let json = serde_json::to_string_pretty(&result.rows).map_err(OutputError::from)?;
    write_output(&json, output)
}

fn cmd_check_config(config_path: &Path) -> Result<(), OrganizeError> {
    let config = load_config(config_path)?;

    println!("Configuration: {}", config_path.display());
    println!("Columns:");
    for (name, aliases) in config.aliases().iter() {
        if aliases.is_empty() {
            println!("  {}", name);
        } else {
            println!("  {} (aliases: {})", name, aliases.join(", "));
        }
    }
    println!("Categories (output order):");
    for category in config.category_order() {
        if category == config.default_category() {
            println!("  {} (default)", category);
        } else {
            println!("  {}", category);
        }
    }
    println!("Rules:");
    for rule in config.rules() {
        println!("  {} <- {} ~ [{}]", rule.category, rule.column, rule.regexes.join(", "));
    }
    for column in config.transformers().keys() {
        println!("Date transformer on: {}", column);
    }
    match config.sort_column() {
        Some(column) => println!("Sort: {} {}", column, config.sort_type()),
        None => println!("Sort: none (input order)"),
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), OrganizeError> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
            if !content.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
