//! sqlc-gen-fixture CLI - resolve a sqlc catalog into fixture entity models.

use clap::{Parser, Subcommand};
use sqlc_gen_fixture::{generate, GenError, Generation, Options, Request};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "sqlc-gen-fixture")]
#[command(about = "Resolve a sqlc catalog into fixture entity models")]
#[command(version)]
struct Cli {
    /// Path to the request file (JSON, or YAML by extension)
    #[arg(short, long, default_value = "request.json")]
    request: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every table and print the entity models
    Resolve {
        /// Also print tables without a primary key
        #[arg(long)]
        all: bool,

        /// Exit with an error when any column falls back to interface{}
        #[arg(long)]
        strict: bool,
    },

    /// Parse and validate the options documents only
    Validate,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), GenError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let request = Request::load(&cli.request)?;
    info!("Loaded request from {:?}", cli.request);

    match cli.command {
        Commands::Resolve { all, strict } => {
            let generation = generate(&request)?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&generation)?);
            } else {
                print_generation(&generation, all);
            }

            if strict && !generation.diagnostics.is_empty() {
                return Err(GenError::config(format!(
                    "{} column(s) could not be resolved",
                    generation.diagnostics.len()
                )));
            }
        }

        Commands::Validate => {
            let options = Options::from_request(&request)?;
            if cli.output_json {
                println!(
                    "{}",
                    serde_json::json!({
                        "engine": options.engine,
                        "package": options.package,
                        "driver": options.driver,
                        "default_schema": options.default_schema,
                        "overrides": options.overrides.len(),
                    })
                );
            } else {
                println!("Options are valid");
                println!("  Engine: {}", options.engine);
                println!("  Package: {}", options.package);
                println!("  Driver: {}", options.driver);
                println!("  Default schema: {:?}", options.default_schema);
                println!("  Overrides: {}", options.overrides.len());
            }
        }
    }

    Ok(())
}

fn print_generation(generation: &Generation, all: bool) {
    println!("package {} ({})", generation.package, generation.driver);

    for model in &generation.structs {
        if !all && !model.is_renderable() {
            continue;
        }
        println!();
        let marker = if model.is_renderable() { "" } else { " (no primary key)" };
        println!("{} <- {}{}", model.target(), model.full_table_name(), marker);

        let width = model
            .fields()
            .iter()
            .map(|field| field.name().len())
            .max()
            .unwrap_or(0);
        for field in model.fields() {
            let pk = if field.is_primary_key() { "  [pk]" } else { "" };
            println!(
                "  {:width$}  {}{}",
                field.name(),
                field.target(),
                pk,
                width = width
            );
        }

        let imports = generation.imports_for(model);
        if !imports.is_empty() {
            println!("  imports:");
            for import in imports {
                println!("    {}", import.format());
            }
        }
    }

    if !generation.diagnostics.is_empty() {
        println!();
        println!("Diagnostics: {}", generation.diagnostics.len());
        for diagnostic in generation.diagnostics.iter() {
            println!(
                "  {}.{}: {}",
                diagnostic.table, diagnostic.column, diagnostic.message
            );
        }
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
