//! # tsbridge
//!
//! CLI tool for generating TypeScript declarations from a tagged type graph.
//!
//! ## Usage
//!
//! ```bash
//! # Generate declarations with the settings of ./tsbridge.toml
//! tsbridge generate --graph graph.json
//!
//! # Write to a specific file
//! tsbridge generate --graph graph.json --output web/src/api.ts
//!
//! # Dry run to preview changes
//! tsbridge generate --graph graph.json --dry-run
//!
//! # Leave unexported definitions and fields out
//! tsbridge generate --graph graph.json --exclude-unexported
//!
//! # Initialize configuration
//! tsbridge init
//!
//! # Check that generated declarations are up-to-date
//! tsbridge check --graph graph.json --path web/src/api.ts
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tsbridge::Diagnostic;
use tsbridge_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    generator::Generator,
    loader::GraphLoader,
    writer::{self, FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "tsbridge")]
#[command(
    author,
    version,
    about = "Generate TypeScript declarations from tagged type graphs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript declarations from a type graph
    Generate {
        /// Type graph JSON file
        #[arg(short, long)]
        graph: PathBuf,

        /// Output file for generated declarations
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Omit JSDoc comments
        #[arg(long)]
        no_docs: bool,

        /// Skip unexported definitions and fields
        #[arg(long)]
        exclude_unexported: bool,
    },

    /// Initialize a new tsbridge configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "tsbridge.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Check that generated declarations are up-to-date
    Check {
        /// Type graph JSON file
        #[arg(short, long)]
        graph: PathBuf,

        /// Path to the generated declarations file
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            graph,
            output,
            config,
            dry_run,
            no_docs,
            exclude_unexported,
        } => {
            let args = CliArgs {
                output,
                docs: no_docs.then_some(false),
                include_unexported: exclude_unexported.then_some(false),
            };
            cmd_generate(graph, config, &args, dry_run)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Check {
            graph,
            path,
            config,
        } => cmd_check(graph, path, config),
    }
}

/// Generate command implementation.
fn cmd_generate(
    graph_path: PathBuf,
    config_path: Option<PathBuf>,
    args: &CliArgs,
    dry_run: bool,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, args);

    println!("{}", "Loading type graph...".cyan());
    let graph = GraphLoader::new(&graph_path).load()?;
    println!("  Found {} definition(s)", graph.len().to_string().green());

    println!("{}", "Generating declarations...".cyan());
    let output = Generator::new(config.clone()).generate(&graph)?;
    print_diagnostics(&output.diagnostics);
    println!(
        "  Generated {} declaration(s) from {} group(s)",
        output.declarations.to_string().green(),
        output.groups
    );

    let writer = FileWriter::new(dry_run);
    match writer.write(&config.output.path, &output.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::Unchanged { path } => {
            println!("{} {} is unchanged", "✓".green(), path.display());
        }
        WriteResult::DryRun { path, content } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        println!("  Use --force to overwrite");
        return Err(CliError::Validation(format!(
            "Configuration file already exists: {}",
            output.display()
        )));
    }

    std::fs::write(&output, ConfigManager::default_config_content())?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Check command implementation.
fn cmd_check(
    graph_path: PathBuf,
    output_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    println!("{}", "Checking declarations...".cyan());

    let config: Config = ConfigManager::load(config_path.as_deref())?;
    let path = output_path.unwrap_or_else(|| config.output.path.clone());
    if !path.exists() {
        return Err(CliError::Validation(format!(
            "Declarations file not found: {}",
            path.display()
        )));
    }

    let graph = GraphLoader::new(&graph_path).load()?;
    let output = Generator::new(config).generate(&graph)?;
    print_diagnostics(&output.diagnostics);

    if writer::is_up_to_date(&path, &output.content)? {
        println!("{} Declarations are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Declarations are out of date", "✗".red());
        println!("  Run 'tsbridge generate' to update");
        Err(CliError::Validation(format!("{} is out of date", path.display())))
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!(
        "{} {} diagnostic(s):",
        "Warning:".yellow(),
        diagnostics.len()
    );
    for diagnostic in diagnostics {
        println!("  {} {}", diagnostic.kind.label().yellow(), diagnostic);
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
