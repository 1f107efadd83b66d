//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use epubdok_ast::Node;
use epubdok_core::diagnostics::Diagnostic;
use epubdok_core::{ConversionConfig, EpubConverter};
use epubdok_validate::ValidationEngine;

/// Name of the configuration file picked up next to the input
pub const CONFIG_FILENAME: &str = "epubdok.toml";

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "epubdok")]
#[command(author, version, about = "Document trees to multi-file EPUB", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document tree into chapter files and navigation documents
    Convert {
        /// Input document tree (JSON)
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Configuration file (defaults to epubdok.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Deepest section level that starts a new chapter file
        #[arg(long)]
        chapter_level: Option<u8>,

        /// Section levels listed in the table of contents
        #[arg(long)]
        toc_levels: Option<u8>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check a document tree for issues without writing files
    Check {
        /// Input document tree (JSON)
        input: PathBuf,

        /// Configuration file (defaults to epubdok.toml next to the input)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Options for the convert command
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub chapter_level: Option<u8>,
    pub toc_levels: Option<u8>,
}

impl ConvertOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            config: None,
            chapter_level: None,
            toc_levels: None,
        }
    }

    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    pub fn with_chapter_level(mut self, level: u8) -> Self {
        self.chapter_level = Some(level);
        self
    }

    pub fn with_toc_levels(mut self, levels: u8) -> Self {
        self.toc_levels = Some(levels);
        self
    }
}

/// Result of a conversion run
#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub title: String,
    /// Chapter file names in spine order
    pub spine: Vec<String>,
    /// Every file written, navigation documents included
    pub files: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Result of a check run
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub input: PathBuf,
    /// Chapter file names the document would produce
    pub spine: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let has_errors = match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            chapter_level,
            toc_levels,
            format,
        } => {
            let options = ConvertOptions {
                output,
                config,
                chapter_level,
                toc_levels,
            };
            let report = convert_command(&input, &options)?;
            print_convert_report(&input, &report, format)?;
            report.has_errors()
        }
        Commands::Check {
            input,
            config,
            format,
        } => {
            let report = check_command(&input, config.as_deref())?;
            print_check_report(&report, format)?;
            report.has_errors()
        }
    };

    // Exit with error code if there are errors
    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

/// Read a document tree from a JSON file
pub fn load_document(input: &Path) -> Result<Node> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let document: Node = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document tree: {}", input.display()))?;

    if !document.is_document() {
        anyhow::bail!(
            "Input root must be a document node: {}",
            input.display()
        );
    }
    Ok(document)
}

/// Load conversion settings
///
/// An explicit path must exist. Without one, `epubdok.toml` next to the
/// input is used when present, otherwise the defaults.
pub fn load_config(input: &Path, explicit: Option<&Path>) -> Result<ConversionConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let candidate = input
                .parent()
                .unwrap_or(Path::new("."))
                .join(CONFIG_FILENAME);
            if !candidate.exists() {
                return Ok(ConversionConfig::default());
            }
            candidate
        }
    };

    info!(path = %path.display(), "loading config");
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    ConversionConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Validate and convert a document
fn run_pipeline(
    document: &mut Node,
    config: ConversionConfig,
) -> Result<(Vec<Diagnostic>, epubdok_core::Publication)> {
    let mut diagnostics = ValidationEngine::with_defaults().validate(document);

    let publication = EpubConverter::new(config)
        .convert(document)
        .context("Failed to convert document")?;
    diagnostics.extend(publication.diagnostics.iter().cloned());

    Ok((diagnostics, publication))
}

/// Execute the convert command
pub fn convert_command(input: &Path, options: &ConvertOptions) -> Result<ConvertReport> {
    let mut document = load_document(input)?;

    let mut config = load_config(input, options.config.as_deref())?;
    if let Some(level) = options.chapter_level {
        config.chapter_level = level;
    }
    if let Some(levels) = options.toc_levels {
        config.toc_levels = levels;
    }

    let (diagnostics, publication) = run_pipeline(&mut document, config)?;

    let files = publication.write_to(&options.output).with_context(|| {
        format!(
            "Failed to write output directory: {}",
            options.output.display()
        )
    })?;
    info!(
        files = files.len(),
        output = %options.output.display(),
        "conversion written"
    );

    Ok(ConvertReport {
        title: publication.title.clone(),
        spine: publication.spine().into_iter().map(String::from).collect(),
        files,
        diagnostics,
    })
}

/// Execute the check command
pub fn check_command(input: &Path, config: Option<&Path>) -> Result<CheckReport> {
    let mut document = load_document(input)?;
    let config = load_config(input, config)?;

    let (diagnostics, publication) = run_pipeline(&mut document, config)?;

    Ok(CheckReport {
        input: input.to_path_buf(),
        spine: publication.spine().into_iter().map(String::from).collect(),
        diagnostics,
    })
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        println!("{}", diag);
        println!();
    }
    let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
    let warning_count = diagnostics.iter().filter(|d| d.is_warning()).count();
    println!(
        "Found {} error(s) and {} warning(s)",
        error_count, warning_count
    );
}

fn print_convert_report(input: &Path, report: &ConvertReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("epubdok v{}", epubdok_core::VERSION);
            println!("Converting: {}", input.display());
            for file in &report.files {
                println!("  Created: {}", file.display());
            }
            if !report.diagnostics.is_empty() {
                println!();
                print_diagnostics(&report.diagnostics);
            }
            println!();
            println!("Conversion complete!");
            println!("  {} chapter file(s)", report.spine.len());
        }
    }
    Ok(())
}

fn print_check_report(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .context("Failed to serialize report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if report.diagnostics.is_empty() {
                println!(
                    "✓ No issues found in {} ({} chapter(s))",
                    report.input.display(),
                    report.spine.len()
                );
            } else {
                print_diagnostics(&report.diagnostics);
            }
        }
    }
    Ok(())
}
