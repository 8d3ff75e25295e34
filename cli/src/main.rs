//! usx CLI - USFM marker tree to USX rendering tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use usx::{
    load_file, render_batch, Document, MarkerKind, RenderResult, RenderStats, SchemaVersion,
    UsxConfig,
};

#[derive(Parser)]
#[command(name = "usx")]
#[command(version)]
#[command(about = "Render parsed USFM marker trees to USX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one marker tree to USX
    Render {
        /// Input marker tree (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Omit the XML declaration and the usx root element
        #[arg(short, long)]
        partial: bool,

        /// USX schema version
        #[arg(long, value_enum, default_value = "3.0", env = "USX_SCHEMA")]
        schema: Schema,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Render many marker trees in parallel
    Batch {
        /// Input marker trees (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// USX schema version
        #[arg(long, value_enum, default_value = "3.0", env = "USX_SCHEMA")]
        schema: Schema,

        /// Print combined rendering statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Show document information
    Info {
        /// Input marker tree (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Schema {
    /// USX 2.5, plain chapter and verse tags
    #[value(name = "2.5")]
    V25,
    /// USX 3.0, sid/eid milestones (default)
    #[value(name = "3.0")]
    V30,
}

impl From<Schema> for SchemaVersion {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::V25 => SchemaVersion::V2_5,
            Schema::V30 => SchemaVersion::V3_0,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            partial,
            schema,
            stats,
        } => cmd_render(&input, output.as_deref(), partial, schema, stats),
        Commands::Batch {
            inputs,
            output,
            schema,
            stats,
        } => cmd_batch(&inputs, &output, schema, stats),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    partial: bool,
    schema: Schema,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = UsxConfig::new()
        .with_partial_output(partial)
        .with_schema_version(schema.into())
        .with_stats(stats);
    log::debug!("rendering {} with {:?}", input.display(), config);

    let result = usx::render_file(input, &config)?;

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!(
            "{} {} ({} bytes)",
            "Saved to".green(),
            path.display(),
            result.content_len()
        );
    } else {
        print!("{}", result.content);
    }

    warn_unrenderable(input, &result);

    if let Some(stats) = result.stats {
        print_stats(&stats);
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output_dir: &Path,
    schema: Schema,
    stats: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut docs: Vec<Document> = Vec::with_capacity(inputs.len());
    for input in inputs {
        pb.set_message(format!("Loading {}...", input.display()));
        docs.push(load_file(input)?);
        pb.inc(1);
    }

    pb.set_message("Rendering...");
    let config = UsxConfig::new()
        .with_schema_version(schema.into())
        .with_stats(stats);
    log::debug!("rendering {} documents with {:?}", docs.len(), config);
    let results = render_batch(&docs, &config);
    pb.inc(1);
    pb.finish_with_message("Done!");

    let mut failed = 0;
    let mut total = RenderStats::new();
    println!("\n{}", "Output files:".green().bold());
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(result) => {
                let path = output_path(input, output_dir);
                fs::write(&path, &result.content)?;
                println!(
                    "  {} {} ({} bytes)",
                    "├─".dimmed(),
                    path.display(),
                    result.content_len()
                );
                warn_unrenderable(input, &result);
                if let Some(doc_stats) = &result.stats {
                    total.merge(doc_stats);
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {} {}: {}", "Failed".red(), input.display(), e);
            }
        }
    }

    if stats {
        print_stats(&total);
    }

    if failed > 0 {
        return Err(format!("{} of {} documents failed to render", failed, inputs.len()).into());
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("reading document information from {}", input.display());
    let doc = load_file(input)?;
    let result = usx::render(&doc, &UsxConfig::new().with_stats(true))?;

    let book = doc.book_identifier().map(|id| id.chars().take(3).collect::<String>());
    let chapters = doc.count_markers(|kind| matches!(kind, MarkerKind::C { .. }));
    let verses = doc.count_markers(|kind| matches!(kind, MarkerKind::V { .. }));
    let words = result.stats.map(|s| s.word_count).unwrap_or(0);

    if json {
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "book": book,
            "encoding": doc.encoding(),
            "chapters": chapters,
            "verses": verses,
            "words": words,
            "unrenderable_tags": result.unrenderable_tags,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Book".bold(), book.as_deref().unwrap_or("(none)"));
    println!(
        "{}: {}",
        "Encoding".bold(),
        doc.encoding().unwrap_or("(not declared)")
    );
    println!("{}: {}", "Chapters".bold(), chapters);
    println!("{}: {}", "Verses".bold(), verses);
    println!("{}: {}", "Words".bold(), words);

    if !result.unrenderable_tags.is_empty() {
        println!(
            "{}: {}",
            "Unrenderable".bold(),
            format_tags(&result.unrenderable_tags).yellow()
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "usx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("USFM marker tree to USX renderer");
    println!();
    println!("Schemas: USX 2.5, USX 3.0");
    println!("License: MIT");
}

fn print_stats(stats: &RenderStats) {
    eprintln!("{}", "Render Statistics".cyan().bold());
    eprintln!("{}", "─".repeat(40).dimmed());
    eprintln!("{}: {}", "Books".bold(), stats.book_count);
    eprintln!("{}: {}", "Chapters".bold(), stats.chapter_count);
    eprintln!("{}: {}", "Verses".bold(), stats.verse_count);
    eprintln!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    eprintln!("{}: {}", "Notes".bold(), stats.note_count);
    eprintln!("{}: {}", "Tables".bold(), stats.table_count);
    eprintln!("{}: {}", "Words".bold(), stats.word_count);
    eprintln!("{}: {}", "Skipped markers".bold(), stats.unrenderable_count);
}

fn warn_unrenderable(input: &Path, result: &RenderResult) {
    if result.is_complete() {
        return;
    }
    eprintln!(
        "{} {}: no USX rendering for {}",
        "Warning".yellow().bold(),
        input.display(),
        format_tags(&result.unrenderable_tags)
    );
}

fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("\\{}", tag))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `<dir>/<input stem>.usx`
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.usx", stem))
}
