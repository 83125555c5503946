//! pdfstruct CLI - structured PDF content extraction tool

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfstruct::config::{
    ENV_HEADING_THRESHOLD, ENV_MAX_FILE_SIZE, ENV_TEXT_LAYER_THRESHOLD, ENV_TITLE_THRESHOLD,
};
use pdfstruct::parser::{OPTION_INCLUDE_IMAGES, OPTION_OUTPUT_FORMAT, OPTION_PAGES, OPTION_PARALLEL};
use pdfstruct::service::OPTION_CHAR_THRESHOLD;
use pdfstruct::{
    Error, ExtractionConfig, ExtractionStats, Extractor, JsonDocumentLoader, PageSelection, Result,
    Service, TextLayerResult,
};

#[derive(Parser)]
#[command(name = "pdfstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract paragraphs, tables, and images from PDF page dumps", long_about = None)]
struct Cli {
    /// Font size at or above which a paragraph is a title
    #[arg(long, global = true, env = ENV_TITLE_THRESHOLD)]
    title_threshold: Option<f32>,

    /// Font size at or above which a paragraph is a section heading
    #[arg(long, global = true, env = ENV_HEADING_THRESHOLD)]
    heading_threshold: Option<f32>,

    /// Minimum characters for a page to count as having text
    #[arg(long, global = true, env = ENV_TEXT_LAYER_THRESHOLD)]
    text_threshold: Option<usize>,

    /// Maximum input size in megabytes
    #[arg(long, global = true, env = ENV_MAX_FILE_SIZE)]
    max_size_mb: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract structured content as JSON or HTML
    Extract {
        /// Input page dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Render HTML instead of JSON
        #[arg(long)]
        html: bool,

        /// Embed image payloads
        #[arg(long)]
        images: bool,

        /// Analyze pages in parallel
        #[arg(long)]
        parallel: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Report which pages carry a text layer
    Detect {
        /// Input page dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Override the character threshold for this run
        #[arg(long)]
        threshold: Option<usize>,

        /// Print the raw JSON report
        #[arg(long)]
        json: bool,
    },

    /// Show content statistics, totalled over every input
    Info {
        /// Input page dumps (JSON)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Write embedded images to a directory
    Images {
        /// Input page dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show service health and supported operations
    Health,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = build_config(&cli).and_then(|config| match cli.command {
        Commands::Extract {
            input,
            output,
            pages,
            html,
            images,
            parallel,
            pretty,
        } => {
            let mut options = HashMap::new();
            if let Some(pages) = pages {
                options.insert(OPTION_PAGES.to_string(), pages);
            }
            let format = if html { "html" } else { "json" };
            options.insert(OPTION_OUTPUT_FORMAT.to_string(), format.to_string());
            options.insert(OPTION_INCLUDE_IMAGES.to_string(), images.to_string());
            options.insert(OPTION_PARALLEL.to_string(), parallel.to_string());
            cmd_extract(config, &input, output.as_deref(), &options, pretty)
        }
        Commands::Detect {
            input,
            threshold,
            json,
        } => cmd_detect(config, &input, threshold, json),
        Commands::Info { inputs } => cmd_info(config, &inputs),
        Commands::Images {
            input,
            output,
            pages,
        } => cmd_images(config, &input, output.as_deref(), pages.as_deref()),
        Commands::Health => cmd_health(config),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("{} [{}]: {}", "Error".red().bold(), e.kind(), e);
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut config = ExtractionConfig::from_env()?;
    if let Some(size) = cli.title_threshold {
        config = config.with_title_threshold(size);
    }
    if let Some(size) = cli.heading_threshold {
        config = config.with_heading_threshold(size);
    }
    if let Some(chars) = cli.text_threshold {
        config = config.with_text_layer_threshold(chars);
    }
    if let Some(mb) = cli.max_size_mb {
        config = config.with_max_file_size_mb(mb);
    }
    config.validate()?;
    Ok(config)
}

fn service(config: ExtractionConfig) -> Service {
    Service::new(config, Arc::new(JsonDocumentLoader::new()))
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection> {
    pages.map_or(Ok(PageSelection::All), PageSelection::parse)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn pretty_json(content: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn cmd_extract(
    config: ExtractionConfig,
    input: &Path,
    output: Option<&Path>,
    options: &HashMap<String, String>,
    pretty: bool,
) -> Result<()> {
    let data = fs::read(input)?;
    let result = service(config).process("extract", &data, options)?;
    log::debug!("extract metadata: {:?}", result.metadata);

    let content = if pretty && result.format == "json" {
        pretty_json(&result.content)?
    } else {
        result.content
    };
    write_output(output, &content)
}

fn cmd_detect(
    config: ExtractionConfig,
    input: &Path,
    threshold: Option<usize>,
    json: bool,
) -> Result<()> {
    let data = fs::read(input)?;
    let mut options = HashMap::new();
    if let Some(threshold) = threshold {
        options.insert(OPTION_CHAR_THRESHOLD.to_string(), threshold.to_string());
    }
    let output = service(config).process("detect_text_layer", &data, &options)?;

    if json {
        println!("{}", output.content);
        return Ok(());
    }

    let report: TextLayerResult = serde_json::from_str(&output.content)?;
    println!("{}", "Text Layer".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &report.pages {
        let status = if page.has_text_layer {
            "text".green()
        } else {
            "no text".yellow()
        };
        println!(
            "{} {:>4}: {} ({} chars)",
            "Page".bold(),
            page.page,
            status,
            page.char_count
        );
    }

    let missing = report.pages_without_text();
    println!();
    println!(
        "{}: {}/{}",
        "Pages with text".bold(),
        report.pages_with_text(),
        report.total_pages
    );
    if !missing.is_empty() {
        let list: Vec<String> = missing.iter().map(u32::to_string).collect();
        println!("{}: {}", "Needs OCR".bold(), list.join(","));
    }

    Ok(())
}

fn collect_stats(config: &ExtractionConfig, inputs: &[PathBuf]) -> Result<ExtractionStats> {
    let mut total = ExtractionStats::new();
    for input in inputs {
        let result = Extractor::new().with_config(config.clone()).open_file(input)?;
        total.merge(&result.stats());
    }
    Ok(total)
}

fn cmd_info(config: ExtractionConfig, inputs: &[PathBuf]) -> Result<()> {
    let stats = collect_stats(&config, inputs)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for input in inputs {
        println!("{}: {}", "File".bold(), input.display());
    }
    println!("{}: {}", "Pages".bold(), stats.page_count);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Titles".bold(), stats.title_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_images(
    config: ExtractionConfig,
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
) -> Result<()> {
    let result = Extractor::new()
        .with_config(config)
        .with_pages(parse_pages(pages)?)
        .with_images(true)
        .open_file(input)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let count = write_images(&result.result.images, &output_dir)?;
    println!("\n{} {} images extracted", "Done!".green().bold(), count);

    Ok(())
}

fn write_images(images: &[pdfstruct::ImageRecord], dir: &Path) -> Result<usize> {
    let mut count = 0;
    for image in images {
        let Some(payload) = image.payload.as_deref().filter(|p| !p.is_empty()) else {
            log::warn!("{} has no payload, skipped", image.id);
            continue;
        };
        let filename = image.suggested_filename();
        fs::write(dir.join(&filename), payload)?;
        println!("{} {}", "Extracted".green(), filename);
        count += 1;
    }
    Ok(count)
}

fn cmd_health(config: ExtractionConfig) -> Result<()> {
    let health = service(config).health_check();
    let json = serde_json::to_string_pretty(&health).map_err(Error::from)?;
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structured PDF content extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfstruct".dimmed());
    println!("License: MIT");
}
