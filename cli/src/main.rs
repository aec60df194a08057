//! readflow CLI - reading-order reconstruction for positioned PDF text

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use readflow::render::{self, ReconstructionStats};
use readflow::{
    input, BatchOutput, BatchProcessor, JsonFormat, LayoutOptions, MarkdownOptions, PageSelection,
    SourceDocument, TextOptions,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "readflow")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Rebuild reading-order prose (titles, paragraphs, sentences) from positioned PDF text",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct pages to JSON
    Json {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Reconstruct pages to text, one sentence per line
    Text {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print a header line before each page
        #[arg(long)]
        page_headers: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Reconstruct pages to Markdown
    #[command(alias = "md")]
    Markdown {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Insert a horizontal rule between pages
        #[arg(long)]
        page_separators: bool,

        /// Do not escape Markdown special characters
        #[arg(long)]
        no_escape: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show reconstruction statistics and warnings
    Info {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show version information
    Version,
}

/// Input file and layout settings shared by every reconstructing command.
#[derive(Args)]
struct InputArgs {
    /// Input JSON file (pages of positioned fragments)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Read raw pdf2json output instead of the normalized page shape
    #[arg(long)]
    pdf2json: bool,

    /// JSON file with layout options (camelCase keys)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Max vertical distance for fragments on one line
    #[arg(long)]
    line_threshold: Option<f32>,

    /// Max vertical gap between lines of one paragraph
    #[arg(long)]
    paragraph_gap: Option<f32>,

    /// Min horizontal gap that inserts a space
    #[arg(long)]
    spacing_threshold: Option<f32>,

    /// Font size ratio over body text for titles
    #[arg(long)]
    title_ratio: Option<f32>,

    /// Font size ratio over body text for subtitles
    #[arg(long)]
    subtitle_ratio: Option<f32>,

    /// Only the first N paragraphs of a page may be titles
    #[arg(long)]
    title_top_n: Option<usize>,

    /// Pages reconstructed in parallel
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,
}

impl InputArgs {
    fn layout_options(&self) -> readflow::Result<LayoutOptions> {
        let mut options = match &self.config {
            Some(path) => LayoutOptions::from_path(path)?,
            None => LayoutOptions::default(),
        };

        if let Some(v) = self.line_threshold {
            options = options.with_line_threshold(v);
        }
        if let Some(v) = self.paragraph_gap {
            options = options.with_paragraph_gap(v);
        }
        if let Some(v) = self.spacing_threshold {
            options = options.with_spacing_threshold(v);
        }
        if let Some(v) = self.title_ratio {
            options = options.with_title_ratio(v);
        }
        if let Some(v) = self.subtitle_ratio {
            options = options.with_subtitle_ratio(v);
        }
        if let Some(v) = self.title_top_n {
            options = options.with_title_top_n(v);
        }
        if let Some(v) = self.concurrency {
            options = options.with_concurrency(v);
        }

        options.validate()?;
        Ok(options)
    }

    fn load(&self) -> readflow::Result<SourceDocument> {
        if self.pdf2json {
            input::pdf2json::from_path(&self.file)
        } else {
            SourceDocument::from_path(&self.file)
        }
    }

    /// Decode the input and reconstruct every page behind a progress bar.
    fn reconstruct(&self) -> Result<BatchOutput, Box<dyn std::error::Error>> {
        let processor = BatchProcessor::with_options(self.layout_options()?)?;
        let source = self.load()?;

        let pb = ProgressBar::new(source.page_count() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")?
                .progress_chars("#>-"),
        );

        let output = processor.process_document_with_progress(&source, |done, _| {
            pb.set_position(done as u64);
        });
        pb.finish_and_clear();

        for warning in &output.warnings {
            eprintln!(
                "{} page {}: {}",
                "Warning".yellow().bold(),
                warning.page,
                warning.warning
            );
        }

        Ok(output)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Text {
            input,
            output,
            page_headers,
            pages,
        } => cmd_text(&input, output.as_deref(), page_headers, pages.as_deref()),
        Commands::Markdown {
            input,
            output,
            page_separators,
            no_escape,
            pages,
        } => cmd_markdown(
            &input,
            output.as_deref(),
            page_separators,
            no_escape,
            pages.as_deref(),
        ),
        Commands::Info { input } => cmd_info(&input),
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

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, String> {
    match pages {
        Some(p) => PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e)),
        None => Ok(PageSelection::All),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_json(input: &InputArgs, output: Option<&Path>, compact: bool) -> CliResult {
    let result = input.reconstruct()?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&result.document.pages, format)?;
    write_output(output, &json)
}

fn cmd_text(
    input: &InputArgs,
    output: Option<&Path>,
    page_headers: bool,
    pages: Option<&str>,
) -> CliResult {
    let options = TextOptions::new()
        .with_page_headers(page_headers)
        .with_pages(parse_pages(pages)?);
    let result = input.reconstruct()?;

    let text = render::to_text(&result.document.pages, &options)?;
    write_output(output, &text)
}

fn cmd_markdown(
    input: &InputArgs,
    output: Option<&Path>,
    page_separators: bool,
    no_escape: bool,
    pages: Option<&str>,
) -> CliResult {
    let options = MarkdownOptions::new()
        .with_page_separators(page_separators)
        .with_escaping(!no_escape)
        .with_pages(parse_pages(pages)?);
    let result = input.reconstruct()?;

    let markdown = render::to_markdown(&result.document.pages, &options)?;
    write_output(output, &markdown)
}

fn cmd_info(input: &InputArgs) -> CliResult {
    let options = input.layout_options()?;
    let result = input.reconstruct()?;
    let stats = ReconstructionStats::from_pages(&result.document.pages);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.file.display());
    println!(
        "{}: {}",
        "Format".bold(),
        if input.pdf2json { "pdf2json" } else { "normalized" }
    );
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Concurrency".bold(), options.batch_concurrency);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Titles".bold(), stats.title_count);
    println!("{}: {}", "Subtitles".bold(), stats.subtitle_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} styled)",
        "Sentences".bold(),
        stats.sentence_count,
        stats.styled_sentence_count
    );
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    let warnings = result.warnings.len();
    let label = format!("{}", warnings);
    println!(
        "{}: {}",
        "Warnings".bold(),
        if warnings == 0 {
            label.green()
        } else {
            label.yellow()
        }
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "readflow".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Reading-order reconstruction for positioned PDF text");
    println!();
    println!("License: MIT");
}
