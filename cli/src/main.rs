//! pdf2tex CLI - turn extracted PDF content into LaTeX

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2tex::classify::{classify_line, classify_structure, LineKind, MathDecision};
use pdf2tex::{
    load_file, JsonFormat, MetadataExtractor, Page, PageSelection, RenderOptions, Template,
};

#[derive(Parser)]
#[command(name = "pdf2tex")]
#[command(version)]
#[command(about = "Convert extracted PDF content to LaTeX source", long_about = None)]
struct Cli {
    /// Input file (JSON document dump or form-feed separated text)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output .tex file (defaults to <input stem>.tex)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Log conversion milestones
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log per-line classification decisions
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Document class
    #[arg(short, long, value_enum, env = "PDF2TEX_TEMPLATE", default_value = "article")]
    template: TemplateArg,

    /// Do not emit figures for page images
    #[arg(long)]
    no_images: bool,

    /// Path prefix for figure files
    #[arg(long, value_name = "PREFIX", default_value = "")]
    image_prefix: String,

    /// Do not detect title, author and date from the content
    #[arg(long)]
    no_detect: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Assemble pages on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print conversion statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert extracted content to a LaTeX document
    Convert {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <input stem>.tex)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Show detected metadata, structure and statistics
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump the loaded document as JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Fill in detected title, author, date and structure
        #[arg(long)]
        detect: bool,
    },

    /// Show the math and structure verdict for every line
    Classify {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Only show lines classified as math
        #[arg(long)]
        math_only: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TemplateArg {
    /// Short papers and articles
    Article,
    /// Longer reports with chapters
    Report,
    /// Books
    Book,
}

impl From<TemplateArg> for Template {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Article => Template::Article,
            TemplateArg::Report => Template::Report,
            TemplateArg::Book => Template::Book,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.debug);

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            stdout,
            convert,
        }) => cmd_convert(&input, output.as_deref(), stdout, &convert),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Json {
            input,
            output,
            compact,
            detect,
        }) => cmd_json(&input, output.as_deref(), compact, detect),
        Some(Commands::Classify {
            input,
            pages,
            math_only,
        }) => cmd_classify(&input, pages.as_deref(), math_only),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false, &cli.convert)
            } else {
                println!("{}", "Usage: pdf2tex <FILE> [OUTPUT]".yellow());
                println!("       pdf2tex --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logger(verbose: bool, debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn parse_pages(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p)?),
        None => Ok(PageSelection::All),
    }
}

fn render_options(
    input: &Path,
    args: &ConvertArgs,
) -> Result<RenderOptions, Box<dyn std::error::Error>> {
    let mut options = RenderOptions::new()
        .with_template(args.template.into())
        .with_images(!args.no_images)
        .with_image_prefix(args.image_prefix.clone())
        .with_metadata_detection(!args.no_detect)
        .with_parallel(!args.sequential)
        .with_pages(parse_pages(args.pages.as_deref())?);

    if let Some(stem) = input.file_stem() {
        options = options.with_source_name(stem.to_string_lossy());
    }
    Ok(options)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    stdout: bool,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = render_options(input, args)?;
    let output_path = if stdout {
        None
    } else {
        Some(resolve_output(input, output)?)
    };

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );
    if stdout {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    pb.set_message("Loading document...");
    let doc = load_file(input)?;
    if let Some(max) = options.page_selection.max_page() {
        if max > doc.page_count() {
            return Err(pdf2tex::Error::PageOutOfRange(max, doc.page_count()).into());
        }
    }
    pb.inc(1);

    pb.set_message("Generating LaTeX...");
    let result = pdf2tex::render::to_latex_with_stats(&doc, &options);
    pb.inc(1);

    if let Some(output_path) = output_path {
        pb.set_message("Writing output...");
        fs::write(&output_path, &result.content)?;
        pb.inc(1);
        pb.finish_with_message("Done!");
        println!("{} {}", "Saved to".green(), output_path.display());
    } else {
        pb.finish_and_clear();
        println!("{}", result.content);
    }

    if args.stats {
        print_stats(&result.stats);
    }

    Ok(())
}

/// Destination for the .tex file; never the input itself.
fn resolve_output(input: &Path, output: Option<&Path>) -> Result<PathBuf, String> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("tex"));

    let same_file = path == input
        || matches!(
            (fs::canonicalize(&path), fs::canonicalize(input)),
            (Ok(a), Ok(b)) if a == b
        );
    if same_file {
        return Err(format!(
            "Output {} would overwrite the input file",
            path.display()
        ));
    }
    Ok(path)
}

fn print_stats(stats: &pdf2tex::ConversionStats) {
    println!();
    println!("{}", "Conversion Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Empty pages".bold(), stats.empty_page_count);
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Subsections".bold(), stats.subsection_count);
    println!("{}: {}", "Text blocks".bold(), stats.text_block_count);
    println!("{}: {}", "Equations".bold(), stats.equation_count);
    println!("{}: {}", "Align blocks".bold(), stats.align_count);
    println!("{}: {}", "Display math".bold(), stats.display_math_count);
    println!("{}: {}", "Figures".bold(), stats.figure_count);
    println!("{}: {}", "Math rewrites".bold(), stats.math_fragment_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    detect: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load_file(input)?;
    if detect {
        doc.metadata = MetadataExtractor::new().enrich(&doc);
    }

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = pdf2tex::render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input)?;
    let metadata = MetadataExtractor::new().enrich(&doc);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(title) = metadata.title() {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(author) = metadata.author() {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(date) = metadata.date() {
        println!("{}: {}", "Date".bold(), pdf2tex::format_date(date));
    }

    let text = doc.plain_text();
    if let Some(structure) = &metadata.structure {
        println!();
        println!("{}", "Structure".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}: {}", "Kind".bold(), structure.estimated_kind(text.len()));
        println!("{}: {}", "Abstract".bold(), yes_no(structure.has_abstract));
        println!("{}: {}", "Introduction".bold(), yes_no(structure.has_introduction));
        println!("{}: {}", "Conclusion".bold(), yes_no(structure.has_conclusion));
        println!("{}: {}", "References".bold(), yes_no(structure.has_references));
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let math_lines = doc
        .pages
        .iter()
        .flat_map(|page| page.text.lines())
        .filter(|line| classify_line(line).is_math())
        .count();

    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Math lines".bold(), math_lines);
    println!("{}: {}", "Images".bold(), doc.image_count());

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn cmd_classify(
    input: &Path,
    pages: Option<&str>,
    math_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(input)?;
    let selection = parse_pages(pages)?;

    for page in doc.pages.iter().filter(|p| selection.includes(p.number)) {
        println!("{}", format!("Page {}", page.number).cyan().bold());
        print_page_verdicts(page, math_only);
    }

    Ok(())
}

fn print_page_verdicts(page: &Page, math_only: bool) {
    for (i, line) in page.text.lines().enumerate() {
        let decision = classify_line(line);
        if decision == MathDecision::Blank || (math_only && !decision.is_math()) {
            continue;
        }

        let verdict = match decision {
            MathDecision::Strong(rule) | MathDecision::Shape(rule) => {
                format!("math ({})", rule).green()
            }
            MathDecision::Weak => "math (weak operator)".green(),
            MathDecision::Excluded(rule) => format!("excluded ({})", rule).yellow(),
            MathDecision::Prose | MathDecision::NoIndicator | MathDecision::Blank => {
                match classify_structure(line) {
                    LineKind::Section => "section".magenta(),
                    LineKind::Subsection => "subsection".magenta(),
                    LineKind::Text => "text".dimmed(),
                }
            }
        };

        println!("{:>4} {:<28} {}", i + 1, verdict, line.trim());
    }
}

fn cmd_version() {
    println!("{} {}", "pdf2tex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Extracted PDF content to LaTeX converter");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_next_to_input() {
        assert_eq!(
            resolve_output(Path::new("paper.txt"), None).unwrap(),
            PathBuf::from("paper.tex")
        );
        assert_eq!(
            resolve_output(Path::new("paper.txt"), Some(Path::new("out/main.tex"))).unwrap(),
            PathBuf::from("out/main.tex")
        );
    }

    #[test]
    fn test_output_never_overwrites_input() {
        assert!(resolve_output(Path::new("draft.tex"), None).is_err());
        assert!(resolve_output(Path::new("paper.txt"), Some(Path::new("paper.txt"))).is_err());
    }
}
