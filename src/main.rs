//! courseproc - compile a course tree into a static HTML site

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use courseproc::{Config, OutputKind, Processor};

#[derive(Parser)]
#[command(name = "courseproc")]
#[command(version, about = "Compile a theme/module/step course tree into a static HTML site", long_about = None)]
#[command(after_help = "EXAMPLES:
    courseproc course/ site/                      Process every theme
    courseproc course/ site/ --filter mechanics   Process one theme
    courseproc course/ site/ --references refs.xml --templates tpl/")]
struct Cli {
    /// Course source directory
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "DEST")]
    destination: Option<PathBuf>,

    /// JSON configuration file (flags override its values)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory of template overrides (<id>.html)
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// Bibliography XML file; enables [ref] citations
    #[arg(short, long, value_name = "FILE")]
    references: Option<PathBuf>,

    /// Output handler
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Only process these themes (repeatable)
    #[arg(short, long, value_name = "THEME")]
    filter: Vec<String>,

    /// Course title when the course has no metadata
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report per-file progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> courseproc::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(source) = cli.source {
        config = config.with_source(source);
    }
    if let Some(destination) = cli.destination {
        config = config.with_destination(destination);
    }
    if let Some(templates) = cli.templates {
        config = config.with_templates(templates);
    }
    if let Some(references) = cli.references {
        config = config.with_references(references);
    }
    if let Some(output) = &cli.output {
        config.output = OutputKind::parse(output)?;
    }
    if let Some(title) = cli.title {
        config = config.with_course_title(title);
    }
    if !cli.filter.is_empty() {
        config = config.with_filter(cli.filter);
    }

    let report = Processor::new(config)?.run()?;
    if !cli.quiet {
        println!(
            "{} themes, {} modules, {} steps: {} pages, {} resources, {} warnings",
            report.themes,
            report.modules,
            report.steps,
            report.pages,
            report.resources,
            report.warnings.len()
        );
    }
    Ok(())
}
