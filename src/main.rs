use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use pdfsnap::settings::Settings;
use pdfsnap::source;
use pdfsnap::{ConsoleReporter, ConversionController, DirSink, MupdfEngine, SelectionRequest};

/// Convert selected pages of a PDF document into PNG images.
///
/// With no page options, every page of the document is converted.
#[derive(Debug, Parser)]
#[command(name = "pdfsnap", version, about)]
struct Cli {
    /// PDF file to convert
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the PDF from a URL instead of a local file
    #[arg(long)]
    url: Option<String>,

    /// Convert a single page (1-based)
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    page: Option<u32>,

    /// First page of the range (defaults to 1)
    #[arg(long)]
    from: Option<u32>,

    /// Last page of the range (defaults to the last page)
    #[arg(long)]
    to: Option<u32>,

    /// Output directory for the PNG files
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write the log to this file instead of the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(cli: &Cli, settings: &Settings) -> Result<()> {
    let level: LevelFilter = settings.log_filter.parse().unwrap_or(LevelFilter::Info);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            WriteLogger::init(level, Config::default(), file)?;
        }
        None => {
            TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();
    init_logging(&cli, &settings)?;

    info!("starting pdfsnap");

    let mut status = ConsoleReporter;
    let document = match (&cli.file, &cli.url) {
        (Some(path), None) => source::from_path(path)?,
        (None, Some(url)) => source::from_url(url, &mut status)?,
        // clap enforces exactly one of the two
        _ => bail!("pass a PDF file or --url"),
    };

    let out_dir = cli.out.clone().unwrap_or_else(|| settings.output_dir.clone());
    let mut sink = DirSink::new(out_dir);
    let engine = MupdfEngine;
    let mut controller = ConversionController::new();

    controller
        .load(&engine, &document.bytes, &document.name, &mut sink, &mut status)
        .with_context(|| format!("loading {}", document.name))?;

    let request = match (cli.page, cli.from, cli.to) {
        (Some(page), _, _) => SelectionRequest::Single(Some(page)),
        (None, start, end) => SelectionRequest::Range { start, end },
    };

    let result = controller.convert(request, &mut sink, &mut status)?;
    ensure!(
        result.succeeded > 0,
        "no pages could be converted ({} attempted)",
        result.requested
    );

    Ok(())
}
