use std::env;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use game_organizer_core::{
    run_organize, write_markdown_summary, write_report_json, OrganizeOptions, TransferMode,
};
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "game-organizer.log";

#[derive(Debug, Parser)]
#[command(
    name = "game-organizer",
    version,
    about = "Organize games by region and first character of the title."
)]
struct Cli {
    /// Directory that contains the games (searched recursively).
    #[arg(short = 'i', long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Destination of the organized games. Created when missing.
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: PathBuf,

    /// Enable debug logging.
    #[arg(short = 'd', long)]
    debug: bool,

    /// Move files instead of copying them.
    #[arg(long = "move")]
    move_files: bool,

    /// Plan destinations without creating directories or transferring files.
    #[arg(long)]
    dry_run: bool,

    /// Exclude glob patterns or path substrings (repeatable).
    #[arg(long = "exclude", value_name = "GLOB", num_args = 1.., action = ArgAction::Append)]
    exclude: Vec<String>,

    /// Optional JSON run report output file.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Optional markdown summary output file.
    #[arg(long, value_name = "FILE")]
    md: Option<PathBuf>,

    /// Log file location. Defaults to game-organizer.log next to the executable.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.log_file.as_deref());

    info!("Start");
    log_args(&cli);

    let result = run(cli);
    if let Err(err) = &result {
        error!("{err:#}");
        error!("Aborted");
    }
    result
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input_dir,
        output_dir,
        move_files,
        dry_run,
        exclude,
        report: report_path,
        md,
        ..
    } = cli;

    let options = OrganizeOptions {
        input_dir,
        output_dir,
        mode: if move_files {
            TransferMode::Move
        } else {
            TransferMode::Copy
        },
        dry_run,
        excludes: exclude,
        ..OrganizeOptions::default()
    };

    let report = run_organize(&options).context("organize run failed")?;
    let summary = &report.summary;
    info!("Processed {} files", summary.processed_files());

    println!(
        "{} {} file(s) into {}",
        if dry_run { "Planned" } else { "Organized" },
        summary.routed_files(),
        options.output_dir.display()
    );
    println!(
        "Skipped {} BIOS file(s), {} without a title character; {} region(s) defaulted to USA.",
        summary.skipped_bios, summary.skipped_no_bucket, summary.defaulted_regions
    );
    if !report.warnings.is_empty() {
        println!("{} warning(s); see the log for details.", report.warnings.len());
    }

    if let Some(path) = report_path {
        write_report_json(&report, &path)?;
        println!("Report written to {}", path.display());
    }
    if let Some(path) = md {
        write_markdown_summary(&report, &path)?;
        println!("Markdown summary written to {}", path.display());
    }

    info!("Finish");
    Ok(())
}

fn log_args(cli: &Cli) {
    info!("*** Arguments Begin ***");
    for line in argument_lines(cli) {
        info!("{line}");
    }
    info!("*** Arguments End ***");
}

fn argument_lines(cli: &Cli) -> Vec<String> {
    vec![
        format!("input_dir: {}", cli.input_dir.display()),
        format!("output_dir: {}", cli.output_dir.display()),
        format!("debug: {}", cli.debug),
        format!("move: {}", cli.move_files),
        format!("dry_run: {}", cli.dry_run),
        format!("exclude: {:?}", cli.exclude),
        format!("report: {:?}", cli.report),
        format!("md: {:?}", cli.md),
        format!("log_file: {:?}", cli.log_file),
    ]
}

fn init_tracing(debug: bool, log_file: Option<&Path>) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_path = log_file.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let (writer, open_error) = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(err) => (BoxMakeWriter::new(std::io::stderr), Some(err)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    if let Some(err) = open_error {
        warn!(
            "could not open log file {}: {err}; logging to stderr",
            log_path.display()
        );
    }
}

fn default_log_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(LOG_FILE_NAME)
}
