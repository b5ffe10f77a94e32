use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::OrganizeError;
use crate::model::{
    FileOutcome, OutcomeStatus, RunReport, RunSummary, TransferMode, DEFAULT_REGION,
    REPORT_VERSION,
};
use crate::plan::{plan_file, FileDecision, SkipReason};
use crate::route::ensure_dir;

#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub mode: TransferMode,
    /// Plan every file without creating directories or transferring anything.
    pub dry_run: bool,
    pub excludes: Vec<String>,
    pub run_id: Option<String>,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            mode: TransferMode::Copy,
            dry_run: false,
            excludes: Vec::new(),
            run_id: None,
        }
    }
}

struct Candidate {
    path: PathBuf,
    file_name: OsString,
}

struct Enumeration {
    candidates: Vec<Candidate>,
    excluded_entries: u64,
}

/// Walks `input_dir`, routes every file into the organized tree and returns a report.
///
/// Per-file problems (BIOS dumps, missing bucket character, missing region tag)
/// are logged and recorded. Directory creation or transfer failures abort the run.
pub fn run_organize(options: &OrganizeOptions) -> Result<RunReport, OrganizeError> {
    validate_input_dir(&options.input_dir)?;
    let started = Instant::now();
    let run_id = options
        .run_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut warnings = Vec::new();
    let excludes = ExcludeMatcher::new(&options.excludes, &mut warnings);

    if !options.dry_run {
        ensure_dir(&options.output_dir)?;
    }

    let enumeration = collect_candidates(options, &excludes, &mut warnings);
    let mut summary = RunSummary {
        discovered_files: enumeration.candidates.len() as u64,
        excluded_entries: enumeration.excluded_entries,
        ..RunSummary::default()
    };
    let mut outcomes = Vec::with_capacity(enumeration.candidates.len());

    for candidate in &enumeration.candidates {
        let outcome = route_candidate(candidate, options, &mut summary, &mut warnings)?;
        outcomes.push(outcome);
    }

    summary.elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        "run {run_id}: {} transferred, {} BIOS skipped, {} without bucket, {} excluded",
        summary.transferred_files,
        summary.skipped_bios,
        summary.skipped_no_bucket,
        summary.excluded_entries
    );

    Ok(RunReport {
        report_version: REPORT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        run_id,
        input_dir: options.input_dir.to_string_lossy().to_string(),
        output_dir: options.output_dir.to_string_lossy().to_string(),
        mode: options.mode,
        dry_run: options.dry_run,
        excludes: options.excludes.clone(),
        summary,
        outcomes,
        warnings,
    })
}

fn route_candidate(
    candidate: &Candidate,
    options: &OrganizeOptions,
    summary: &mut RunSummary,
    warnings: &mut Vec<String>,
) -> Result<FileOutcome, OrganizeError> {
    let file_name = candidate.file_name.to_string_lossy().to_string();
    let mut outcome = FileOutcome {
        source: candidate.path.to_string_lossy().to_string(),
        file_name: file_name.clone(),
        status: OutcomeStatus::Planned,
        region: None,
        bucket: None,
        region_defaulted: false,
        destination: None,
    };

    let placement = match plan_file(&file_name, &options.output_dir) {
        FileDecision::Skip(SkipReason::Bios) => {
            info!("Skipping BIOS file: {file_name}");
            summary.skipped_bios += 1;
            outcome.status = OutcomeStatus::SkippedBios;
            return Ok(outcome);
        }
        FileDecision::Skip(SkipReason::NoBucket { region_defaulted }) => {
            if region_defaulted {
                record_defaulted_region(&file_name, summary, warnings);
                outcome.region_defaulted = true;
            }
            warn!(
                "Unable to determine the first alphanumeric character in '{file_name}'; skipping"
            );
            summary.skipped_no_bucket += 1;
            outcome.status = OutcomeStatus::SkippedNoBucket;
            return Ok(outcome);
        }
        FileDecision::Route(placement) => placement,
    };

    if placement.region_defaulted {
        record_defaulted_region(&file_name, summary, warnings);
    }

    let destination = placement.destination_dir.join(&candidate.file_name);
    outcome.region = Some(placement.region.clone());
    outcome.bucket = Some(placement.bucket);
    outcome.region_defaulted = placement.region_defaulted;
    outcome.destination = Some(destination.to_string_lossy().to_string());

    if options.dry_run {
        debug!(
            "Planned {} -> {}",
            candidate.path.display(),
            destination.display()
        );
        return Ok(outcome);
    }

    ensure_dir(&placement.destination_dir)?;
    if is_same_file(&candidate.path, &destination) {
        info!("{} is already in place", destination.display());
        outcome.status = OutcomeStatus::AlreadyInPlace;
        return Ok(outcome);
    }

    let verb = match options.mode {
        TransferMode::Copy => "Copy",
        TransferMode::Move => "Move",
    };
    info!(
        "{verb} from {} to {}",
        candidate.path.display(),
        destination.display()
    );
    transfer(&candidate.path, &destination, options.mode)?;
    summary.transferred_files += 1;
    outcome.status = match options.mode {
        TransferMode::Copy => OutcomeStatus::Copied,
        TransferMode::Move => OutcomeStatus::Moved,
    };
    Ok(outcome)
}

fn record_defaulted_region(file_name: &str, summary: &mut RunSummary, warnings: &mut Vec<String>) {
    let message = format!("Unable to find region in '{file_name}'; defaulting to {DEFAULT_REGION}");
    warn!("{message}");
    warnings.push(message);
    summary.defaulted_regions += 1;
}

fn collect_candidates(
    options: &OrganizeOptions,
    excludes: &ExcludeMatcher,
    warnings: &mut Vec<String>,
) -> Enumeration {
    let root = &options.input_dir;
    let output_guard = fs::canonicalize(&options.output_dir).ok();
    let mut excluded_entries = 0_u64;
    let mut candidates = Vec::new();

    let iter = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if excludes.is_excluded(relative) {
                debug!("excluded {}", entry.path().display());
                excluded_entries += 1;
                return false;
            }
            if entry.file_type().is_dir() && is_output_dir(entry.path(), output_guard.as_deref()) {
                debug!("not descending into output directory {}", entry.path().display());
                return false;
            }
            true
        });

    for item in iter {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let message = format!("walk error under {}: {}", root.display(), err);
                warn!("{message}");
                warnings.push(message);
                continue;
            }
        };
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        candidates.push(Candidate {
            file_name: entry.file_name().to_os_string(),
            path: entry.into_path(),
        });
    }

    Enumeration {
        candidates,
        excluded_entries,
    }
}

fn validate_input_dir(input_dir: &Path) -> Result<(), OrganizeError> {
    if !input_dir.exists() {
        return Err(OrganizeError::MissingInputDir(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(OrganizeError::InputNotDirectory(input_dir.to_path_buf()));
    }
    Ok(())
}

fn is_output_dir(path: &Path, output_guard: Option<&Path>) -> bool {
    let Some(guard) = output_guard else {
        return false;
    };
    fs::canonicalize(path).is_ok_and(|resolved| resolved == guard)
}

fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn transfer(source: &Path, destination: &Path, mode: TransferMode) -> Result<(), OrganizeError> {
    let result = match mode {
        TransferMode::Copy => fs::copy(source, destination).map(|_| ()),
        TransferMode::Move => move_file(source, destination),
    };
    result.map_err(|err| OrganizeError::Transfer {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: err,
    })
}

fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(err) => {
            // rename cannot cross filesystems
            debug!(
                "rename {} -> {} failed ({err}); copying then removing",
                source.display(),
                destination.display()
            );
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
    }
}

struct ExcludeMatcher {
    globset: Option<GlobSet>,
    substrings: Vec<String>,
}

impl ExcludeMatcher {
    fn new(patterns: &[String], warnings: &mut Vec<String>) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut glob_count = 0_usize;
        let mut substrings = Vec::new();

        for pattern in patterns.iter().map(|pattern| pattern.trim()) {
            if pattern.is_empty() {
                continue;
            }
            if !has_glob_syntax(pattern) {
                substrings.push(pattern.to_lowercase());
                continue;
            }
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    glob_count += 1;
                }
                Err(err) => {
                    let message =
                        format!("invalid exclude glob '{pattern}': {err}; matching it as a substring");
                    warn!("{message}");
                    warnings.push(message);
                    substrings.push(pattern.to_lowercase());
                }
            }
        }

        let globset = if glob_count == 0 {
            None
        } else {
            match builder.build() {
                Ok(set) => Some(set),
                Err(err) => {
                    let message = format!("failed to compile exclude globs: {err}; globs ignored");
                    warn!("{message}");
                    warnings.push(message);
                    None
                }
            }
        };

        Self {
            globset,
            substrings,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        if let Some(globset) = &self.globset {
            let name_matches = path
                .file_name()
                .is_some_and(|name| globset.is_match(Path::new(name)));
            if name_matches || globset.is_match(path) {
                return true;
            }
        }
        if self.substrings.is_empty() {
            return false;
        }
        let lowered = path.to_string_lossy().to_lowercase();
        self.substrings
            .iter()
            .any(|pattern| lowered.contains(pattern.as_str()))
    }
}

fn has_glob_syntax(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|ch| matches!(ch, '*' | '?' | '[' | ']' | '{' | '}'))
}
