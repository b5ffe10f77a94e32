use std::collections::BTreeMap;

use crate::model::{OutcomeStatus, RunReport};

pub fn render_markdown_summary(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("# Game Organizer Summary\n\n");
    out.push_str(&format!(
        "- Report version: `{}`\n- Generated at: `{}`\n- Run id: `{}`\n- Input: `{}`\n- Output: `{}`\n- Mode: `{:?}`{}\n- Elapsed: `{} ms`\n\n",
        report.report_version,
        report.generated_at,
        report.run_id,
        report.input_dir,
        report.output_dir,
        report.mode,
        if report.dry_run { " (dry run)" } else { "" },
        report.summary.elapsed_ms
    ));

    let summary = &report.summary;
    out.push_str("## Totals\n\n");
    out.push_str(&format!(
        "- Discovered files: {}\n- Transferred: {}\n- Skipped BIOS: {}\n- Skipped without bucket: {}\n- Excluded entries: {}\n- Defaulted regions: {}\n\n",
        summary.discovered_files,
        summary.transferred_files,
        summary.skipped_bios,
        summary.skipped_no_bucket,
        summary.excluded_entries,
        summary.defaulted_regions
    ));

    out.push_str("## Destinations\n\n");
    let mut per_destination: BTreeMap<&str, u64> = BTreeMap::new();
    for outcome in &report.outcomes {
        if let Some(destination) = outcome.destination.as_deref() {
            let dir = destination
                .strip_suffix(outcome.file_name.as_str())
                .unwrap_or(destination)
                .trim_end_matches(|ch: char| ch == '/' || ch == '\\');
            *per_destination.entry(dir).or_default() += 1;
        }
    }
    if per_destination.is_empty() {
        out.push_str("No files were routed.\n\n");
    } else {
        for (dir, count) in &per_destination {
            out.push_str(&format!("- `{dir}`: {count} file(s)\n"));
        }
        out.push('\n');
    }

    out.push_str("## Skipped Files\n\n");
    let skipped = report
        .outcomes_with_status(OutcomeStatus::SkippedBios)
        .map(|outcome| (outcome, "BIOS"))
        .chain(
            report
                .outcomes_with_status(OutcomeStatus::SkippedNoBucket)
                .map(|outcome| (outcome, "no alphanumeric character")),
        )
        .collect::<Vec<_>>();
    if skipped.is_empty() {
        out.push_str("No files were skipped.\n\n");
    } else {
        for (outcome, reason) in skipped {
            out.push_str(&format!("- `{}` ({reason})\n", outcome.source));
        }
        out.push('\n');
    }

    out.push_str("## Warnings\n\n");
    if report.warnings.is_empty() {
        out.push_str("No warnings.\n");
    } else {
        for warning in &report.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }

    out
}
