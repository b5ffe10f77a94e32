use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::markdown::render_markdown_summary;
use crate::model::RunReport;

pub fn write_report_json(report: &RunReport, output_path: impl AsRef<Path>) -> Result<()> {
    let path = output_path.as_ref();
    let payload = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    fs::write(path, payload)
        .with_context(|| format!("failed to write run report to {}", path.display()))?;
    Ok(())
}

pub fn write_markdown_summary(report: &RunReport, output_path: impl AsRef<Path>) -> Result<()> {
    let path = output_path.as_ref();
    fs::write(path, render_markdown_summary(report))
        .with_context(|| format!("failed to write markdown summary to {}", path.display()))?;
    Ok(())
}
