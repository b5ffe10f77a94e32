use std::fmt;

use serde::{Deserialize, Serialize};

pub const REPORT_VERSION: &str = "1.0.0";

/// Regions that receive per-bucket subdirectories.
pub const PRIVILEGED_REGIONS: [&str; 3] = ["Europe", "Japan", "USA"];

/// Region used when a filename carries no parenthesized region tag.
pub const DEFAULT_REGION: &str = "USA";

/// Bucket used for titles that start with a digit.
pub const NUMERIC_BUCKET: char = '#';

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn default_region() -> Self {
        Self(DEFAULT_REGION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_privileged(&self) -> bool {
        PRIVILEGED_REGIONS.contains(&self.0.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-character grouping key. Digits collapse into [`NUMERIC_BUCKET`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Bucket(char);

impl Bucket {
    /// Builds a bucket from a leading character, or `None` when it is not ASCII alphanumeric.
    pub fn from_leading_char(ch: char) -> Option<Self> {
        if ch.is_ascii_digit() {
            Some(Self(NUMERIC_BUCKET))
        } else if ch.is_ascii_alphabetic() {
            Some(Self(ch))
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn is_numeric(self) -> bool {
        self.0 == NUMERIC_BUCKET
    }

    pub fn dir_name(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Copied,
    Moved,
    Planned,
    AlreadyInPlace,
    SkippedBios,
    SkippedNoBucket,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileOutcome {
    pub source: String,
    pub file_name: String,
    pub status: OutcomeStatus,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub bucket: Option<Bucket>,
    #[serde(default)]
    pub region_defaulted: bool,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RunSummary {
    #[serde(default)]
    pub discovered_files: u64,
    #[serde(default)]
    pub transferred_files: u64,
    #[serde(default)]
    pub skipped_bios: u64,
    #[serde(default)]
    pub skipped_no_bucket: u64,
    #[serde(default)]
    pub excluded_entries: u64,
    #[serde(default)]
    pub defaulted_regions: u64,
    #[serde(default)]
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub report_version: String,
    pub generated_at: String,
    #[serde(default = "default_run_id")]
    pub run_id: String,
    pub input_dir: String,
    pub output_dir: String,
    #[serde(default)]
    pub mode: TransferMode,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub summary: RunSummary,
    pub outcomes: Vec<FileOutcome>,
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Files handed to classification: everything discovered except BIOS dumps,
    /// including files later skipped for lacking a bucket character.
    pub fn processed_files(&self) -> u64 {
        self.discovered_files.saturating_sub(self.skipped_bios)
    }

    /// Files that received a destination.
    pub fn routed_files(&self) -> u64 {
        self.processed_files().saturating_sub(self.skipped_no_bucket)
    }
}

fn default_run_id() -> String {
    "unknown".to_string()
}

impl RunReport {
    pub fn outcomes_with_status(&self, status: OutcomeStatus) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(move |outcome| outcome.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::{Bucket, Region, RunSummary, TransferMode};

    #[test]
    fn only_three_regions_are_privileged() {
        assert!(Region::new("Europe").is_privileged());
        assert!(Region::new("Japan").is_privileged());
        assert!(Region::new("USA").is_privileged());
        assert!(!Region::new("usa").is_privileged());
        assert!(!Region::new("Hong Kong").is_privileged());
        assert!(!Region::new("USA, Europe").is_privileged());
    }

    #[test]
    fn digits_collapse_into_hash_bucket() {
        assert_eq!(Bucket::from_leading_char('7').map(Bucket::as_char), Some('#'));
        assert_eq!(Bucket::from_leading_char('q').map(Bucket::as_char), Some('q'));
        assert_eq!(Bucket::from_leading_char('Q').map(Bucket::as_char), Some('Q'));
        assert!(Bucket::from_leading_char('-').is_none());
        assert!(Bucket::from_leading_char('é').is_none());
    }

    #[test]
    fn serializes_newtypes_as_plain_strings() {
        let region = serde_json::to_string(&Region::new("Hong Kong")).expect("region serializes");
        assert_eq!(region, "\"Hong Kong\"");
        let bucket = serde_json::to_string(&Bucket::from_leading_char('1')).expect("bucket serializes");
        assert_eq!(bucket, "\"#\"");
        let mode = serde_json::to_string(&TransferMode::Move).expect("mode serializes");
        assert_eq!(mode, "\"move\"");
    }

    #[test]
    fn processed_count_excludes_only_bios_skips() {
        let summary = RunSummary {
            discovered_files: 7,
            transferred_files: 5,
            skipped_bios: 1,
            skipped_no_bucket: 1,
            ..RunSummary::default()
        };
        assert_eq!(summary.processed_files(), 6);
        assert_eq!(summary.routed_files(), 5);
    }
}
