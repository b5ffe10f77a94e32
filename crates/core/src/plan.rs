use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::{extract_bucket, extract_region, is_bios};
use crate::model::{Bucket, Region};
use crate::route::destination_dir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDecision {
    Route(Placement),
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub region: Region,
    pub bucket: Bucket,
    /// Set when the name had no region tag and [`Region::default_region`] was used.
    pub region_defaulted: bool,
    pub destination_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Bios,
    /// No alphanumeric character. Carries whether the region fell back to the default.
    NoBucket { region_defaulted: bool },
}

/// Classifies one file name and resolves where it belongs. Performs no I/O.
pub fn plan_file(file_name: &str, output_root: &Path) -> FileDecision {
    if is_bios(file_name) {
        return FileDecision::Skip(SkipReason::Bios);
    }

    let (region, region_defaulted) = match extract_region(file_name) {
        Some(region) => (region, false),
        None => (Region::default_region(), true),
    };

    let Some(bucket) = extract_bucket(file_name) else {
        return FileDecision::Skip(SkipReason::NoBucket { region_defaulted });
    };

    FileDecision::Route(Placement {
        destination_dir: destination_dir(output_root, &region, bucket),
        region,
        bucket,
        region_defaulted,
    })
}
