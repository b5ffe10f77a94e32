pub mod classify;
pub mod error;
pub mod markdown;
pub mod model;
pub mod organize;
pub mod plan;
pub mod report;
pub mod route;

pub use classify::{extract_bucket, extract_region, is_bios, resolve_region_group};
pub use error::OrganizeError;
pub use markdown::render_markdown_summary;
pub use model::{
    Bucket, FileOutcome, OutcomeStatus, Region, RunReport, RunSummary, TransferMode,
    DEFAULT_REGION, NUMERIC_BUCKET, PRIVILEGED_REGIONS, REPORT_VERSION,
};
pub use organize::{run_organize, OrganizeOptions};
pub use plan::{plan_file, FileDecision, Placement, SkipReason};
pub use report::{write_markdown_summary, write_report_json};
pub use route::{destination_dir, ensure_dir, OTHER_DIR};
