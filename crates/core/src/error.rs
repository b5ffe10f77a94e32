use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a whole organize run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("input directory '{}' doesn't exist", .0.display())]
    MissingInputDir(PathBuf),

    #[error("input path '{}' is not a directory", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("failed to create {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to transfer {} to {}", from.display(), to.display())]
    Transfer {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}
