use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::OrganizeError;
use crate::model::{Bucket, Region};

/// Parent directory for every region outside [`crate::model::PRIVILEGED_REGIONS`].
pub const OTHER_DIR: &str = "Other";

/// Maps a (region, bucket) pair onto a directory under `output_root`.
///
/// Privileged regions get `<root>/<region>/<bucket>`. Every other region lands
/// flat in `<root>/Other/<region>` and the bucket is ignored.
pub fn destination_dir(output_root: &Path, region: &Region, bucket: Bucket) -> PathBuf {
    if region.is_privileged() {
        output_root.join(region.as_str()).join(bucket.dir_name())
    } else {
        output_root.join(OTHER_DIR).join(region.as_str())
    }
}

/// Creates `dir` and its parents when missing.
pub fn ensure_dir(dir: &Path) -> Result<(), OrganizeError> {
    if dir.is_dir() {
        return Ok(());
    }
    info!("{} not found; attempting to create", dir.display());
    fs::create_dir_all(dir).map_err(|source| OrganizeError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::{destination_dir, ensure_dir};
    use crate::error::OrganizeError;
    use crate::model::{Bucket, Region};

    fn bucket(ch: char) -> Bucket {
        Bucket::from_leading_char(ch).expect("alphanumeric bucket")
    }

    #[test]
    fn privileged_regions_keep_bucket_level() {
        let root = Path::new("/out");
        assert_eq!(
            destination_dir(root, &Region::new("USA"), bucket('P')),
            Path::new("/out/USA/P")
        );
        assert_eq!(
            destination_dir(root, &Region::new("Europe"), bucket('0')),
            Path::new("/out/Europe/#")
        );
        assert_eq!(
            destination_dir(root, &Region::new("Japan"), bucket('z')),
            Path::new("/out/Japan/z")
        );
    }

    #[test]
    fn other_regions_drop_the_bucket() {
        let root = Path::new("/out");
        let a = destination_dir(root, &Region::new("Hong Kong"), bucket('A'));
        let b = destination_dir(root, &Region::new("Hong Kong"), bucket('9'));
        assert_eq!(a, Path::new("/out/Other/Hong Kong"));
        assert_eq!(a, b);
    }

    #[test]
    fn ensure_dir_creates_nested_directories_once() {
        let temp = tempfile::tempdir().expect("tempdir");
        let nested = temp.path().join("USA").join("P");
        ensure_dir(&nested).expect("created");
        assert!(nested.is_dir());
        ensure_dir(&nested).expect("existing directory is fine");
    }

    #[test]
    fn ensure_dir_fails_when_a_file_blocks_the_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("USA");
        fs::write(&blocker, b"not a directory").expect("write blocker");

        let err = ensure_dir(&blocker.join("P")).expect_err("file in the way");
        assert!(matches!(err, OrganizeError::CreateDir { .. }));
    }
}
