use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Bucket, Region, DEFAULT_REGION};

const BIOS_MARKER: &str = "BIOS";

fn region_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Za-z0-9 ,]+)\)").expect("region pattern is valid"))
}

/// Returns true for system BIOS dumps, which are never routed.
pub fn is_bios(file_name: &str) -> bool {
    file_name.contains(BIOS_MARKER)
}

/// Region from the first parenthesized tag group, e.g. `Game (Japan, USA).bin` -> `USA`.
pub fn extract_region(file_name: &str) -> Option<Region> {
    let captures = region_pattern().captures(file_name)?;
    let group = captures.get(1)?.as_str();
    Some(resolve_region_group(group))
}

/// Picks one region out of a tag group.
///
/// A group without commas is taken verbatim. With several comma-separated tags,
/// `USA` wins whenever it occurs anywhere in the group; otherwise the first tag
/// is used, trimmed.
pub fn resolve_region_group(group: &str) -> Region {
    if !group.contains(',') {
        return Region::new(group);
    }
    if group.contains(DEFAULT_REGION) {
        return Region::default_region();
    }
    let first = group.split(',').next().unwrap_or_default().trim();
    Region::new(first)
}

/// Bucket from the first ASCII alphanumeric character in the name.
pub fn extract_bucket(file_name: &str) -> Option<Bucket> {
    file_name
        .chars()
        .find(char::is_ascii_alphanumeric)
        .and_then(Bucket::from_leading_char)
}

#[cfg(test)]
mod tests {
    use super::{extract_bucket, extract_region, is_bios, resolve_region_group};

    fn region(name: &str) -> Option<String> {
        extract_region(name).map(|region| region.as_str().to_string())
    }

    #[test]
    fn single_region_tags_are_taken_verbatim() {
        assert_eq!(region("Pac-Man Collection (USA).bin").as_deref(), Some("USA"));
        assert_eq!(region("Sonic (Europe).md").as_deref(), Some("Europe"));
        assert_eq!(
            region("Mystery Game (Hong Kong).bin").as_deref(),
            Some("Hong Kong")
        );
    }

    #[test]
    fn usa_wins_in_multi_region_tags_regardless_of_position() {
        assert_eq!(region("Legend of Zelda (Japan, USA).bin").as_deref(), Some("USA"));
        assert_eq!(region("Tetris (USA, Europe).gb").as_deref(), Some("USA"));
        assert_eq!(region("Tetris (Europe, Japan, USA).gb").as_deref(), Some("USA"));
    }

    #[test]
    fn first_tag_wins_without_usa() {
        assert_eq!(region("Puyo Puyo (Japan, Europe).md").as_deref(), Some("Japan"));
        assert_eq!(
            region("Game ( Brazil , Korea).bin").as_deref(),
            Some("Brazil")
        );
    }

    #[test]
    fn only_the_first_matching_group_is_used() {
        assert_eq!(region("Game (Europe) (Rev 1).bin").as_deref(), Some("Europe"));
        assert_eq!(region("Game (v1.1) (Japan).bin").as_deref(), Some("Japan"));
    }

    #[test]
    fn missing_or_malformed_tags_yield_none() {
        assert_eq!(region("Plain Title.bin"), None);
        assert_eq!(region("Broken (USA.bin"), None);
        assert_eq!(region("Empty ().bin"), None);
        assert_eq!(region("Odd (U.S.A.).bin"), None);
    }

    #[test]
    fn group_resolution_handles_edge_spacing() {
        assert_eq!(resolve_region_group("USA").as_str(), "USA");
        assert_eq!(resolve_region_group(" Japan ,Korea").as_str(), "Japan");
        assert_eq!(resolve_region_group(",Korea").as_str(), "");
    }

    #[test]
    fn bucket_is_first_alphanumeric_with_case_preserved() {
        assert_eq!(extract_bucket("Pac-Man (USA).bin").map(|b| b.as_char()), Some('P'));
        assert_eq!(extract_bucket("'eliminator' (USA).bin").map(|b| b.as_char()), Some('e'));
        assert_eq!(extract_bucket("[!] Zoo (Japan).bin").map(|b| b.as_char()), Some('Z'));
    }

    #[test]
    fn digit_leading_titles_use_hash_bucket() {
        let bucket = extract_bucket("007 GoldenEye (Europe).rom").expect("bucket");
        assert_eq!(bucket.as_char(), '#');
        assert!(bucket.is_numeric());
    }

    #[test]
    fn names_without_alphanumerics_have_no_bucket() {
        assert!(extract_bucket("---").is_none());
        assert!(extract_bucket("()").is_none());
        assert!(extract_bucket("").is_none());
    }

    #[test]
    fn bios_marker_is_case_sensitive() {
        assert!(is_bios("BIOS_SystemFile.bin"));
        assert!(is_bios("[BIOS] Console (USA).bin"));
        assert!(!is_bios("Bios Hunter (USA).bin"));
    }
}
