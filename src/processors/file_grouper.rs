use crate::utils::constants::{META_FILE_SUFFIX, METADATA_MARKER, MIN_LOGGER_ID_LEN};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub type FileGroups = BTreeMap<String, Vec<PathBuf>>;

/// Clusters raw export files by the logger that produced them
pub struct FileGrouper;

impl FileGrouper {
    /// Group data files by logger id. Metadata tables are left out, and each
    /// group's files are sorted by path.
    pub fn group(files: &[PathBuf]) -> FileGroups {
        let mut grouped: FileGroups = BTreeMap::new();

        for file in files {
            if is_metadata_file(file) {
                debug!("Skipping metadata file {}", file.display());
                continue;
            }

            match logger_id_from_path(file) {
                Some(logger_id) => grouped.entry(logger_id).or_default().push(file.clone()),
                None => debug!("No logger id derivable from {}", file.display()),
            }
        }

        for files in grouped.values_mut() {
            files.sort();
        }

        let total: usize = grouped.values().map(Vec::len).sum();
        info!("Grouped {} files into {} logger groups", total, grouped.len());
        grouped
    }
}

/// Metadata tables live next to the data: anything with "metadata" in its
/// path or a name ending in "meta.csv".
pub fn is_metadata_file(path: &Path) -> bool {
    if path.to_string_lossy().contains(METADATA_MARKER) {
        return true;
    }
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(META_FILE_SUFFIX))
        .unwrap_or(false)
}

/// Logger id for a raw export file.
///
/// `2005-0070_20220907_0332.csv` -> `2005-0070`, `A538D8_20220916084244.csv`
/// -> `A538D8`. When the filename prefix is shorter than three characters the
/// grandparent directory is used instead (`A538D8/raw/01_export.csv`), as
/// long as that name is longer than three characters.
pub fn logger_id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let candidate = stem.split('_').next().unwrap_or_default();

    if candidate.chars().count() >= MIN_LOGGER_ID_LEN {
        return Some(candidate.to_string());
    }

    let grandparent = path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| name.chars().count() > MIN_LOGGER_ID_LEN);

    match grandparent {
        Some(name) => Some(name),
        None if !candidate.is_empty() => Some(candidate.to_string()),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_logger_id_from_filename() {
        assert_eq!(
            logger_id_from_path(Path::new("data/sangvor/2005-0070_20220907_0332.csv")).as_deref(),
            Some("2005-0070")
        );
        assert_eq!(
            logger_id_from_path(Path::new("data/fan/A538D8_20220916084244.csv")).as_deref(),
            Some("A538D8")
        );
        assert_eq!(
            logger_id_from_path(Path::new("data/fan/A538D8.csv")).as_deref(),
            Some("A538D8")
        );
    }

    #[test]
    fn test_logger_id_falls_back_to_grandparent() {
        assert_eq!(
            logger_id_from_path(Path::new("data/A538D8/raw/01_export.csv")).as_deref(),
            Some("A538D8")
        );
        assert_eq!(
            logger_id_from_path(Path::new("data/A538D8/raw/_export.csv")).as_deref(),
            Some("A538D8")
        );
    }

    #[test]
    fn test_short_id_kept_without_usable_grandparent() {
        assert_eq!(
            logger_id_from_path(Path::new("x/raw/01_export.csv")).as_deref(),
            Some("01")
        );
        // A three character grandparent is not long enough
        assert_eq!(
            logger_id_from_path(Path::new("fan/raw/01_export.csv")).as_deref(),
            Some("01")
        );
        assert_eq!(
            logger_id_from_path(Path::new("A538/raw/01_export.csv")).as_deref(),
            Some("A538")
        );
        assert_eq!(logger_id_from_path(Path::new("_export.csv")), None);
    }

    #[test]
    fn test_is_metadata_file() {
        assert!(is_metadata_file(Path::new("data/metadata/sangvor.csv")));
        assert!(is_metadata_file(Path::new("data/fan_loggers_meta.csv")));
        assert!(!is_metadata_file(Path::new("data/fan/A538D8_20220916084244.csv")));
    }

    #[test]
    fn test_group_sorts_and_excludes_metadata() {
        let files = vec![
            PathBuf::from("data/sangvor/2005-0070_20230101_0000.csv"),
            PathBuf::from("data/fan/A538D8_20220916084244.csv"),
            PathBuf::from("data/sangvor/2005-0070_20220907_0332.csv"),
            PathBuf::from("data/metadata/sangvor.csv"),
            PathBuf::from("data/fan_loggers_meta.csv"),
        ];

        let groups = FileGrouper::group(&files);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups["2005-0070"],
            vec![
                PathBuf::from("data/sangvor/2005-0070_20220907_0332.csv"),
                PathBuf::from("data/sangvor/2005-0070_20230101_0000.csv"),
            ]
        );
        assert_eq!(
            groups["A538D8"],
            vec![PathBuf::from("data/fan/A538D8_20220916084244.csv")]
        );
    }
}
