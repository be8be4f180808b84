use crate::utils::constants::{COMBINED_PLOT_SUFFIX, OFFSET_FILE_SUFFIX, PNG_EXTENSION};
use std::path::{Path, PathBuf};

/// Plot file name for a logger: {logger_id}_combined.png
pub fn plot_file_name(logger_id: &str) -> String {
    format!("{}{}.{}", logger_id, COMBINED_PLOT_SUFFIX, PNG_EXTENSION)
}

/// Sibling path for an offset-corrected copy: {stem}_offset{suffix}
pub fn offset_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let file_name = format!("{}{}{}", stem, OFFSET_FILE_SUFFIX, suffix);
    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// True for files already produced by the offset rewriter
pub fn is_offset_output(path: &Path) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy().ends_with(OFFSET_FILE_SUFFIX))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_file_name() {
        assert_eq!(plot_file_name("A538D8"), "A538D8_combined.png");
        assert_eq!(plot_file_name("2005-0070"), "2005-0070_combined.png");
    }

    #[test]
    fn test_offset_output_path() {
        let out = offset_output_path(Path::new("/data/shifted/2005-0070_20220907_0332.csv"));
        assert_eq!(
            out,
            PathBuf::from("/data/shifted/2005-0070_20220907_0332_offset.csv")
        );

        let bare = offset_output_path(Path::new("logger"));
        assert_eq!(bare, PathBuf::from("logger_offset"));
    }

    #[test]
    fn test_is_offset_output() {
        assert!(is_offset_output(Path::new("dir/2005-0070_offset.csv")));
        assert!(!is_offset_output(Path::new("dir/2005-0070_20220907.csv")));
    }
}
