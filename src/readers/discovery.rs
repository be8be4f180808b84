use crate::utils::constants::CSV_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Every `.csv` file below `root`, sorted by path
pub fn find_csv_files(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        warn!("Data root not found: {}", root.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_csv_extension(path))
        .collect();

    files.sort();
    files
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == CSV_EXTENSION)
        .unwrap_or(false)
}
