use crate::utils::constants::{COMBINED_PLOT_SUFFIX, PNG_EXTENSION};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Map logger ids to rendered plot images.
///
/// `{id}_combined.png` maps to `id`; any other PNG maps to the part of its
/// stem before the first underscore. Combined plots replace per-file ones.
pub fn find_plot_files(plots_dir: &Path) -> BTreeMap<String, PathBuf> {
    let mut plot_files = BTreeMap::new();

    let entries = match std::fs::read_dir(plots_dir) {
        Ok(entries) => entries,
        Err(_) => {
            warn!("Plots directory not found: {}", plots_dir.display());
            return plot_files;
        }
    };

    let mut pngs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext == PNG_EXTENSION)
                    .unwrap_or(false)
        })
        .collect();
    pngs.sort();

    for png in pngs {
        let Some((logger_id, combined)) = plot_logger_id(&png) else {
            continue;
        };

        if combined || !plot_files.contains_key(&logger_id) {
            plot_files.insert(logger_id, png);
        }
    }

    info!("Found plot files for {} loggers", plot_files.len());
    plot_files
}

/// Logger id for a plot file, and whether it is a combined plot
pub fn plot_logger_id(path: &Path) -> Option<(String, bool)> {
    let stem = path.file_stem()?.to_string_lossy();

    if let Some(id) = stem.strip_suffix(COMBINED_PLOT_SUFFIX) {
        return Some((id.to_string(), true));
    }

    let id = stem.split('_').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some((id.to_string(), false))
    }
}
