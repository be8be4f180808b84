use crate::models::LoggerMetadata;
use crate::readers::MetadataMap;
use std::path::PathBuf;

/// Plot title for a logger plus the metadata row it matched, if any.
///
/// `Logger A538D8 (WP 017) (3 files)`: the waypoint part needs a metadata
/// match carrying a waypoint, the file count only appears for multi-file
/// groups.
pub fn resolve_title<'a>(
    logger_id: &str,
    file_group: &[PathBuf],
    metadata: &'a MetadataMap,
) -> (String, Option<&'a LoggerMetadata>) {
    let matched = metadata.get(logger_id);

    let mut title = format!("Logger {}", logger_id);
    if let Some(waypoint) = matched.and_then(LoggerMetadata::waypoint) {
        title.push_str(&format!(" (WP {})", waypoint));
    }
    if file_group.len() > 1 {
        title.push_str(&format!(" ({} files)", file_group.len()));
    }

    (title, matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("f{}.csv", i))).collect()
    }

    #[test]
    fn test_title_without_metadata() {
        let metadata = MetadataMap::new();

        let (title, matched) = resolve_title("A538D8", &files(1), &metadata);
        assert_eq!(title, "Logger A538D8");
        assert!(matched.is_none());

        let (title, _) = resolve_title("A538D8", &files(3), &metadata);
        assert_eq!(title, "Logger A538D8 (3 files)");
    }

    #[test]
    fn test_title_with_waypoint() {
        let mut metadata = MetadataMap::new();
        let mut row = LoggerMetadata::new("A538D8");
        row.garmin_waypoint = Some("017".to_string());
        metadata.insert("A538D8".to_string(), row);

        let (title, matched) = resolve_title("A538D8", &files(2), &metadata);
        assert_eq!(title, "Logger A538D8 (WP 017) (2 files)");
        assert_eq!(matched.map(|m| m.logger_id.as_str()), Some("A538D8"));
    }

    #[test]
    fn test_title_with_match_but_no_waypoint() {
        let mut metadata = MetadataMap::new();
        metadata.insert("X1".to_string(), LoggerMetadata::new("X1"));

        let (title, matched) = resolve_title("X1", &files(1), &metadata);
        assert_eq!(title, "Logger X1");
        assert!(matched.is_some());
    }

    #[test]
    fn test_secondary_waypoint_used_for_ble_loggers() {
        let mut metadata = MetadataMap::new();
        let mut row = LoggerMetadata::new("2005-0070");
        row.waypoint_id = Some("WP5".to_string());
        metadata.insert("2005-0070".to_string(), row);

        let (title, _) = resolve_title("2005-0070", &files(1), &metadata);
        assert_eq!(title, "Logger 2005-0070 (WP WP5)");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut metadata = MetadataMap::new();
        metadata.insert("a538d8".to_string(), LoggerMetadata::new("a538d8"));

        let (_, matched) = resolve_title("A538D8", &files(1), &metadata);
        assert!(matched.is_none());
    }
}
