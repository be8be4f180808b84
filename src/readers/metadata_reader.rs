use crate::error::Result;
use crate::models::{GeoPoint, LoggerMetadata};
use crate::readers::text::read_lossy;
use crate::utils::constants::{
    COLS_ELEVATION, COLS_GARMIN_WP, COLS_INSTALLED, COLS_LATITUDE, COLS_LONGITUDE, COLS_NOTES,
    COLS_SURFACE, COL_ACCESS_CODE, COL_BLE_ID, COL_ID, COL_TYPE, CSV_EXTENSION, EMPTY_ID_MARKER,
    LEGACY_METADATA_FILE, METADATA_DIR,
};
use crate::utils::coordinates::parse_decimal_coordinate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub type MetadataMap = BTreeMap<String, LoggerMetadata>;

/// Header name -> column index; a repeated header resolves to its last column
struct ColumnIndex {
    columns: HashMap<String, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        Self { columns }
    }

    /// Trimmed, non-empty value of a column
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        let index = *self.columns.get(name)?;
        record.get(index).map(str::trim).filter(|v| !v.is_empty())
    }

    /// First non-empty value among aliases, in preference order
    fn first<'r>(&self, record: &'r StringRecord, aliases: &[&str]) -> Option<&'r str> {
        aliases.iter().find_map(|name| self.get(record, name))
    }
}

/// Reads logger metadata tables whose column names differ per site
pub struct MetadataReader {
    require_coordinates: bool,
}

impl MetadataReader {
    pub fn new() -> Self {
        Self {
            require_coordinates: true,
        }
    }

    /// When false, rows without usable coordinates are kept with no location
    pub fn with_require_coordinates(require_coordinates: bool) -> Self {
        Self {
            require_coordinates,
        }
    }

    /// Read one table, keeping rows that pass the id and coordinate rules
    pub fn read_table(&self, path: &Path) -> Result<Vec<LoggerMetadata>> {
        let content = read_lossy(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let index = ColumnIndex::from_headers(reader.headers()?);
        let mut rows = Vec::new();

        for (row_number, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        "Skipping unreadable metadata row {} in {}: {}",
                        row_number + 1,
                        path.display(),
                        e
                    );
                    continue;
                }
            };

            if let Some(metadata) = self.parse_row(&index, &record) {
                rows.push(metadata);
            }
        }

        Ok(rows)
    }

    fn parse_row(&self, index: &ColumnIndex, record: &StringRecord) -> Option<LoggerMetadata> {
        // BLE-ID/Geoprecision wins over ID; ID is then kept as the waypoint id
        let (logger_id, waypoint_id) = match (index.get(record, COL_BLE_ID), index.get(record, COL_ID)) {
            (Some(ble_id), id) => (ble_id, id),
            (None, Some(id)) => (id, None),
            (None, None) => {
                warn!("Skipping metadata row without a logger id: {:?}", record);
                return None;
            }
        };

        if logger_id == EMPTY_ID_MARKER {
            warn!("Skipping metadata row with placeholder id '{}'", EMPTY_ID_MARKER);
            return None;
        }

        let location = match self.parse_location(index, record, logger_id) {
            Some(location) => Some(location),
            None if self.require_coordinates => return None,
            None => None,
        };

        Some(LoggerMetadata {
            logger_id: logger_id.to_string(),
            waypoint_id: waypoint_id.map(str::to_string),
            garmin_waypoint: index.first(record, COLS_GARMIN_WP).map(str::to_string),
            location,
            elevation: index.first(record, COLS_ELEVATION).map(str::to_string),
            surface: index.first(record, COLS_SURFACE).map(str::to_string),
            notes: index.first(record, COLS_NOTES).map(str::to_string),
            installed: index.first(record, COLS_INSTALLED).map(str::to_string),
            logger_type: index.get(record, COL_TYPE).map(str::to_string),
            access_code: index.get(record, COL_ACCESS_CODE).map(str::to_string),
        })
    }

    fn parse_location(
        &self,
        index: &ColumnIndex,
        record: &StringRecord,
        logger_id: &str,
    ) -> Option<GeoPoint> {
        let lat_val = index.first(record, COLS_LATITUDE);
        let lon_val = index.first(record, COLS_LONGITUDE);

        let (lat_val, lon_val) = match (lat_val, lon_val) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                if self.require_coordinates {
                    warn!("Missing coordinates for logger {}", logger_id);
                }
                return None;
            }
        };

        let point = parse_decimal_coordinate(lat_val)
            .and_then(|lat| parse_decimal_coordinate(lon_val).map(|lon| (lat, lon)))
            .and_then(|(lat, lon)| GeoPoint::new(lat, lon));

        match point {
            Ok(point) => Some(point),
            Err(e) => {
                warn!(
                    "Invalid coordinates for logger {}: lat={}, lon={} ({})",
                    logger_id, lat_val, lon_val, e
                );
                None
            }
        }
    }

    /// Load one table into a map. A missing or unreadable table yields an
    /// empty map.
    pub fn load(&self, path: &Path) -> MetadataMap {
        let mut map = MetadataMap::new();
        self.load_into(path, &mut map);
        map
    }

    /// Load tables in order; a later table replaces earlier rows wholesale
    pub fn load_tables(&self, paths: &[PathBuf]) -> MetadataMap {
        let mut map = MetadataMap::new();
        for path in paths {
            self.load_into(path, &mut map);
        }
        info!("Total metadata loaded for {} loggers", map.len());
        map
    }

    /// Every `metadata/*.csv` under the data root, then the legacy table
    pub fn load_all(&self, data_root: &Path) -> MetadataMap {
        self.load_tables(&discover_tables(data_root))
    }

    fn load_into(&self, path: &Path, map: &mut MetadataMap) {
        if !path.exists() {
            warn!("Metadata file not found: {}", path.display());
            return;
        }

        match self.read_table(path) {
            Ok(rows) => {
                let file_name = path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
                info!("Loaded metadata for {} loggers from {}", rows.len(), file_name);
                for row in rows {
                    map.insert(row.logger_id.clone(), row);
                }
            }
            Err(e) => error!("Failed to load metadata from {}: {}", path.display(), e),
        }
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata tables under a data root, in load order
pub fn discover_tables(data_root: &Path) -> Vec<PathBuf> {
    let mut tables = Vec::new();

    let metadata_dir = data_root.join(METADATA_DIR);
    if let Ok(entries) = std::fs::read_dir(&metadata_dir) {
        let mut site_tables: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .map(|ext| ext == CSV_EXTENSION)
                        .unwrap_or(false)
            })
            .collect();
        site_tables.sort();
        tables.extend(site_tables);
    }

    let legacy = data_root.join(LEGACY_METADATA_FILE);
    if legacy.is_file() {
        tables.push(legacy);
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_fanmountains_scheme() -> Result<()> {
        let file = table(
            "ID,GARMIN WP,LAT,LON,ELE,surface,Notes,Date\n\
             A538D8,017,39.1234,68.5678,2450,blocks,north slope,2022-09-16\n",
        );

        let rows = MetadataReader::new().read_table(file.path())?;
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.logger_id, "A538D8");
        assert_eq!(row.waypoint_id, None);
        assert_eq!(row.garmin_waypoint.as_deref(), Some("017"));
        assert_eq!(row.location, Some(GeoPoint { latitude: 39.1234, longitude: 68.5678 }));
        assert_eq!(row.elevation.as_deref(), Some("2450"));
        assert_eq!(row.surface.as_deref(), Some("blocks"));
        assert_eq!(row.notes.as_deref(), Some("north slope"));
        assert_eq!(row.installed.as_deref(), Some("2022-09-16"));

        Ok(())
    }

    #[test]
    fn test_sangvor_scheme_keeps_waypoint() -> Result<()> {
        let file = table(
            "ID,BLE-ID/Geoprecision,Y,X,Altitude,material,comments,Date installed,Type,Access Code\n\
             WP5,X1,38.9,70.1,3100,gravel,under boulder,07.09.2022,BLE,1234\n",
        );

        let rows = MetadataReader::new().read_table(file.path())?;
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.logger_id, "X1");
        assert_eq!(row.waypoint_id.as_deref(), Some("WP5"));
        assert_eq!(row.location, Some(GeoPoint { latitude: 38.9, longitude: 70.1 }));
        assert_eq!(row.elevation.as_deref(), Some("3100"));
        assert_eq!(row.surface.as_deref(), Some("gravel"));
        assert_eq!(row.notes.as_deref(), Some("under boulder"));
        assert_eq!(row.installed.as_deref(), Some("07.09.2022"));
        assert_eq!(row.logger_type.as_deref(), Some("BLE"));
        assert_eq!(row.access_code.as_deref(), Some("1234"));

        Ok(())
    }

    #[test]
    fn test_empty_ble_id_falls_back_to_id() -> Result<()> {
        let file = table("ID,BLE-ID/Geoprecision,LAT,LON\nWP9,,39.0,68.0\n");

        let rows = MetadataReader::new().read_table(file.path())?;
        assert_eq!(rows[0].logger_id, "WP9");
        assert_eq!(rows[0].waypoint_id, None);

        Ok(())
    }

    #[test]
    fn test_invalid_rows_are_dropped() -> Result<()> {
        let file = table(
            "ID,LAT,LON\n\
             OUT_OF_RANGE,91,68.0\n\
             -,39.0,68.0\n\
             ,39.0,68.0\n\
             NO_COORDS,,\n\
             NOT_A_NUMBER,north,68.0\n\
             BAD_LON,39.0,200\n\
             GOOD,39.0,68.0\n",
        );

        let rows = MetadataReader::new().read_table(file.path())?;
        let ids: Vec<&str> = rows.iter().map(|r| r.logger_id.as_str()).collect();
        assert_eq!(ids, vec!["GOOD"]);

        Ok(())
    }

    #[test]
    fn test_coordinates_optional_when_not_required() -> Result<()> {
        let file = table("ID,LAT,LON,ELE\nNO_COORDS,,,2000\n-,1,1,1\n");

        let rows = MetadataReader::with_require_coordinates(false).read_table(file.path())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].logger_id, "NO_COORDS");
        assert_eq!(rows[0].location, None);
        assert_eq!(rows[0].elevation.as_deref(), Some("2000"));

        Ok(())
    }

    #[test]
    fn test_rows_without_logger_id_are_dropped() -> Result<()> {
        let file = table("BLE-ID/Geoprecision,ID,LAT,LON\n,,39.0,68.0\n-,WP2,39.0,68.0\nB1,,39.0,68.0\n");

        let rows = MetadataReader::with_require_coordinates(false).read_table(file.path())?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].logger_id, "B1");
        assert_eq!(rows[0].waypoint_id, None);

        Ok(())
    }

    #[test]
    fn test_preferred_alias_wins() -> Result<()> {
        let file = table("ID,LAT,Y,LON,X,ELE,Altitude\nA1,10,20,30,40,100,200\nA2,,20,,40,,200\n");

        let map = MetadataReader::new().load(file.path());
        let a1 = &map["A1"];
        assert_eq!(a1.location, Some(GeoPoint { latitude: 10.0, longitude: 30.0 }));
        assert_eq!(a1.elevation.as_deref(), Some("100"));

        let a2 = &map["A2"];
        assert_eq!(a2.location, Some(GeoPoint { latitude: 20.0, longitude: 40.0 }));
        assert_eq!(a2.elevation.as_deref(), Some("200"));

        Ok(())
    }

    #[test]
    fn test_later_table_overwrites_whole_row() {
        let first = table("ID,LAT,LON,surface,Notes\nA538D8,39,68,blocks,first visit\n");
        let second = table("ID,LAT,LON,surface\nA538D8,40,69,sand\n");

        let map = MetadataReader::new()
            .load_tables(&[first.path().to_path_buf(), second.path().to_path_buf()]);

        let row = &map["A538D8"];
        assert_eq!(row.surface.as_deref(), Some("sand"));
        assert_eq!(row.notes, None);
        assert_eq!(row.location, Some(GeoPoint { latitude: 40.0, longitude: 69.0 }));
    }

    #[test]
    fn test_missing_table_yields_empty_map() {
        let map = MetadataReader::new().load(Path::new("/nonexistent/meta.csv"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_discover_tables_order() -> Result<()> {
        let dir = TempDir::new()?;
        let meta_dir = dir.path().join("metadata");
        std::fs::create_dir(&meta_dir)?;
        std::fs::write(meta_dir.join("sangvor.csv"), "ID,LAT,LON\n")?;
        std::fs::write(meta_dir.join("fanmountains.csv"), "ID,LAT,LON\n")?;
        std::fs::write(meta_dir.join("notes.txt"), "ignored")?;
        std::fs::write(dir.path().join("fan_loggers_meta.csv"), "ID,LAT,LON\n")?;

        let tables = discover_tables(dir.path());
        let names: Vec<String> = tables
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["fanmountains.csv", "sangvor.csv", "fan_loggers_meta.csv"]);

        Ok(())
    }
}
