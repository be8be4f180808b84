/// Timestamp layout shared by both logger families
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Header line counts
pub const SANGVOR_SKIP_LINES: usize = 22;
pub const FANMOUNTAINS_SKIP_LINES: usize = 12;

/// Path markers
pub const SANGVOR_MARKER: &str = "sangvor";
pub const METADATA_MARKER: &str = "metadata";
pub const META_FILE_SUFFIX: &str = "meta.csv";

/// Directory and file names
pub const METADATA_DIR: &str = "metadata";
pub const LEGACY_METADATA_FILE: &str = "fan_loggers_meta.csv";
pub const CSV_EXTENSION: &str = "csv";
pub const PNG_EXTENSION: &str = "png";
pub const COMBINED_PLOT_SUFFIX: &str = "_combined";
pub const OFFSET_FILE_SUFFIX: &str = "_offset";
pub const DEFAULT_PLOTS_LINK_DIR: &str = "plots";

/// Grouping heuristics
pub const MIN_LOGGER_ID_LEN: usize = 3;

/// Metadata column aliases, preferred name first
pub const COL_BLE_ID: &str = "BLE-ID/Geoprecision";
pub const COL_ID: &str = "ID";
pub const COLS_LATITUDE: &[&str] = &["LAT", "Y"];
pub const COLS_LONGITUDE: &[&str] = &["LON", "X"];
pub const COLS_ELEVATION: &[&str] = &["ELE", "Altitude"];
pub const COLS_SURFACE: &[&str] = &["surface", "material"];
pub const COLS_NOTES: &[&str] = &["Notes", "comments"];
pub const COLS_INSTALLED: &[&str] = &["Date", "Date installed"];
pub const COLS_GARMIN_WP: &[&str] = &["GARMIN WP", "WP"];
pub const COL_TYPE: &str = "Type";
pub const COL_ACCESS_CODE: &str = "Access Code";

/// Identifiers that mean "no logger here"
pub const EMPTY_ID_MARKER: &str = "-";

/// Offset rewriter default (clock drift observed on the sangvor batch)
pub const DEFAULT_OFFSET: &str = "438d 3h 29min 29sec";

/// Plot defaults
pub const DEFAULT_PLOT_WIDTH: u32 = 1800;
pub const DEFAULT_PLOT_HEIGHT: u32 = 900;

/// Settings file looked up when `--config` is not given
pub const DEFAULT_SETTINGS_FILE: &str = "groundtemp.toml";
pub const SETTINGS_ENV_PREFIX: &str = "GROUNDTEMP";
