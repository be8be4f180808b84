use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH, FANMOUNTAINS_SKIP_LINES, SANGVOR_SKIP_LINES,
    SETTINGS_ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Tunables layered from defaults, an optional settings file and
/// `GROUNDTEMP_*` environment variables (highest priority).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub sangvor_skip_lines: usize,
    pub fanmountains_skip_lines: usize,
    pub offset_skip_lines: usize,
    pub plot_width: u32,
    pub plot_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sangvor_skip_lines: SANGVOR_SKIP_LINES,
            fanmountains_skip_lines: FANMOUNTAINS_SKIP_LINES,
            offset_skip_lines: SANGVOR_SKIP_LINES,
            plot_width: DEFAULT_PLOT_WIDTH,
            plot_height: DEFAULT_PLOT_HEIGHT,
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("sangvor_skip_lines", defaults.sangvor_skip_lines as i64)?
            .set_default(
                "fanmountains_skip_lines",
                defaults.fanmountains_skip_lines as i64,
            )?
            .set_default("offset_skip_lines", defaults.offset_skip_lines as i64)?
            .set_default("plot_width", defaults.plot_width as i64)?
            .set_default("plot_height", defaults.plot_height as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix(SETTINGS_ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }
}
