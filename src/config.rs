use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "SFO_DASHBOARD_CONFIG";
/// Environment variable that rebases both data files onto a directory.
pub const DATA_DIR_ENV: &str = "SFO_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "Data";
pub const CENSUS_FILE_NAME: &str = "sfo_neighborhoods_census_data.csv";
pub const COORDINATES_FILE_NAME: &str = "neighborhoods_coordinates.csv";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup configuration. Every field has a default so a partial JSON file
/// only overrides what it names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Yearly per-neighborhood metrics table.
    pub census_path: PathBuf,
    /// Neighborhood → latitude/longitude table.
    pub coordinates_path: PathBuf,
    /// Optional image shown on the introduction tab.
    pub intro_image: Option<PathBuf>,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// How many neighborhoods the "most expensive" views show.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let data_dir = Path::new(DEFAULT_DATA_DIR);
        Self {
            census_path: data_dir.join(CENSUS_FILE_NAME),
            coordinates_path: data_dir.join(COORDINATES_FILE_NAME),
            intro_image: None,
            window_size: [1280.0, 900.0],
            top_n: 10,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from defaults, the optional config file and
    /// the data directory override, in that order.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config = config.with_data_dir(Path::new(&dir));
        }
        Ok(config)
    }

    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }

    /// Keep the data file names but move them into `dir`.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.census_path = rebase(dir, &self.census_path, CENSUS_FILE_NAME);
        self.coordinates_path = rebase(dir, &self.coordinates_path, COORDINATES_FILE_NAME);
        self
    }
}

fn rebase(dir: &Path, current: &Path, fallback: &str) -> PathBuf {
    let name = current
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(fallback));
    dir.join(name)
}
