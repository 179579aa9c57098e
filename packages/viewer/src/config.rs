//! Viewer configuration.
//!
//! Read from an optional `ward_map.toml`. Every section and key is
//! optional; missing values fall back to the defaults below. The
//! `DATASET`, `BIND_ADDR` and `PORT` environment variables override the
//! file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ward_map_boundary::DatasetSource;
use ward_map_boundary::dataset::DEFAULT_DATASET_PATH;
use ward_map_boundary_models::Aggregation;

use crate::ViewerError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "WARD_MAP_CONFIG";

/// Config file read from the working directory when present.
pub const DEFAULT_CONFIG_PATH: &str = "ward_map.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Dataset location.
    pub dataset: DatasetConfig,
    /// Initial map view and aggregation.
    pub map: MapConfig,
    /// Free-text search behavior.
    pub search: SearchConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
}

/// `[dataset]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// File path or `http(s)://` URL of the ward `GeoJSON`.
    pub source: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_DATASET_PATH.to_string(),
        }
    }
}

impl DatasetConfig {
    /// The parsed dataset location.
    #[must_use]
    pub fn source(&self) -> DatasetSource {
        match self.source.parse() {
            Ok(source) => source,
            Err(never) => match never {},
        }
    }
}

/// `[map]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial center as `[lat, lon]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: f64,
    /// Maximum zoom the tile layer supports.
    pub max_zoom: u8,
    /// Base map tile URL template.
    pub tile_url: String,
    /// Base map attribution (HTML).
    pub attribution: String,
    /// How state and LGA outlines are built.
    pub aggregation: Aggregation,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [9.0820, 8.6753],
            zoom: 6.0,
            max_zoom: 20,
            tile_url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
                          contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
                .to_string(),
            aggregation: Aggregation::Concatenate,
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this (in characters, after trimming) only
    /// reset the search highlight.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_len: 3 }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Directory of static front-end files served at `/`.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            static_dir: PathBuf::from("app/dist"),
        }
    }
}

impl ViewerConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Toml`] if the document is invalid.
    pub fn from_toml_str(s: &str) -> Result<Self, ViewerError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the configuration and applies environment overrides.
    ///
    /// Uses `path` if given (it must exist), otherwise the file named by
    /// `WARD_MAP_CONFIG`, otherwise `ward_map.toml` if it exists,
    /// otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if a config file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ViewerError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            });

        let mut config = match path {
            Some(path) => {
                log::info!("Reading config from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(&path)?)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `DATASET`, `BIND_ADDR` and `PORT` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(source) = lookup("DATASET") {
            self.dataset.source = source;
        }
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("Ignoring invalid PORT {port:?}: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.map.center, [9.0820, 8.6753]);
        assert_eq!(
            config.dataset.source(),
            DatasetSource::Path(PathBuf::from("ward_geojson.geojson"))
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [dataset]
            source = "https://example.com/wards.geojson"

            [map]
            zoom = 7.5
            aggregation = "dissolve"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(
            config.dataset.source(),
            DatasetSource::Url("https://example.com/wards.geojson".to_string())
        );
        assert!((config.map.zoom - 7.5).abs() < f64::EPSILON);
        assert_eq!(config.map.aggregation, Aggregation::Dissolve);
        assert_eq!(config.map.max_zoom, 20);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
    }

    #[test]
    fn unknown_aggregation_is_rejected() {
        assert!(matches!(
            ViewerConfig::from_toml_str("[map]\naggregation = \"union\""),
            Err(ViewerError::Toml(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = ViewerConfig::default();
        config.apply_overrides(|key| match key {
            "DATASET" => Some("other.geojson".to_string()),
            "PORT" => Some("8181".to_string()),
            _ => None,
        });
        assert_eq!(config.dataset.source, "other.geojson");
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.server.bind_addr, "127.0.0.1");

        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 8181);
    }
}
