//! Loading and holding the ward boundary dataset.
//!
//! The dataset is one `GeoJSON` `FeatureCollection`, read from a local
//! file or fetched over HTTP exactly once. After loading it is immutable
//! and shared read-only.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use geojson::JsonObject;
use ward_map_boundary_models::{
    Aggregation, Boundary, FeatureId, Level, State, WardFeature, WardProperties,
};

use crate::BoundaryError;
use crate::aggregate::aggregate;
use crate::filter::{wards_by_lga, wards_by_state};
use crate::hierarchy::{extract_states, sort_by_name};

/// Dataset location used when nothing else is configured.
pub const DEFAULT_DATASET_PATH: &str = "ward_geojson.geojson";

/// Where to read the dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A local `GeoJSON` file.
    Path(PathBuf),
    /// An `http://` or `https://` URL.
    Url(String),
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self::Path(PathBuf::from(DEFAULT_DATASET_PATH))
    }
}

impl FromStr for DatasetSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// The loaded ward collection.
#[derive(Debug)]
pub struct Dataset {
    features: Vec<WardFeature>,
    aggregation: Aggregation,
    state_boundaries: OnceLock<Vec<Boundary>>,
}

impl Dataset {
    /// Wraps already-parsed wards. Ids are reassigned to positions.
    #[must_use]
    pub fn new(features: Vec<WardFeature>) -> Self {
        let features = features
            .into_iter()
            .enumerate()
            .map(|(i, mut feature)| {
                feature.id = FeatureId(i);
                feature
            })
            .collect();

        Self {
            features,
            aggregation: Aggregation::default(),
            state_boundaries: OnceLock::new(),
        }
    }

    /// Sets how state and LGA outlines are built.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self.state_boundaries = OnceLock::new();
        self
    }

    /// Loads the dataset from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the file cannot be read, the request
    /// fails or returns a non-success status, or the document is not a
    /// `FeatureCollection` with a `features` array.
    pub async fn load(source: &DatasetSource) -> Result<Self, BoundaryError> {
        log::info!("Loading ward dataset from {source}...");

        let body = match source {
            DatasetSource::Path(path) => tokio::fs::read_to_string(path).await?,
            DatasetSource::Url(url) => fetch(&reqwest::Client::new(), url).await?,
        };

        let dataset = Self::parse(&body)?;
        log::info!("Loaded {} wards from {source}", dataset.len());

        Ok(dataset)
    }

    /// Parses a `GeoJSON` document.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the text is not JSON or lacks a
    /// `features` array.
    pub fn parse(body: &str) -> Result<Self, BoundaryError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Builds the dataset from a parsed JSON document.
    ///
    /// Individual features that are not valid `GeoJSON` are skipped with a
    /// warning rather than failing the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::InvalidDataset`] if `features` is missing
    /// or not an array.
    pub fn from_value(mut value: serde_json::Value) -> Result<Self, BoundaryError> {
        let Some(raw) = value.get_mut("features").and_then(serde_json::Value::as_array_mut) else {
            return Err(BoundaryError::InvalidDataset {
                message: "'features' is missing or not an array".to_string(),
            });
        };

        let total = raw.len();
        let features: Vec<WardFeature> = std::mem::take(raw)
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<geojson::Feature>(raw) {
                Ok(feature) => Some(ward_from_feature(feature)),
                Err(e) => {
                    log::debug!("Skipping malformed feature: {e}");
                    None
                }
            })
            .collect();

        if features.len() < total {
            log::warn!(
                "Skipped {} of {total} malformed features",
                total - features.len()
            );
        }

        Ok(Self::new(features))
    }

    /// All wards, in dataset order.
    #[must_use]
    pub fn features(&self) -> &[WardFeature] {
        &self.features
    }

    /// Number of wards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the dataset has no wards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The configured aggregation strategy.
    #[must_use]
    pub const fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Distinct states sorted by name.
    #[must_use]
    pub fn states_by_name(&self) -> Vec<State> {
        let mut states = extract_states(&self.features);
        sort_by_name(&mut states, |s| s.name.as_str());
        states
    }

    /// Outline of the state named `state_name`, or `None` if no ward
    /// belongs to it.
    #[must_use]
    pub fn state_boundary(&self, state_name: &str) -> Option<Boundary> {
        let wards = wards_by_state(&self.features, state_name);
        let first = wards.first()?;

        Some(Boundary {
            level: Level::State,
            name: state_name.to_string(),
            code: first.properties.statecode.clone(),
            state_name: Some(state_name.to_string()),
            geometry: aggregate(wards.iter().copied(), self.aggregation),
        })
    }

    /// Outline of LGA `lga_name` in state `state_name`, or `None` if no
    /// ward belongs to it.
    #[must_use]
    pub fn lga_boundary(&self, lga_name: &str, state_name: &str) -> Option<Boundary> {
        let wards = wards_by_lga(&self.features, lga_name, state_name);
        let first = wards.first()?;

        Some(Boundary {
            level: Level::Lga,
            name: lga_name.to_string(),
            code: first.properties.lgacode.clone(),
            state_name: Some(state_name.to_string()),
            geometry: aggregate(wards.iter().copied(), self.aggregation),
        })
    }

    /// Outlines of every state, sorted by name. Computed on first use.
    pub fn state_boundaries(&self) -> &[Boundary] {
        self.state_boundaries.get_or_init(|| {
            let boundaries: Vec<Boundary> = self
                .states_by_name()
                .iter()
                .filter_map(|state| self.state_boundary(&state.name))
                .collect();
            log::debug!("Built {} state outlines", boundaries.len());
            boundaries
        })
    }
}

/// Fetches the dataset body from `url`.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the request fails or the server responds
/// with a non-success status.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, BoundaryError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(BoundaryError::InvalidDataset {
            message: format!(
                "Network error: {} {}",
                resp.status().as_u16(),
                resp.status().canonical_reason().unwrap_or_default()
            ),
        });
    }
    Ok(resp.text().await?)
}

fn ward_from_feature(feature: geojson::Feature) -> WardFeature {
    let properties = feature
        .properties
        .as_ref()
        .map(ward_properties)
        .unwrap_or_default();

    WardFeature {
        id: FeatureId(0),
        properties,
        geometry: feature.geometry,
    }
}

fn ward_properties(props: &JsonObject) -> WardProperties {
    WardProperties {
        statename: property(props, "statename"),
        statecode: property(props, "statecode"),
        lganame: property(props, "lganame"),
        lgacode: property(props, "lgacode"),
        wardname: property(props, "wardname"),
        wardcode: property(props, "wardcode"),
    }
}

/// Reads a property as a string. Numbers are stringified; empty strings,
/// `null` and other types count as absent.
fn property(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
