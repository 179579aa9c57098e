#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the ward map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the boundary types so the API contract can evolve independently.

use serde::{Deserialize, Serialize};
use ward_map_boundary_models::{Aggregation, Lga, State, WardFeature};
use ward_map_viewer::ViewerConfig;
use ward_map_viewer::controller::ViewSnapshot;
use ward_map_viewer::notify::Notification;
use ward_map_viewer::surface::SceneSurface;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Number of wards loaded.
    pub features: usize,
}

/// A state as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiState {
    /// State name.
    pub name: String,
    /// State code, e.g. `LA`.
    pub code: String,
}

impl From<State> for ApiState {
    fn from(state: State) -> Self {
        Self {
            name: state.name,
            code: state.code,
        }
    }
}

/// An LGA as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLga {
    /// LGA name.
    pub name: String,
    /// LGA code.
    pub code: String,
    /// Name of the containing state.
    pub state_name: Option<String>,
}

impl From<Lga> for ApiLga {
    fn from(lga: Lga) -> Self {
        Self {
            name: lga.name,
            code: lga.code,
            state_name: lga.state_name,
        }
    }
}

/// A ward summary (properties only, no geometry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWard {
    /// Position in the dataset.
    pub id: usize,
    /// Ward name.
    pub name: Option<String>,
    /// Ward code.
    pub code: Option<String>,
    /// Name of the containing LGA.
    pub lga_name: Option<String>,
    /// Code of the containing LGA.
    pub lga_code: Option<String>,
    /// Name of the containing state.
    pub state_name: Option<String>,
    /// Code of the containing state.
    pub state_code: Option<String>,
}

impl From<&WardFeature> for ApiWard {
    fn from(ward: &WardFeature) -> Self {
        let props = ward.properties.clone();
        Self {
            id: ward.id.0,
            name: props.wardname,
            code: props.wardcode,
            lga_name: props.lganame,
            lga_code: props.lgacode,
            state_name: props.statename,
            state_code: props.statecode,
        }
    }
}

/// Free-text search summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearch {
    /// The trimmed query.
    pub query: String,
    /// States whose name matched.
    pub states: Vec<ApiState>,
    /// LGAs whose name matched.
    pub lgas: Vec<ApiLga>,
    /// Wards whose name matched.
    pub wards: Vec<ApiWard>,
    /// Total wards covered by all matches, without duplicates.
    pub feature_count: usize,
}

/// Initial map settings for the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapConfig {
    /// `[lat, lon]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: f64,
    /// Deepest zoom the tiles allow.
    pub max_zoom: u8,
    /// Tile URL template.
    pub tile_url: String,
    /// Tile attribution HTML.
    pub attribution: String,
    /// How state and LGA outlines are built.
    pub aggregation: Aggregation,
    /// Shortest query that triggers a search.
    pub min_query_len: usize,
}

impl From<&ViewerConfig> for ApiMapConfig {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            center: config.map.center,
            zoom: config.map.zoom,
            max_zoom: config.map.max_zoom,
            tile_url: config.map.tile_url.clone(),
            attribution: config.map.attribution.clone(),
            aggregation: config.map.aggregation,
            min_query_len: config.search.min_query_len,
        }
    }
}

/// The rendered view for a selection and search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiView {
    /// Selection, dropdown options and search state.
    #[serde(flatten)]
    pub view: ViewSnapshot,
    /// Layers and viewport.
    pub scene: SceneSurface,
    /// Notifications raised while building the view.
    pub notifications: Vec<Notification>,
}

/// Query parameters for the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQueryParams {
    /// Search text.
    pub q: Option<String>,
}

/// Query parameters for the boundary endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundaryQueryParams {
    /// State name (required).
    pub state: Option<String>,
    /// LGA name within the state.
    pub lga: Option<String>,
}

/// Query parameters for the view endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQueryParams {
    /// State name.
    pub state: Option<String>,
    /// LGA name within the state.
    pub lga: Option<String>,
    /// Ward name within the LGA.
    pub ward: Option<String>,
    /// Search text applied after the selection.
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ward_map_boundary_models::{FeatureId, WardProperties};

    #[test]
    fn ward_summary_uses_camel_case() {
        let ward = WardFeature {
            id: FeatureId(4),
            properties: WardProperties {
                statename: Some("Lagos".to_string()),
                lganame: Some("Ikeja".to_string()),
                wardname: Some("Ojodu".to_string()),
                ..WardProperties::default()
            },
            geometry: None,
        };

        let json = serde_json::to_value(ApiWard::from(&ward)).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "Ojodu");
        assert_eq!(json["lgaName"], "Ikeja");
        assert_eq!(json["stateName"], "Lagos");
        assert!(json["stateCode"].is_null());
    }

    #[test]
    fn map_config_reflects_viewer_config() {
        let config = ApiMapConfig::from(&ViewerConfig::default());
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["zoom"], 6.0);
        assert_eq!(json["minQueryLen"], 3);
        assert_eq!(json["aggregation"], "concatenate");
    }
}
