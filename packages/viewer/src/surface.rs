//! The map surface the controller draws on.
//!
//! A [`MapSurface`] is whatever actually renders: a browser map fed from
//! the HTTP API, a terminal summary, or the recording [`SceneSurface`].
//! Layers are plain `GeoJSON` feature collections with a style and an
//! optional popup or tooltip property.

use geojson::{Feature, FeatureCollection};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use ward_map_boundary_models::Bounds;

/// Handle to a layer added to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerId(pub u64);

/// Stroke and fill styling for a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity.
    pub opacity: f64,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Fill color.
    pub fill_color: String,
}

impl LayerStyle {
    fn new(color: &str, weight: f64, fill_opacity: f64, fill_color: &str) -> Self {
        Self {
            color: color.to_string(),
            weight,
            opacity: 1.0,
            fill_opacity,
            fill_color: fill_color.to_string(),
        }
    }

    /// Unselected outlines.
    #[must_use]
    pub fn base() -> Self {
        Self::new("#3388ff", 2.0, 0.2, "#add8e6")
    }

    /// The selected state or LGA.
    #[must_use]
    pub fn highlight() -> Self {
        Self::new("#ff4500", 3.0, 0.4, "#ff7f50")
    }

    /// Search matches and the selected ward.
    #[must_use]
    pub fn search() -> Self {
        Self::new("#e74c3c", 3.0, 0.4, "#f39c12")
    }
}

/// How a feature's label is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LabelKind {
    /// Shown on click.
    Popup,
    /// Shown on hover.
    Tooltip,
}

/// A per-feature label bound to one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Popup or tooltip.
    pub kind: LabelKind,
    /// Feature property whose value is displayed.
    pub property: String,
}

/// A vector layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Display name.
    pub name: String,
    /// Styling applied to every feature.
    pub style: LayerStyle,
    /// Optional label.
    pub label: Option<Label>,
    /// The features to draw.
    pub features: FeatureCollection,
}

impl Layer {
    /// Creates an unlabeled layer.
    #[must_use]
    pub fn new(name: impl Into<String>, style: LayerStyle, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            style,
            label: None,
            features: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        }
    }

    /// Binds a popup showing `property`.
    #[must_use]
    pub fn with_popup(mut self, property: &str) -> Self {
        self.label = Some(Label {
            kind: LabelKind::Popup,
            property: property.to_string(),
        });
        self
    }

    /// Binds a hover tooltip showing `property`.
    #[must_use]
    pub fn with_tooltip(mut self, property: &str) -> Self {
        self.label = Some(Label {
            kind: LabelKind::Tooltip,
            property: property.to_string(),
        });
        self
    }

    /// Number of features in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.features.len()
    }

    /// Whether the layer has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.features.is_empty()
    }
}

/// The visible region of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Viewport {
    /// An explicit center and zoom.
    View {
        /// `[lat, lon]`.
        center: [f64; 2],
        /// Zoom level.
        zoom: f64,
    },
    /// Fitted to a bounding box.
    Bounds {
        /// The box.
        bounds: Bounds,
    },
}

/// Operations the controller needs from a map.
pub trait MapSurface {
    /// Moves the map to `center` (`[lat, lon]`) at `zoom`.
    fn set_view(&mut self, center: [f64; 2], zoom: f64);

    /// Adds a layer and returns its handle.
    fn add_layer(&mut self, layer: Layer) -> LayerId;

    /// Removes a previously added layer. Unknown ids are ignored.
    fn remove_layer(&mut self, id: LayerId);

    /// Fits the viewport to `bounds`.
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// A layer as recorded by [`SceneSurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLayer {
    /// Handle returned by `add_layer`.
    pub id: LayerId,
    /// The layer.
    #[serde(flatten)]
    pub layer: Layer,
}

/// A surface that records what is drawn, for serialization or inspection.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSurface {
    layers: Vec<SceneLayer>,
    viewport: Option<Viewport>,
    #[serde(skip)]
    next_id: u64,
}

impl SceneSurface {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers currently on the map, in drawing order.
    #[must_use]
    pub fn layers(&self) -> &[SceneLayer] {
        &self.layers
    }

    /// The last viewport set.
    #[must_use]
    pub const fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }
}

impl MapSurface for SceneSurface {
    fn set_view(&mut self, center: [f64; 2], zoom: f64) {
        self.viewport = Some(Viewport::View { center, zoom });
    }

    fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(SceneLayer { id, layer });
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|l| l.id != id);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = Some(Viewport::Bounds { bounds });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_records_layers_and_viewport() {
        let mut scene = SceneSurface::new();
        assert!(scene.viewport().is_none());

        let a = scene.add_layer(Layer::new("a", LayerStyle::base(), vec![]));
        let b = scene.add_layer(Layer::new("b", LayerStyle::search(), vec![]).with_tooltip("wardname"));
        assert_ne!(a, b);
        assert_eq!(scene.layers().len(), 2);

        scene.remove_layer(a);
        scene.remove_layer(LayerId(99));
        assert_eq!(scene.layers().len(), 1);
        assert_eq!(scene.layers()[0].layer.name, "b");

        scene.fit_bounds(Bounds::new(3.0, 6.0, 4.0, 7.0));
        assert_eq!(
            scene.viewport(),
            Some(&Viewport::Bounds {
                bounds: Bounds::new(3.0, 6.0, 4.0, 7.0)
            })
        );
    }

    #[test]
    fn scene_serializes_layers_as_geojson() {
        let mut scene = SceneSurface::new();
        scene.set_view([9.0, 8.0], 6.0);
        scene.add_layer(Layer::new("states", LayerStyle::base(), vec![]).with_popup("statename"));

        let json = serde_json::to_value(&scene).unwrap();
        assert_eq!(json["viewport"]["type"], "view");
        assert_eq!(json["layers"][0]["name"], "states");
        assert_eq!(json["layers"][0]["label"]["kind"], "popup");
        assert_eq!(json["layers"][0]["style"]["fillColor"], "#add8e6");
        assert_eq!(json["layers"][0]["features"]["type"], "FeatureCollection");
        assert!(json.get("nextId").is_none());
    }
}
